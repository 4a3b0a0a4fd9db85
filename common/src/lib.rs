pub mod backend;
pub mod catalog;
pub mod config;
pub mod dom;
pub mod error;
pub mod filter;
pub mod format;
pub mod model;
pub mod observer;
pub mod point;
pub mod presenter;
pub mod sort;
pub mod stats;
pub mod update;
pub mod view;

#[cfg(feature = "dev")]
pub mod mock;
