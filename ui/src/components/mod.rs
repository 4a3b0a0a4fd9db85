pub mod app;
pub mod config;
pub mod mock_backend;
#[cfg(target_family = "wasm")]
pub mod web_dom;
