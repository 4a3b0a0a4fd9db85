use dioxus::prelude::*;

#[cfg(target_family = "wasm")]
use std::cell::RefCell;
#[cfg(target_family = "wasm")]
use std::rc::Rc;

#[cfg(target_family = "wasm")]
use futures::future::LocalBoxFuture;
#[cfg(target_family = "wasm")]
use trip_common::{
    backend::Spawner,
    config::TripConfig,
    presenter::{Models, Mounts, Runtime},
};

#[cfg(target_family = "wasm")]
use super::{config::UiConfig, mock_backend::MockBackend, web_dom::WebDom};

#[cfg(target_family = "wasm")]
type TripRuntime = Rc<Runtime<MockBackend>>;

/// Page shell. Dioxus renders the static layout once; the trip presenter
/// owns everything inside the three mount points.
#[component]
pub fn App() -> Element {
    #[cfg_attr(not(target_family = "wasm"), allow(unused_mut))]
    let mut boot_error = use_signal(|| None::<String>);

    #[cfg(target_family = "wasm")]
    {
        let slot = use_hook(|| Rc::new(RefCell::new(None::<TripRuntime>)));

        let started = slot.clone();
        use_effect(move || {
            if started.borrow().is_some() {
                return;
            }
            match boot() {
                Ok(runtime) => *started.borrow_mut() = Some(runtime),
                Err(e) => {
                    tracing::error!("trip failed to start: {e}");
                    boot_error.set(Some(e));
                }
            }
        });

        use_drop(move || {
            if let Some(runtime) = slot.borrow_mut().take() {
                runtime.dispose();
            }
        });
    }

    rsx! {
        div { class: "page-body",
            header { class: "page-header",
                div { class: "page-body__container page-header__container",
                    div { class: "trip-main", id: "trip-main",
                        div { class: "trip-main__trip-controls trip-controls", id: "trip-controls" }
                    }
                }
            }
            main { class: "page-body__page-main page-main",
                div { class: "page-body__container",
                    section { class: "trip-events", id: "trip-events",
                        h2 { class: "visually-hidden", "Trip events" }
                    }
                }
            }
            if let Some(msg) = boot_error() {
                p { class: "boot-error", "{msg}" }
            }
        }
    }
}

#[cfg(target_family = "wasm")]
fn boot() -> Result<TripRuntime, String> {
    let ui = UiConfig::from_env();
    let dom = Rc::new(WebDom::new().map_err(|e| e.to_string())?);
    let mounts = Mounts {
        main: dom.mount_by_id("trip-main").map_err(|e| e.to_string())?,
        controls: dom.mount_by_id("trip-controls").map_err(|e| e.to_string())?,
        events: dom.mount_by_id("trip-events").map_err(|e| e.to_string())?,
    };
    let config = TripConfig {
        initial_filter: ui.initial_filter,
        ..TripConfig::default()
    };
    let models = Models::new(config.initial_filter);
    let backend = Rc::new(MockBackend::new(&ui));
    let spawner: Spawner = Rc::new(|task: LocalBoxFuture<'static, ()>| {
        wasm_bindgen_futures::spawn_local(task)
    });

    let runtime = Runtime::new(dom, mounts, models, backend, spawner, config);
    runtime.start().map_err(|e| e.to_string())?;
    Ok(runtime)
}
