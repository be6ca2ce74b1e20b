pub mod api;
mod components;
pub mod config;
mod pages;
pub mod router;
pub mod state;
#[cfg(test)]
mod test_support;
pub mod utils;

/// Browser entry point: logging, runtime config, then the app.
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"Logger was already initialized".into());
    }
    log::info!("Starting Hospital Records frontend (wasm)");

    // Session restoration is synchronous; only the API base URL and
    // timeouts wait on this.
    wasm_bindgen_futures::spawn_local(async move {
        config::init().await;
    });

    router::mount_app();
}
