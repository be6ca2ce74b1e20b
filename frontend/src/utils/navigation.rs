use super::storage::window;

/// Full-page navigation to `path`; does nothing when already there.
pub fn redirect_to(path: &str) {
    let Ok(win) = window() else {
        return;
    };
    let location = win.location();
    if location.pathname().ok().as_deref() == Some(path) {
        return;
    }
    if location.set_href(path).is_err() {
        log::error!("Failed to navigate to {}", path);
    }
}
