use leptos::*;

use super::helpers::{provide_auth, with_runtime};
use crate::state::auth::AuthState;

pub fn render_to_string<F, N>(view: F) -> String
where
    F: FnOnce() -> N + 'static,
    N: IntoView + 'static,
{
    leptos_reactive::suppress_resource_load(true);
    let html = with_runtime(|| view().into_view().render_to_string().to_string());
    leptos_reactive::suppress_resource_load(false);
    html
}

/// Renders `view` with the session pinned to `state` and the standard
/// route table in context.
pub fn render_with_auth<F, N>(state: AuthState, view: F) -> String
where
    F: FnOnce() -> N + 'static,
    N: IntoView + 'static,
{
    render_to_string(move || {
        provide_auth(state);
        view()
    })
}
