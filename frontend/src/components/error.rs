use crate::state::session::AuthError;
use leptos::*;

#[component]
pub fn InlineErrorMessage(#[prop(into)] error: Signal<Option<AuthError>>) -> impl IntoView {
    view! {
        <Show when=move || error.with(Option::is_some) fallback=|| ()>
            <div class="bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded space-y-1 my-2" role="alert">
                <div class="font-bold">
                    {move || error.get().map(|e| e.to_string()).unwrap_or_default()}
                </div>
                <div class="text-xs opacity-75">
                    {"Code: "}{move || error.get().map(|e| e.code()).unwrap_or_default()}
                </div>
            </div>
        </Show>
    }
}
