use crate::{components::error::InlineErrorMessage, state::session::AuthError};
use leptos::{ev::SubmitEvent, *};

#[component]
pub fn LoginForm(
    identifier: ReadSignal<String>,
    secret: ReadSignal<String>,
    error: Signal<Option<AuthError>>,
    pending: Signal<bool>,
    on_identifier_input: Callback<String>,
    on_secret_input: Callback<String>,
    on_submit: Callback<SubmitEvent>,
) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-gradient-to-br from-blue-50 to-green-50 flex items-center justify-center p-8">
            <div class="w-full max-w-md bg-white rounded-xl shadow-lg p-8">
                <div class="flex items-center gap-3 mb-8">
                    <a href="/" class="p-2 rounded-md hover:bg-gray-100 transition">"←"</a>
                    <h1 class="text-xl font-semibold text-gray-900">"Login"</h1>
                </div>
                <form class="space-y-6" on:submit=move |ev| on_submit.call(ev)>
                    <div class="space-y-2">
                        <label for="identifier" class="text-sm font-semibold text-gray-700">"Email / ID"</label>
                        <input
                            id="identifier"
                            name="identifier"
                            type="text"
                            required
                            autocomplete="username"
                            class="w-full rounded-md border border-gray-300 px-3 py-2 text-sm"
                            placeholder="Enter your email or ID"
                            prop:value=identifier
                            on:input=move |ev| on_identifier_input.call(event_target_value(&ev))
                        />
                    </div>
                    <div class="space-y-2">
                        <label for="secret" class="text-sm font-semibold text-gray-700">"Password"</label>
                        <input
                            id="secret"
                            name="secret"
                            type="password"
                            required
                            autocomplete="current-password"
                            class="w-full rounded-md border border-gray-300 px-3 py-2 text-sm"
                            placeholder="Enter your password"
                            prop:value=secret
                            on:input=move |ev| on_secret_input.call(event_target_value(&ev))
                        />
                    </div>

                    <InlineErrorMessage error=error />

                    <button
                        type="submit"
                        disabled=move || pending.get()
                        class="w-full py-2 px-4 rounded-md text-sm font-medium text-white bg-blue-600 hover:bg-blue-700 disabled:opacity-50"
                    >
                        {move || if pending.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
