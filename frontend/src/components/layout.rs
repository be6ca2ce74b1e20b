use crate::{
    state::{access::LOGIN_PATH, auth},
    utils::navigation,
};
use leptos::*;

#[component]
pub fn Header(#[prop(into)] title: String) -> impl IntoView {
    let auth_state = auth::use_auth();
    let sign_out_action = auth::use_sign_out_action();
    let sign_out_pending = sign_out_action.pending();
    create_effect(move |_| {
        if sign_out_action.value().get().is_some() {
            navigation::redirect_to(LOGIN_PATH);
        }
    });
    let on_sign_out = move |_| {
        if sign_out_pending.get_untracked() {
            return;
        }
        sign_out_action.dispatch(());
    };
    let user_name = move || {
        auth_state.with(|state| {
            state
                .identity
                .as_ref()
                .map(|user| user.display_name().to_string())
                .unwrap_or_default()
        })
    };
    view! {
        <header class="bg-white shadow-sm border-b border-gray-200">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <h1 class="text-xl font-semibold text-gray-900">{title}</h1>
                    <div class="flex items-center gap-4">
                        <span class="text-sm text-gray-600">{user_name}</span>
                        <button
                            type="button"
                            class="px-3 py-2 rounded-md text-sm font-medium text-gray-700 hover:bg-gray-100 disabled:opacity-50"
                            disabled=move || sign_out_pending.get()
                            on:click=on_sign_out
                        >
                            "Sign out"
                        </button>
                    </div>
                </div>
            </div>
        </header>
    }
}

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <div class="min-h-screen flex items-center justify-center bg-gray-50">
            <div class="flex flex-col items-center gap-3">
                <div class="w-10 h-10 border-4 border-blue-600 border-t-transparent rounded-full animate-spin"></div>
                <p class="text-sm text-gray-500 font-medium">"Loading..."</p>
            </div>
        </div>
    }
}

/// Dead end for accounts without a profile; there is nothing to retry.
#[component]
pub fn ProfileMissingNotice() -> impl IntoView {
    view! {
        <div class="min-h-screen flex items-center justify-center bg-gray-50">
            <div class="text-center p-8 max-w-md bg-white rounded-xl shadow border">
                <h2 class="text-xl font-bold text-gray-900 mb-2">"Profile Not Found"</h2>
                <p class="text-gray-500 text-sm">
                    "Your account exists but no profile was found. Please contact the system administrator."
                </p>
            </div>
        </div>
    }
}
