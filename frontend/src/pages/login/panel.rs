use crate::{
    pages::login::{
        components::form::LoginForm,
        utils::{self, SignInOutcome},
    },
    state::{access::use_route_table, auth, session::AuthError},
    utils::navigation,
};
use leptos::{ev::SubmitEvent, Callback, *};

#[component]
pub fn LoginPanel() -> impl IntoView {
    let (identifier, set_identifier) = create_signal(String::new());
    let (secret, set_secret) = create_signal(String::new());
    let error = create_rw_signal(None::<AuthError>);
    let table = use_route_table();

    let sign_in_action = auth::use_sign_in_action();
    let sign_out_action = auth::use_sign_out_action();
    let pending = sign_in_action.pending();

    create_effect(move |_| {
        let Some(result) = sign_in_action.value().get() else {
            return;
        };
        match utils::sign_in_outcome(&table, result) {
            SignInOutcome::Land(path) => {
                error.set(None);
                set_secret.set(String::new());
                navigation::redirect_to(&path);
            }
            SignInOutcome::Discard(err) => {
                log::warn!("Dropping session with no landing page: {}", err);
                sign_out_action.dispatch(());
                error.set(Some(err));
            }
            SignInOutcome::Rejected(err) => error.set(Some(err)),
        }
    });

    let handle_submit = Callback::new(move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        match utils::validate_credentials(&identifier.get_untracked(), &secret.get_untracked()) {
            Ok(credentials) => {
                error.set(None);
                sign_in_action.dispatch(credentials);
            }
            Err(err) => error.set(Some(err)),
        }
    });

    view! {
        <LoginForm
            identifier=identifier
            secret=secret
            error=error.into()
            pending=pending.into()
            on_identifier_input=Callback::new(move |value: String| set_identifier.set(value))
            on_secret_input=Callback::new(move |value: String| set_secret.set(value))
            on_submit=handle_submit
        />
    }
}
