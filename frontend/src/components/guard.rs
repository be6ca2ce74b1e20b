use crate::{
    components::layout::{LoadingSpinner, ProfileMissingNotice},
    state::{
        access::{use_route_table, Role, RouteTable, LOGIN_PATH},
        auth::{use_auth, AuthState},
    },
    utils::navigation,
};
use leptos::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session restoration still running; no redirect decision yet.
    Waiting,
    Redirect(String),
    /// Signed in without a profile. Terminal until an administrator acts.
    ProfileMissing,
    Render,
}

/// Decides what a protected route shows for the given snapshot. Pure; reads
/// nothing but its arguments.
pub fn authorize(state: &AuthState, allowed: &[Role], table: &RouteTable) -> RouteDecision {
    if state.loading {
        return RouteDecision::Waiting;
    }
    if state.identity.is_none() {
        return RouteDecision::Redirect(LOGIN_PATH.to_string());
    }
    let Some(profile) = &state.profile else {
        return RouteDecision::ProfileMissing;
    };
    if allowed.is_empty() {
        return RouteDecision::Render;
    }
    match profile.role() {
        Ok(role) if allowed.contains(&role) => RouteDecision::Render,
        Ok(role) => RouteDecision::Redirect(
            table
                .home_for(role)
                .unwrap_or(LOGIN_PATH)
                .to_string(),
        ),
        Err(err) => {
            log::warn!("Denying user {}: {}", profile.user_id, err);
            RouteDecision::Redirect(LOGIN_PATH.to_string())
        }
    }
}

/// Renders `children` only when the session may view `path` under the
/// route table in context.
#[component]
pub fn RequireRole(#[prop(into)] path: String, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let table = use_route_table();
    let decision = create_memo(move |_| {
        auth.with(|state| authorize(state, table.allowed_roles(&path), &table))
    });
    create_effect(move |_| {
        if let RouteDecision::Redirect(target) = decision.get() {
            navigation::redirect_to(&target);
        }
    });
    move || match decision.get() {
        RouteDecision::Waiting => view! { <LoadingSpinner /> }.into_view(),
        RouteDecision::ProfileMissing => view! { <ProfileMissingNotice /> }.into_view(),
        RouteDecision::Redirect(_) => ().into_view(),
        RouteDecision::Render => children().into_view(),
    }
}
