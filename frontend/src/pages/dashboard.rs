use crate::{
    components::layout::Header,
    state::{access::Role, auth::use_auth},
};
use leptos::*;

#[component]
pub fn RoleDashboard(role: Role) -> impl IntoView {
    let auth = use_auth();
    let hospital = move || {
        auth.with(|state| {
            state
                .profile
                .as_ref()
                .and_then(|profile| profile.hospital_id.clone())
        })
    };
    view! {
        <div class="min-h-screen bg-gray-50">
            <Header title=format!("{} Dashboard", role.label()) />
            <main class="max-w-7xl mx-auto py-6 px-4 sm:px-6 lg:px-8 space-y-2">
                <p class="text-gray-700">
                    {"Signed in as "}<span class="font-semibold">{role.as_str()}</span>
                </p>
                <Show when=move || hospital().is_some() fallback=|| ()>
                    <p class="text-sm text-gray-500">{"Hospital: "}{move || hospital().unwrap_or_default()}</p>
                </Show>
            </main>
        </div>
    }
}

#[component]
pub fn AdminDashboard() -> impl IntoView {
    view! { <RoleDashboard role=Role::Admin /> }
}

#[component]
pub fn HospitalDashboard() -> impl IntoView {
    view! { <RoleDashboard role=Role::HospitalAdmin /> }
}

#[component]
pub fn DoctorDashboard() -> impl IntoView {
    view! { <RoleDashboard role=Role::Doctor /> }
}

#[component]
pub fn StaffDashboard() -> impl IntoView {
    view! { <RoleDashboard role=Role::Staff /> }
}

#[component]
pub fn PatientDashboard() -> impl IntoView {
    view! { <RoleDashboard role=Role::Patient /> }
}
