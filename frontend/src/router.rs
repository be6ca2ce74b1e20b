use leptos::*;
use leptos_meta::{provide_meta_context, Title};
use leptos_router::*;

use crate::{
    api::ApiClient,
    components::guard::RequireRole,
    pages::{
        dashboard::{
            AdminDashboard, DoctorDashboard, HospitalDashboard, PatientDashboard, StaffDashboard,
        },
        home::HomePage,
        login::LoginPage,
    },
    state::{
        access::{provide_route_table, RouteTable},
        auth::AuthProvider,
    },
};

pub const ROUTE_PATHS: &[&str] = &[
    "/",
    "/login",
    "/admin",
    "/hospital",
    "/doctor",
    "/staff",
    "/patient",
];

pub const PROTECTED_ROUTE_PATHS: &[&str] = &["/admin", "/hospital", "/doctor", "/staff", "/patient"];

pub const PUBLIC_ROUTE_PATHS: &[&str] = &["/", "/login"];

pub fn mount_app() {
    mount_to_body(app_root);
}

pub fn app_root() -> impl IntoView {
    provide_meta_context();
    provide_context(ApiClient::new());
    provide_route_table(RouteTable::standard());
    view! {
        <Title text="Hospital Records" />
        <AuthProvider>
            <Router>
                <Routes>
                    <Route path="/" view=HomePage/>
                    <Route path="/login" view=LoginPage/>
                    <Route path="/admin" view=ProtectedAdmin/>
                    <Route path="/hospital" view=ProtectedHospital/>
                    <Route path="/doctor" view=ProtectedDoctor/>
                    <Route path="/staff" view=ProtectedStaff/>
                    <Route path="/patient" view=ProtectedPatient/>
                </Routes>
            </Router>
        </AuthProvider>
    }
}

#[component]
fn ProtectedAdmin() -> impl IntoView {
    view! { <RequireRole path="/admin"><AdminDashboard/></RequireRole> }
}

#[component]
fn ProtectedHospital() -> impl IntoView {
    view! { <RequireRole path="/hospital"><HospitalDashboard/></RequireRole> }
}

#[component]
fn ProtectedDoctor() -> impl IntoView {
    view! { <RequireRole path="/doctor"><DoctorDashboard/></RequireRole> }
}

#[component]
fn ProtectedStaff() -> impl IntoView {
    view! { <RequireRole path="/staff"><StaffDashboard/></RequireRole> }
}

#[component]
fn ProtectedPatient() -> impl IntoView {
    view! { <RequireRole path="/patient"><PatientDashboard/></RequireRole> }
}
