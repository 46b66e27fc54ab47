use dioxus::prelude::*;

use store::Role;
use ui::{AuthProvider, Navbar};
use views::{
    Account, Dashboard, DoctorDashboard, HospitalDashboard, Home, Login, NotFound, PatientDashboard,
    PharmaDashboard, Register,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/login")]
        Login {},
        #[route("/register")]
        Register {},
        #[route("/dashboard")]
        Dashboard {},
        #[route("/dashboard/patient")]
        PatientDashboard {},
        #[route("/dashboard/doctor")]
        DoctorDashboard {},
        #[route("/dashboard/pharma")]
        PharmaDashboard {},
        #[route("/dashboard/hospital")]
        HospitalDashboard {},
        #[route("/account")]
        Account {},
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

/// Where `/dashboard` sends a user with `role`.
fn dashboard_for(role: Role) -> Route {
    match role {
        Role::Patient => Route::PatientDashboard {},
        Role::Doctor => Route::DoctorDashboard {},
        Role::Pharma => Route::PharmaDashboard {},
        Role::HospitalAdmin => Route::HospitalDashboard {},
        Role::Other => Route::Account {},
    }
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        style { {GLOBAL_CSS} }
        AuthProvider {
            Router::<Route> {}
        }
    }
}

/// Navbar above every page.
#[component]
fn Shell() -> Element {
    rsx! {
        Navbar {
            Link { class: "navbar__link", to: Route::Dashboard {}, "Dashboard" }
        }
        main {
            class: "page",
            Outlet::<Route> {}
        }
    }
}

const GLOBAL_CSS: &str = r#"
body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
    color: #1f2937;
    background: #f8fafc;
}
.page { max-width: 960px; margin: 0 auto; padding: 2rem 1.5rem; }
.navbar { background: #ffffff; }
.navbar__link { color: #374151; text-decoration: none; font-size: 0.9375rem; }
.navbar__logout, .btn {
    padding: 0.5rem 1rem;
    border: 1px solid #d1d5db;
    border-radius: 4px;
    background: #ffffff;
    cursor: pointer;
}
.btn--primary { background: #0f766e; border-color: #0f766e; color: #ffffff; }
.btn:disabled, .navbar__logout:disabled { opacity: 0.5; cursor: not-allowed; }
.session-badge { display: inline-flex; gap: 0.5rem; align-items: baseline; font-size: 0.875rem; }
.session-badge__role { color: #6b7280; }
.session-badge--stale { opacity: 0.6; }
.form { display: flex; flex-direction: column; gap: 0.75rem; width: 100%; max-width: 360px; }
.form input, .form select { padding: 0.5rem 0.625rem; border: 1px solid #d1d5db; border-radius: 4px; font-size: 0.9375rem; }
.form-error { padding: 0.625rem; background: #fef2f2; border: 1px solid #fecaca; border-radius: 4px; color: #dc2626; font-size: 0.8125rem; }
.card { background: #ffffff; border: 1px solid #e5e7eb; border-radius: 8px; padding: 1.5rem; }
.notice { color: #6b7280; }
"#;
