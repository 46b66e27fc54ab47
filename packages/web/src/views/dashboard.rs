//! Role dashboards. Each one shows the signed-in profile; business content
//! lives elsewhere.

use dioxus::prelude::*;
use store::{Role, RoleProfile, User};
use ui::use_auth;

use super::Protected;
use crate::{dashboard_for, Route};

/// `/dashboard`: forwards to the dashboard for the user's role.
#[component]
pub fn Dashboard() -> Element {
    let auth = use_auth();
    let role = auth.user().map(|u| u.role());

    rsx! {
        Protected {
            if let Some(role) = role {
                RoleRedirect { role }
            }
        }
    }
}

#[component]
fn RoleRedirect(role: Role) -> Element {
    let nav = use_navigator();
    nav.replace(dashboard_for(role));
    rsx! {}
}

#[component]
pub fn PatientDashboard() -> Element {
    rsx! {
        Protected { roles: vec![Role::Patient], ProfileCard { title: "Patient dashboard" } }
    }
}

#[component]
pub fn DoctorDashboard() -> Element {
    rsx! {
        Protected { roles: vec![Role::Doctor], ProfileCard { title: "Doctor dashboard" } }
    }
}

#[component]
pub fn PharmaDashboard() -> Element {
    rsx! {
        Protected { roles: vec![Role::Pharma], ProfileCard { title: "Pharma dashboard" } }
    }
}

#[component]
pub fn HospitalDashboard() -> Element {
    rsx! {
        Protected { roles: vec![Role::HospitalAdmin], ProfileCard { title: "Hospital dashboard" } }
    }
}

/// Any signed-in user, including roles without a dedicated dashboard.
#[component]
pub fn Account() -> Element {
    rsx! {
        Protected { ProfileCard { title: "Your account" } }
    }
}

/// Label/value rows describing `user`.
fn profile_rows(user: &User) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Name", user.name.clone()),
        ("Mobile", user.mobile.clone()),
        ("Account type", user.role().label().to_string()),
    ];
    if let Some(email) = &user.email {
        rows.push(("Email", email.clone()));
    }

    let mut push = |label: &'static str, value: &Option<String>| {
        if let Some(v) = value {
            rows.push((label, v.clone()));
        }
    };
    match &user.profile {
        RoleProfile::Patient(p) => push("Address", &p.address_line1),
        RoleProfile::Doctor(p) => {
            push("Degree", &p.degree);
            push("Institute", &p.institute_name);
            push("Specialty", &p.specialty);
            push("Hospital", &p.hospital_id.map(|id| id.to_string()));
        }
        RoleProfile::Pharma(p) => push("Company", &p.company_name),
        RoleProfile::HospitalAdmin(p) => {
            push("Hospital", &p.hospital_id.map(|id| id.to_string()));
            push("Address", &p.address_line1);
        }
        RoleProfile::Other(_) => {}
    }
    if let Some(place) = user.location() {
        rows.push(("Location", place));
    }
    rows
}

/// Current profile with a button to re-sync it from the server.
#[component]
fn ProfileCard(title: String) -> Element {
    let auth = use_auth();
    let mut refreshing = use_signal(|| false);
    let state = auth.state();

    let Some(user) = state.user else {
        return rsx! {};
    };
    let rows = profile_rows(&user);
    let stale = state.stale;

    let refresh = move |_| {
        let auth = auth.clone();
        async move {
            refreshing.set(true);
            if auth.refresh_user().await.is_none() {
                tracing::info!("Session ended during refresh");
            }
            refreshing.set(false);
        }
    };

    rsx! {
        section {
            class: "card",
            h1 { "{title}" }
            if stale {
                p { class: "notice", "Could not reach the server. Showing your last known profile." }
            }
            dl {
                for (label, value) in rows {
                    dt { style: "font-weight: 600; margin-top: 0.5rem;", "{label}" }
                    dd { style: "margin-left: 0;", "{value}" }
                }
            }
            button {
                class: "btn",
                disabled: refreshing(),
                onclick: refresh,
                if refreshing() { "Refreshing..." } else { "Refresh profile" }
            }
            p {
                style: "margin-top: 1rem; font-size: 0.875rem;",
                Link { to: Route::Home {}, "Home" }
            }
        }
    }
}
