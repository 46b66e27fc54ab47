//! Route guard for pages that need a signed-in user.

use api::AuthPhase;
use dioxus::prelude::*;
use store::Role;
use ui::use_auth;

use crate::Route;

/// Renders `children` only for an authenticated user whose role is in `roles`.
///
/// An empty `roles` admits any authenticated user. While bootstrap is still
/// running a placeholder is shown; anonymous visitors are sent to the login page.
#[component]
pub fn Protected(#[props(default)] roles: Vec<Role>, children: Element) -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let state = auth.state();

    match state.phase() {
        AuthPhase::Unresolved => rsx! {
            div { class: "notice", "Loading..." }
        },
        AuthPhase::Anonymous => {
            nav.replace(Route::Login {});
            rsx! {}
        }
        AuthPhase::Authenticated => {
            let role = state.user.as_ref().map(|u| u.role()).unwrap_or(Role::Other);
            if admits(&roles, role) {
                rsx! { {children} }
            } else {
                tracing::debug!(role = role.as_str(), "Role not allowed on this page");
                rsx! {
                    div {
                        class: "card",
                        h2 { "Access denied" }
                        p { class: "notice", "This page is not available for your account type." }
                        Link { to: Route::Dashboard {}, "Go to your dashboard" }
                    }
                }
            }
        }
    }
}

fn admits(roles: &[Role], role: Role) -> bool {
    roles.is_empty() || roles.contains(&role)
}
