//! Signed-in user summary for the navbar.

use dioxus::prelude::*;

use crate::auth::use_auth;

/// Shows who is signed in and in which role.
///
/// - **Resolving**: nothing
/// - **Signed in**: name and role label, dimmed when the profile is stale
/// - **Anonymous**: sign-in and register links
#[component]
pub fn SessionBadge() -> Element {
    let auth = use_auth();
    let state = auth.state();

    if state.loading {
        return rsx! {};
    }

    match state.user {
        Some(user) => {
            let name = user.display_name().to_string();
            let role = user.role().label();
            let (class, title) = if state.stale {
                ("session-badge session-badge--stale", "Offline, showing last known profile")
            } else {
                ("session-badge", "Signed in")
            };
            rsx! {
                span {
                    class: "{class}",
                    title: "{title}",
                    span { class: "session-badge__name", "{name}" }
                    span { class: "session-badge__role", "{role}" }
                }
            }
        }
        None => rsx! {
            span {
                class: "session-badge session-badge--anonymous",
                a { href: "/login", "Sign in" }
                " / "
                a { href: "/register", "Register" }
            }
        },
    }
}
