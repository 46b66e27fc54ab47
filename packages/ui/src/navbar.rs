use dioxus::prelude::*;

use crate::auth::{use_auth, LogoutButton};
use crate::session_badge::SessionBadge;

#[component]
pub fn Navbar(children: Element) -> Element {
    let auth = use_auth();
    let signed_in = auth.is_authenticated();

    rsx! {
        div {
            class: "navbar",
            style: "display: flex; align-items: center; gap: 1rem; padding: 0.75rem 1.5rem; border-bottom: 1px solid #e9e9e7;",
            a {
                class: "navbar__brand",
                href: "/",
                style: "font-weight: 700; color: #0f766e; text-decoration: none;",
                "Anagha Health Connect"
            }
            {children}
            div { style: "flex: 1;" }
            SessionBadge {}
            if signed_in {
                LogoutButton { class: "navbar__logout" }
            }
        }
    }
}
