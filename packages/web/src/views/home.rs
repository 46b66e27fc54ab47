use dioxus::prelude::*;
use ui::use_auth;

use crate::Route;

#[component]
pub fn Home() -> Element {
    let auth = use_auth();
    let greeting = auth.user().map(|u| u.display_name().to_string());

    rsx! {
        section {
            class: "card",
            h1 { "Anagha Health Connect" }
            p {
                class: "notice",
                "Patients, doctors, pharma professionals and hospitals in one place."
            }
            if let Some(name) = greeting {
                p { "Welcome back, {name}." }
                Link { class: "btn btn--primary", to: Route::Dashboard {}, "Go to your dashboard" }
            } else {
                div {
                    style: "display: flex; gap: 0.75rem;",
                    Link { class: "btn btn--primary", to: Route::Login {}, "Sign in" }
                    Link { class: "btn", to: Route::Register {}, "Create an account" }
                }
            }
        }
    }
}
