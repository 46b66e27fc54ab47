use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        main {
            class: "page",
            h1 { "Page not found" }
            p { class: "notice", "Nothing lives at /{path}." }
            Link { to: Route::Home {}, "Back to the start page" }
        }
    }
}
