//! Login page view with mobile/password form.

use dioxus::prelude::*;
use ui::use_auth;

use crate::Route;

/// Login page component.
#[component]
pub fn Login() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let mut mobile = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    // Already signed in
    if auth.is_authenticated() {
        nav.replace(Route::Dashboard {});
    }

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let auth = auth.clone();
        spawn(async move {
            error.set(None);
            loading.set(true);
            match auth.login(&mobile(), &password()).await {
                Ok(_) => {
                    nav.push(Route::Dashboard {});
                }
                Err(e) => {
                    loading.set(false);
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    rsx! {
        div {
            style: "display: flex; flex-direction: column; align-items: center; padding: 2rem;",

            h1 { style: "margin-bottom: 0.5rem;", "Sign in" }
            p { class: "notice", style: "margin-bottom: 2rem;", "Use the mobile number you registered with." }

            form {
                class: "form",
                onsubmit: handle_login,

                if let Some(err) = error() {
                    div { class: "form-error", "{err}" }
                }

                input {
                    r#type: "tel",
                    placeholder: "Mobile number",
                    autocomplete: "username",
                    value: mobile(),
                    oninput: move |evt: FormEvent| mobile.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    autocomplete: "current-password",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                button {
                    class: "btn btn--primary",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Signing in..." } else { "Sign in" }
                }
            }

            p {
                style: "margin-top: 1.5rem; font-size: 0.875rem;",
                "New here? "
                Link { to: Route::Register {}, "Create an account" }
            }
        }
    }
}
