//! Registration page view with role-specific profile fields.

use api::Registration;
use dioxus::prelude::*;
use store::{DoctorProfile, HospitalAdminProfile, PatientProfile, PharmaProfile, Role, RoleProfile};
use ui::use_auth;

use crate::Route;

/// Raw form input. Every field is kept as typed text until submit.
#[derive(Clone, Debug, PartialEq)]
struct RegisterForm {
    name: String,
    mobile: String,
    email: String,
    password: String,
    confirm_password: String,
    role: Role,
    address_line1: String,
    city: String,
    state: String,
    degree: String,
    institute_name: String,
    specialty: String,
    company_name: String,
    hospital_id: String,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            mobile: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            role: Role::Patient,
            address_line1: String::new(),
            city: String::new(),
            state: String::new(),
            degree: String::new(),
            institute_name: String::new(),
            specialty: String::new(),
            company_name: String::new(),
            hospital_id: String::new(),
        }
    }
}

fn opt(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl RegisterForm {
    /// Checks that only the form can make, then builds the request body.
    /// Required fields are left to the session.
    fn to_registration(&self) -> Result<Registration, String> {
        if self.password != self.confirm_password {
            return Err("Passwords do not match".to_string());
        }
        let hospital_id = match opt(&self.hospital_id) {
            Some(id) => Some(id.parse::<i64>().map_err(|_| "Hospital ID must be a number".to_string())?),
            None => None,
        };

        let profile = match self.role {
            Role::Patient => Some(RoleProfile::Patient(PatientProfile {
                address_line1: opt(&self.address_line1),
                city: opt(&self.city),
                state: opt(&self.state),
            })),
            Role::Doctor => Some(RoleProfile::Doctor(DoctorProfile {
                degree: opt(&self.degree),
                institute_name: opt(&self.institute_name),
                specialty: opt(&self.specialty),
                hospital_id,
                city: opt(&self.city),
                state: opt(&self.state),
            })),
            Role::Pharma => Some(RoleProfile::Pharma(PharmaProfile {
                company_name: opt(&self.company_name),
                city: opt(&self.city),
                state: opt(&self.state),
            })),
            Role::HospitalAdmin => Some(RoleProfile::HospitalAdmin(HospitalAdminProfile {
                hospital_id,
                address_line1: opt(&self.address_line1),
                city: opt(&self.city),
                state: opt(&self.state),
            })),
            // Not selectable; let the backend pick its default role.
            Role::Other => None,
        };

        let mut registration = Registration::new(self.name.trim(), self.mobile.trim(), self.password.clone());
        if let Some(profile) = profile {
            registration = registration.with_profile(profile);
        }
        if let Some(email) = opt(&self.email) {
            registration = registration.with_email(email);
        }
        Ok(registration)
    }
}

/// Text input bound to one form field.
#[component]
fn Field(
    placeholder: String,
    value: String,
    #[props(default = "text".to_string())] kind: String,
    oninput: EventHandler<String>,
) -> Element {
    rsx! {
        input {
            r#type: "{kind}",
            placeholder: "{placeholder}",
            value: value,
            oninput: move |evt: FormEvent| oninput.call(evt.value()),
        }
    }
}

/// Register page component.
#[component]
pub fn Register() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let mut form = use_signal(RegisterForm::default);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    // Already signed in
    if auth.is_authenticated() {
        nav.replace(Route::Dashboard {});
    }

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let auth = auth.clone();
        spawn(async move {
            error.set(None);
            let registration = match form.read().to_registration() {
                Ok(r) => r,
                Err(message) => {
                    error.set(Some(message));
                    return;
                }
            };

            loading.set(true);
            match auth.register(&registration).await {
                Ok(user) => {
                    tracing::info!(user_id = user.id, "Account created");
                    nav.push(Route::Dashboard {});
                }
                Err(e) => {
                    loading.set(false);
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    let f = form();
    let role = f.role;

    rsx! {
        div {
            style: "display: flex; flex-direction: column; align-items: center; padding: 2rem;",

            h1 { style: "margin-bottom: 0.5rem;", "Create Account" }
            p { class: "notice", style: "margin-bottom: 2rem;", "Join Anagha Health Connect" }

            form {
                class: "form",
                onsubmit: handle_register,

                if let Some(err) = error() {
                    div { class: "form-error", "{err}" }
                }

                select {
                    value: role.as_str(),
                    onchange: move |evt: FormEvent| form.write().role = Role::from_tag(&evt.value()),
                    for r in Role::SELECTABLE {
                        option { value: r.as_str(), selected: r == role, {r.label()} }
                    }
                }

                Field { placeholder: "Full name", value: f.name.clone(), oninput: move |v: String| form.write().name = v }
                Field { placeholder: "Mobile number", kind: "tel", value: f.mobile.clone(), oninput: move |v: String| form.write().mobile = v }
                Field { placeholder: "Email (optional)", kind: "email", value: f.email.clone(), oninput: move |v: String| form.write().email = v }
                Field { placeholder: "Password", kind: "password", value: f.password.clone(), oninput: move |v: String| form.write().password = v }
                Field { placeholder: "Confirm password", kind: "password", value: f.confirm_password.clone(), oninput: move |v: String| form.write().confirm_password = v }

                {match role {
                    Role::Doctor => rsx! {
                        Field { placeholder: "Degree", value: f.degree.clone(), oninput: move |v: String| form.write().degree = v }
                        Field { placeholder: "Institute", value: f.institute_name.clone(), oninput: move |v: String| form.write().institute_name = v }
                        Field { placeholder: "Specialty", value: f.specialty.clone(), oninput: move |v: String| form.write().specialty = v }
                        Field { placeholder: "Hospital ID (optional)", value: f.hospital_id.clone(), oninput: move |v: String| form.write().hospital_id = v }
                    },
                    Role::Pharma => rsx! {
                        Field { placeholder: "Company name", value: f.company_name.clone(), oninput: move |v: String| form.write().company_name = v }
                    },
                    Role::HospitalAdmin => rsx! {
                        Field { placeholder: "Hospital ID", value: f.hospital_id.clone(), oninput: move |v: String| form.write().hospital_id = v }
                        Field { placeholder: "Address", value: f.address_line1.clone(), oninput: move |v: String| form.write().address_line1 = v }
                    },
                    Role::Patient => rsx! {
                        Field { placeholder: "Address", value: f.address_line1.clone(), oninput: move |v: String| form.write().address_line1 = v }
                    },
                    Role::Other => rsx! {},
                }}

                Field { placeholder: "City", value: f.city.clone(), oninput: move |v: String| form.write().city = v }
                Field { placeholder: "State", value: f.state.clone(), oninput: move |v: String| form.write().state = v }

                button {
                    class: "btn btn--primary",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Creating account..." } else { "Sign up" }
                }
            }

            p {
                style: "margin-top: 1.5rem; font-size: 0.875rem;",
                "Already have an account? "
                Link { to: Route::Login {}, "Sign in" }
            }
        }
    }
}
