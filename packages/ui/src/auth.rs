//! Authentication context and hooks for the UI.

use std::rc::Rc;

use api::{AuthError, AuthState, Registration, User};
use dioxus::prelude::*;

use crate::platform::{make_session, AppSession};

/// Handle to the app session plus a signal mirroring its state.
///
/// Components read the signal; every operation goes through the session and
/// then copies the committed state back into the signal.
#[derive(Clone)]
pub struct AuthContext {
    session: Rc<AppSession>,
    state: Signal<AuthState>,
}

impl PartialEq for AuthContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.session, &other.session) && self.state == other.state
    }
}

impl AuthContext {
    pub fn state(&self) -> AuthState {
        (self.state)()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    pub async fn load_user(&self) -> Option<User> {
        let user = self.session.load_user().await;
        self.sync();
        user
    }

    pub async fn refresh_user(&self) -> Option<User> {
        let user = self.session.refresh_user().await;
        self.sync();
        user
    }

    pub async fn login(&self, mobile: &str, password: &str) -> Result<User, AuthError> {
        let result = self.session.login(mobile, password).await;
        self.sync();
        result
    }

    pub async fn register(&self, registration: &Registration) -> Result<User, AuthError> {
        let result = self.session.register(registration).await;
        self.sync();
        result
    }

    pub async fn logout(&self) {
        self.session.logout().await;
        self.sync();
    }

    /// Copy the session's committed state into the signal if it changed.
    fn sync(&self) {
        let next = self.session.state();
        let mut state = self.state;
        if *state.peek() != next {
            state.set(next);
        }
    }

    /// Mirror every state change until the session goes away.
    async fn follow(self) {
        let mut changes = self.session.subscribe();
        while changes.changed().await.is_ok() {
            self.sync();
        }
    }
}

/// Get the authentication context.
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>()
}

/// Provider component that manages authentication state.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let session = use_hook(|| match make_session() {
        Ok(session) => Ok(Rc::new(session)),
        Err(e) => {
            tracing::error!("Failed to create auth session: {}", e);
            Err(e.to_string())
        }
    });

    match session {
        Ok(session) => rsx! {
            SessionProvider { session: SharedSession(session), {children} }
        },
        Err(message) => rsx! {
            div {
                class: "auth-error",
                style: "padding: 2rem; color: #b42318;",
                "Unable to start: {message}"
            }
        },
    }
}

#[derive(Clone)]
struct SharedSession(Rc<AppSession>);

impl PartialEq for SharedSession {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[component]
fn SessionProvider(session: SharedSession, children: Element) -> Element {
    let state = use_signal(|| session.0.state());
    let auth = use_context_provider(|| AuthContext {
        session: session.0.clone(),
        state,
    });

    use_hook({
        let auth = auth.clone();
        move || spawn(auth.follow())
    });

    // Bootstrap once on mount
    let _ = use_resource(move || {
        let auth = auth.clone();
        async move {
            auth.load_user().await;
        }
    });

    rsx! {
        {children}
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let auth = use_auth();
    let mut pending = use_signal(|| false);

    let onclick = move |_| {
        let auth = auth.clone();
        async move {
            pending.set(true);
            auth.logout().await;
            pending.set(false);
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled: pending(),
            onclick: onclick,
            "{label}"
        }
    }
}
