//! # Auth session: client-side session bootstrap and state
//!
//! [`AuthSession`] owns everything the client knows about the signed-in user:
//! the in-memory [`AuthState`], the persisted profile snapshot
//! ([`store::ProfileCache`]) and the backend it asks for the truth. Nothing else
//! writes to either; the UI reads state through [`AuthSession::state`] or a
//! [`AuthSession::subscribe`] receiver and mutates it only through the
//! operations below.
//!
//! ## States
//!
//! | [`AuthPhase`] | Meaning |
//! |---------------|---------|
//! | `Unresolved` | Initial. Bootstrap has not finished. |
//! | `Authenticated` | A user is present. |
//! | `Anonymous` | No user, or resolution failed. |
//!
//! `Unresolved → Authenticated | Anonymous` via [`load_user`](AuthSession::load_user);
//! `Anonymous → Authenticated` via [`login`](AuthSession::login) /
//! [`register`](AuthSession::register); `Authenticated → Anonymous` via
//! [`logout`](AuthSession::logout) or a failed bootstrap/refresh.
//!
//! ## Failure policy
//!
//! Login and registration failures go back to the caller untouched. Bootstrap
//! and refresh failures are logged and turn into "no user": the cached profile
//! and any client-held credential are dropped. With
//! [`RefreshPolicy::KeepStale`] a *network* failure instead keeps a user that is
//! already in memory and flags the state as `stale`.
//!
//! ## Ordering
//!
//! Every committed session change (logout, login, registration) advances a
//! generation counter. A bootstrap or refresh response that arrives after the
//! generation moved is dropped, so a late current-user reply cannot bring a
//! user back after logout. A login or registration overtaken by another
//! session change returns [`AuthError::Superseded`] without touching state.
//!
//! In-memory state is committed before the cache is written. A cache write
//! that overlapped a newer change is redone from whatever that change
//! committed, and the older call reports itself as overtaken.

use std::sync::atomic::{AtomicU64, Ordering};

use store::{KeyValueStore, ProfileCache, User};
use thiserror::Error;
use tokio::sync::watch;

use crate::client::AuthBackend;
use crate::config::RefreshPolicy;
use crate::error::ApiError;
use crate::models::{LoginRequest, Registration};

/// Route the app is sent to after logout.
pub const LOGIN_ROUTE: &str = "/login";

/// Full page navigation, discarding all in-memory app state.
pub trait Navigator {
    fn hard_navigate(&self, path: &str);
}

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    /// Bootstrap still in progress.
    pub loading: bool,
    /// `user` is a last-known-good profile the backend could not confirm.
    pub stale: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
            stale: false,
        }
    }
}

impl AuthState {
    pub fn anonymous() -> Self {
        Self {
            user: None,
            loading: false,
            stale: false,
        }
    }

    pub fn authenticated(user: User) -> Self {
        Self {
            user: Some(user),
            loading: false,
            stale: false,
        }
    }

    pub fn phase(&self) -> AuthPhase {
        match (&self.user, self.loading) {
            (Some(_), _) => AuthPhase::Authenticated,
            (None, true) => AuthPhase::Unresolved,
            (None, false) => AuthPhase::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Unresolved,
    Authenticated,
    Anonymous,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("the session changed before this request finished")]
    Superseded,
}

/// Owned session container: backend, profile cache, navigator and state.
pub struct AuthSession<B, S, N> {
    backend: B,
    cache: ProfileCache<S>,
    navigator: N,
    policy: RefreshPolicy,
    state: watch::Sender<AuthState>,
    generation: AtomicU64,
}

impl<B, S, N> AuthSession<B, S, N>
where
    B: AuthBackend,
    S: KeyValueStore,
    N: Navigator,
{
    pub fn new(backend: B, store: S, navigator: N) -> Self {
        Self {
            backend,
            cache: ProfileCache::new(store),
            navigator,
            policy: RefreshPolicy::default(),
            state: watch::Sender::new(AuthState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Builder method to set the refresh failure policy.
    pub fn with_policy(mut self, policy: RefreshPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Receiver that observes every state change. It reports closure once the
    /// session is dropped.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Number of committed session changes so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// The persisted snapshot, for display before bootstrap completes. Never
    /// use it to decide access.
    pub async fn cached_profile(&self) -> Option<User> {
        self.cache.load().await
    }

    /// Bootstrap: resolve the current user if a session was cached.
    pub async fn load_user(&self) -> Option<User> {
        let generation = self.generation();
        if !self.cache.has_session().await {
            tracing::debug!("No cached session, skipping current-user lookup");
            if self.generation() == generation {
                self.commit(AuthState::anonymous());
            }
            return self.user();
        }
        self.resolve("bootstrap").await
    }

    /// Re-sync with the backend without the cached-session short-circuit.
    pub async fn refresh_user(&self) -> Option<User> {
        self.resolve("refresh").await
    }

    pub async fn login(&self, mobile: &str, password: &str) -> Result<User, AuthError> {
        let request = LoginRequest::new(mobile, password);
        if let Some(field) = request.missing_field() {
            return Err(AuthError::MissingField(field));
        }

        let generation = self.generation();
        let user = self.backend.login(&request).await.map_err(|e| {
            tracing::warn!("Login failed: {}", e);
            e
        })?;
        self.establish(generation, user, "login").await
    }

    pub async fn register(&self, registration: &Registration) -> Result<User, AuthError> {
        if let Some(field) = registration.missing_field() {
            return Err(AuthError::MissingField(field));
        }

        let generation = self.generation();
        let user = self.backend.register(registration).await.map_err(|e| {
            tracing::warn!("Registration failed: {}", e);
            e
        })?;
        self.establish(generation, user, "registration").await
    }

    /// Forget the session locally and hard-navigate to the login page.
    pub async fn logout(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.commit(AuthState::anonymous());
        self.backend.clear_credentials();
        self.cache.clear().await;
        tracing::info!("Logged out");
        self.navigator.hard_navigate(LOGIN_ROUTE);
    }

    async fn resolve(&self, context: &str) -> Option<User> {
        let generation = self.generation();
        let result = self.backend.current_user().await;

        if self.generation() != generation {
            tracing::debug!("Discarding {} result: session changed while it was in flight", context);
            return self.user();
        }

        match result {
            Ok(Some(user)) => {
                self.commit(AuthState::authenticated(user.clone()));
                if !self.persist(&user, generation).await {
                    tracing::debug!("Session changed while {} was saving the profile", context);
                    return self.user();
                }
                tracing::info!(user_id = user.id, role = user.role().as_str(), "Session resolved by {}", context);
                Some(user)
            }
            Ok(None) => {
                tracing::info!("Backend reported no user during {}", context);
                self.collapse(generation).await;
                None
            }
            Err(e) if e.is_transient() && self.policy == RefreshPolicy::KeepStale => {
                match self.user() {
                    Some(user) => {
                        tracing::warn!("Keeping last known user after {} failed: {}", context, e);
                        self.state.send_modify(|s| {
                            s.loading = false;
                            s.stale = true;
                        });
                        Some(user)
                    }
                    None => {
                        tracing::warn!("Error during {}: {}", context, e);
                        self.collapse(generation).await;
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Error during {}: {}", context, e);
                self.collapse(generation).await;
                None
            }
        }
    }

    async fn establish(&self, generation: u64, user: User, context: &str) -> Result<User, AuthError> {
        if self
            .generation
            .compare_exchange(generation, generation + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("Discarding {} result: session changed while it was in flight", context);
            return Err(AuthError::Superseded);
        }
        self.commit(AuthState::authenticated(user.clone()));
        if !self.persist(&user, generation + 1).await {
            tracing::warn!("Discarding {} result: session changed while the profile was saved", context);
            return Err(AuthError::Superseded);
        }
        tracing::info!(user_id = user.id, role = user.role().as_str(), "{} succeeded", context);
        Ok(user)
    }

    /// Save `user` to the cache. Returns false if a newer session change
    /// landed during the write, after restoring the cache to that change's state.
    async fn persist(&self, user: &User, generation: u64) -> bool {
        self.cache.save(user).await;
        if self.generation() == generation {
            return true;
        }
        self.sync_cache().await;
        false
    }

    /// Drop to anonymous. State and credentials are cleared before the first
    /// await; the cache follows.
    async fn collapse(&self, generation: u64) {
        self.commit(AuthState::anonymous());
        self.backend.clear_credentials();
        self.cache.clear().await;
        if self.generation() != generation {
            self.sync_cache().await;
        }
    }

    /// Rewrite the cache from the committed state until no session change
    /// interleaves with the write.
    async fn sync_cache(&self) {
        loop {
            let generation = self.generation();
            match self.user() {
                Some(user) => self.cache.save(&user).await,
                None => self.cache.clear().await,
            }
            if self.generation() == generation {
                return;
            }
        }
    }

    fn commit(&self, state: AuthState) {
        self.state.send_replace(state);
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use std::sync::{Arc, Mutex};
    use std::task::Poll;

    use store::{MemoryStore, PatientProfile, RoleProfile, USER_KEY};
    use tokio::sync::oneshot;

    use super::*;

    struct FakeBackend {
        login: Mutex<Result<User, ApiError>>,
        register: Mutex<Result<User, ApiError>>,
        current: Mutex<Result<Option<User>, ApiError>>,
        gate: Mutex<Option<oneshot::Receiver<()>>>,
        calls: Mutex<Vec<String>>,
        cleared: AtomicUsize,
    }

    impl FakeBackend {
        fn new() -> Self {
            Self {
                login: Mutex::new(Err(unauthorized())),
                register: Mutex::new(Err(unauthorized())),
                current: Mutex::new(Err(unauthorized())),
                gate: Mutex::new(None),
                calls: Mutex::new(Vec::new()),
                cleared: AtomicUsize::new(0),
            }
        }

        fn set_login(&self, result: Result<User, ApiError>) {
            *self.login.lock().unwrap() = result;
        }

        fn set_register(&self, result: Result<User, ApiError>) {
            *self.register.lock().unwrap() = result;
        }

        fn set_current(&self, result: Result<Option<User>, ApiError>) {
            *self.current.lock().unwrap() = result;
        }

        /// Hold the next backend call until the returned sender fires.
        fn hold_next(&self) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            *self.gate.lock().unwrap() = Some(rx);
            tx
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        async fn enter(&self, call: String) {
            self.calls.lock().unwrap().push(call);
            let gate = self.gate.lock().unwrap().take();
            if let Some(rx) = gate {
                let _ = rx.await;
            }
        }
    }

    impl AuthBackend for FakeBackend {
        async fn login(&self, request: &LoginRequest) -> Result<User, ApiError> {
            self.enter(format!("login:{}", request.mobile)).await;
            self.login.lock().unwrap().clone()
        }

        async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
            self.enter(format!("register:{}", registration.name)).await;
            self.register.lock().unwrap().clone()
        }

        async fn current_user(&self) -> Result<Option<User>, ApiError> {
            self.enter("current_user".to_string()).await;
            self.current.lock().unwrap().clone()
        }

        fn clear_credentials(&self) {
            self.cleared.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNavigator {
        visits: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingNavigator {
        fn visits(&self) -> Vec<String> {
            self.visits.lock().unwrap().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn hard_navigate(&self, path: &str) {
            self.visits.lock().unwrap().push(path.to_string());
        }
    }

    type TestSession = AuthSession<FakeBackend, MemoryStore, RecordingNavigator>;

    fn unauthorized() -> ApiError {
        ApiError::Status {
            status: 401,
            message: "Invalid mobile number or password".to_string(),
        }
    }

    fn patient(name: &str) -> User {
        User {
            id: 1,
            name: name.to_string(),
            mobile: "9999999999".to_string(),
            email: None,
            profile: RoleProfile::Patient(PatientProfile::default()),
        }
    }

    fn setup() -> (TestSession, MemoryStore, RecordingNavigator) {
        let store = MemoryStore::new();
        let nav = RecordingNavigator::default();
        let session = AuthSession::new(FakeBackend::new(), store.clone(), nav.clone());
        (session, store, nav)
    }

    async fn seed_cache(store: &MemoryStore, user: &User) {
        ProfileCache::new(store.clone()).save(user).await;
    }

    async fn cached(store: &MemoryStore) -> Option<User> {
        let raw = store.get(USER_KEY).await?;
        Some(serde_json::from_str(&raw).unwrap())
    }

    /// [`MemoryStore`] whose next write suspends once before landing.
    #[derive(Clone, Default)]
    struct SlowStore {
        inner: MemoryStore,
        pause: Arc<AtomicBool>,
    }

    impl SlowStore {
        fn pause_next_write(&self) {
            self.pause.store(true, Ordering::SeqCst);
        }
    }

    impl KeyValueStore for SlowStore {
        async fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) {
            if self.pause.swap(false, Ordering::SeqCst) {
                let mut yielded = false;
                std::future::poll_fn(|cx| {
                    if yielded {
                        Poll::Ready(())
                    } else {
                        yielded = true;
                        cx.waker().wake_by_ref();
                        Poll::Pending
                    }
                })
                .await;
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) {
            self.inner.remove(key).await
        }
    }

    fn setup_slow() -> (AuthSession<FakeBackend, SlowStore, RecordingNavigator>, SlowStore) {
        let store = SlowStore::default();
        let session = AuthSession::new(FakeBackend::new(), store.clone(), RecordingNavigator::default());
        (session, store)
    }

    /// Poll `fut` once so it runs up to its first suspension point.
    async fn start<F: Future>(mut fut: std::pin::Pin<&mut F>) {
        let first = std::future::poll_fn(|cx| Poll::Ready(fut.as_mut().poll(cx).is_pending())).await;
        assert!(first, "expected the call to suspend");
    }

    #[tokio::test]
    async fn test_initial_state_is_unresolved() {
        let (session, _, _) = setup();
        let state = session.state();
        assert_eq!(state.phase(), AuthPhase::Unresolved);
        assert!(state.loading);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_bootstrap_without_session_flag_skips_network() {
        let (session, _, _) = setup();

        assert!(session.load_user().await.is_none());

        assert!(session.backend().calls().is_empty());
        assert_eq!(session.state().phase(), AuthPhase::Anonymous);
        assert!(!session.state().loading);
    }

    #[tokio::test]
    async fn test_bootstrap_with_flag_and_failing_lookup_clears_flag() {
        let (session, store, _) = setup();
        seed_cache(&store, &patient("A")).await;
        session.backend().set_current(Err(unauthorized()));

        assert!(session.load_user().await.is_none());
        assert_eq!(session.state().phase(), AuthPhase::Anonymous);
        assert!(store.is_empty());
        assert_eq!(session.backend().cleared.load(Ordering::SeqCst), 1);
        assert_eq!(session.backend().calls(), vec!["current_user"]);

        // Flag is gone, so a second bootstrap stays local
        assert!(session.load_user().await.is_none());
        assert_eq!(session.backend().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_bootstrap_with_flag_takes_server_profile() {
        let (session, store, _) = setup();
        seed_cache(&store, &patient("Old Name")).await;
        session.backend().set_current(Ok(Some(patient("New Name"))));

        let user = session.load_user().await.unwrap();

        assert_eq!(user.name, "New Name");
        assert_eq!(session.state().phase(), AuthPhase::Authenticated);
        assert_eq!(cached(&store).await.unwrap().name, "New Name");
    }

    #[tokio::test]
    async fn test_bootstrap_with_flag_but_no_user_collapses() {
        let (session, store, _) = setup();
        seed_cache(&store, &patient("A")).await;
        session.backend().set_current(Ok(None));

        assert!(session.load_user().await.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_login_caches_profile() {
        let (session, store, _) = setup();
        session.backend().set_login(Ok(patient("A")));

        let user = session.login("9999999999", "secret").await.unwrap();

        assert_eq!(user, patient("A"));
        assert!(session.is_authenticated());
        assert_eq!(cached(&store).await, Some(patient("A")));
        assert_eq!(session.backend().calls(), vec!["login:9999999999"]);
    }

    #[tokio::test]
    async fn test_login_rejected_propagates_unchanged() {
        let (session, store, _) = setup();
        session.load_user().await;

        let err = session.login("9999999999", "wrong").await.unwrap_err();

        match err {
            AuthError::Api(api) => assert_eq!(api, unauthorized()),
            other => panic!("expected backend error, got {other:?}"),
        }
        assert!(session.user().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let (session, _, _) = setup();

        let err = session.login("  ", "secret").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingField("mobile")));
        let err = session.login("9999999999", "").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingField("password")));

        assert!(session.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn test_register_caches_profile() {
        let (session, store, _) = setup();
        session.backend().set_register(Ok(patient("New Patient")));

        let reg = Registration::new("New Patient", "9999999999", "secret")
            .with_profile(RoleProfile::Patient(PatientProfile::default()));
        let user = session.register(&reg).await.unwrap();

        assert_eq!(user.name, "New Patient");
        assert_eq!(session.state().phase(), AuthPhase::Authenticated);
        assert_eq!(cached(&store).await, Some(user));
        assert_eq!(session.backend().calls(), vec!["register:New Patient"]);
    }

    #[tokio::test]
    async fn test_register_failure_propagates() {
        let (session, store, _) = setup();
        session.backend().set_register(Err(ApiError::Status {
            status: 409,
            message: "Mobile number already registered".to_string(),
        }));

        let err = session
            .register(&Registration::new("A", "9999999999", "secret"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Mobile number already registered");
        assert!(store.is_empty());

        let err = session.register(&Registration::new("", "1", "p")).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingField("name")));
    }

    #[tokio::test]
    async fn test_logout_always_clears_and_navigates() {
        let (session, store, nav) = setup();

        // From unresolved
        session.logout().await;
        assert_eq!(session.state().phase(), AuthPhase::Anonymous);

        // From authenticated
        session.backend().set_login(Ok(patient("A")));
        session.login("9999999999", "secret").await.unwrap();
        session.logout().await;

        assert!(session.user().is_none());
        assert!(store.is_empty());
        assert_eq!(nav.visits(), vec![LOGIN_ROUTE, LOGIN_ROUTE]);
        assert_eq!(session.backend().cleared.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_picks_up_server_changes() {
        let (session, store, _) = setup();
        session.backend().set_login(Ok(patient("A")));
        session.login("9999999999", "secret").await.unwrap();

        session.backend().set_current(Ok(Some(patient("A. Renamed"))));
        let user = session.refresh_user().await.unwrap();

        assert_eq!(user.name, "A. Renamed");
        assert_eq!(session.user().unwrap().name, "A. Renamed");
        assert_eq!(cached(&store).await.unwrap().name, "A. Renamed");
    }

    #[tokio::test]
    async fn test_failed_refresh_collapses_valid_profile() {
        let (session, store, _) = setup();
        session.backend().set_login(Ok(patient("A")));
        session.login("9999999999", "secret").await.unwrap();

        session.backend().set_current(Err(ApiError::Network("connection reset".to_string())));
        assert!(session.refresh_user().await.is_none());

        assert_eq!(session.state().phase(), AuthPhase::Anonymous);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_keep_stale_survives_network_blip_only() {
        let (session, store, _) = setup();
        let session = session.with_policy(RefreshPolicy::KeepStale);
        session.backend().set_login(Ok(patient("A")));
        session.login("9999999999", "secret").await.unwrap();

        session.backend().set_current(Err(ApiError::Network("offline".to_string())));
        assert_eq!(session.refresh_user().await, Some(patient("A")));
        let state = session.state();
        assert!(state.stale);
        assert_eq!(state.phase(), AuthPhase::Authenticated);
        assert!(cached(&store).await.is_some());

        // Reconnecting clears the stale mark
        session.backend().set_current(Ok(Some(patient("A"))));
        session.refresh_user().await;
        assert!(!session.state().stale);

        // A rejected session still collapses
        session.backend().set_current(Err(unauthorized()));
        assert!(session.refresh_user().await.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_in_flight_during_logout_is_discarded() {
        let (session, store, _) = setup();
        session.backend().set_login(Ok(patient("A")));
        session.login("9999999999", "secret").await.unwrap();
        session.backend().set_current(Ok(Some(patient("A"))));

        let release = session.backend().hold_next();
        let mut refresh = std::pin::pin!(session.refresh_user());
        start(refresh.as_mut()).await;

        session.logout().await;
        release.send(()).unwrap();

        assert!(refresh.await.is_none());
        assert_eq!(session.state().phase(), AuthPhase::Anonymous);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_login_overtaken_by_logout_is_superseded() {
        let (session, store, nav) = setup();
        session.load_user().await;
        session.backend().set_login(Ok(patient("A")));

        let release = session.backend().hold_next();
        let mut login = std::pin::pin!(session.login("9999999999", "secret"));
        start(login.as_mut()).await;

        session.logout().await;
        release.send(()).unwrap();

        assert!(matches!(login.await, Err(AuthError::Superseded)));
        assert!(session.user().is_none());
        assert!(store.is_empty());
        assert_eq!(nav.visits(), vec![LOGIN_ROUTE]);
    }

    #[tokio::test]
    async fn test_register_overtaken_by_logout_is_superseded() {
        let (session, store, _) = setup();
        session.load_user().await;
        session.backend().set_register(Ok(patient("B")));

        let release = session.backend().hold_next();
        let registration = Registration::new("B", "8888888888", "secret");
        let mut register = std::pin::pin!(session.register(&registration));
        start(register.as_mut()).await;

        session.logout().await;
        release.send(()).unwrap();

        assert!(matches!(register.await, Err(AuthError::Superseded)));
        assert!(session.user().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_second_of_two_logins_to_finish_is_superseded() {
        let (session, store, _) = setup();
        session.load_user().await;
        session.backend().set_login(Ok(patient("First")));

        let release = session.backend().hold_next();
        let mut slow = std::pin::pin!(session.login("1111111111", "secret"));
        start(slow.as_mut()).await;

        session.backend().set_login(Ok(patient("Second")));
        session.login("2222222222", "secret").await.unwrap();

        session.backend().set_login(Ok(patient("First")));
        release.send(()).unwrap();

        assert!(matches!(slow.await, Err(AuthError::Superseded)));
        assert_eq!(session.user().unwrap().name, "Second");
        assert_eq!(cached(&store).await.unwrap().name, "Second");
    }

    #[tokio::test]
    async fn test_logout_during_login_cache_write_wins() {
        let (session, store) = setup_slow();
        session.load_user().await;
        session.backend().set_login(Ok(patient("A")));

        store.pause_next_write();
        let mut login = std::pin::pin!(session.login("9999999999", "secret"));
        start(login.as_mut()).await;

        session.logout().await;

        assert!(matches!(login.await, Err(AuthError::Superseded)));
        assert!(!session.is_authenticated());
        assert!(store.inner.is_empty());
    }

    #[tokio::test]
    async fn test_logout_during_refresh_cache_write_wins() {
        let (session, store) = setup_slow();
        session.backend().set_login(Ok(patient("A")));
        session.login("9999999999", "secret").await.unwrap();
        session.backend().set_current(Ok(Some(patient("A"))));

        store.pause_next_write();
        let mut refresh = std::pin::pin!(session.refresh_user());
        start(refresh.as_mut()).await;

        session.logout().await;

        assert!(refresh.await.is_none());
        assert!(!session.is_authenticated());
        assert!(store.inner.is_empty());
    }

    #[tokio::test]
    async fn test_login_during_login_cache_write_keeps_newer_profile() {
        let (session, store) = setup_slow();
        session.load_user().await;
        session.backend().set_login(Ok(patient("First")));

        store.pause_next_write();
        let mut first = std::pin::pin!(session.login("1111111111", "secret"));
        start(first.as_mut()).await;

        session.backend().set_login(Ok(patient("Second")));
        session.login("2222222222", "secret").await.unwrap();

        assert!(matches!(first.await, Err(AuthError::Superseded)));
        assert_eq!(session.user().unwrap().name, "Second");
        let raw = store.inner.get(USER_KEY).await.unwrap();
        assert_eq!(serde_json::from_str::<User>(&raw).unwrap().name, "Second");
    }

    #[tokio::test]
    async fn test_bootstrap_overtaken_by_login_keeps_login() {
        let (session, store, _) = setup();
        seed_cache(&store, &patient("Cached")).await;
        session.backend().set_current(Err(unauthorized()));
        session.backend().set_login(Ok(patient("Fresh")));

        let release = session.backend().hold_next();
        let mut bootstrap = std::pin::pin!(session.load_user());
        start(bootstrap.as_mut()).await;

        session.login("9999999999", "secret").await.unwrap();
        release.send(()).unwrap();

        // The stale 401 does not log the fresh user out
        assert_eq!(bootstrap.await.unwrap().name, "Fresh");
        assert_eq!(cached(&store).await.unwrap().name, "Fresh");
    }

    #[tokio::test]
    async fn test_subscribers_follow_changes_and_see_teardown() {
        let (session, _, _) = setup();
        let mut rx = session.subscribe();
        session.backend().set_login(Ok(patient("A")));

        session.login("9999999999", "secret").await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_authenticated());

        drop(session);
        assert!(rx.changed().await.is_err());
    }

    #[tokio::test]
    async fn test_cached_profile_is_read_only_hint() {
        let (session, store, _) = setup();
        seed_cache(&store, &patient("Cached")).await;

        assert_eq!(session.cached_profile().await.unwrap().name, "Cached");
        // Reading the hint does not authenticate
        assert!(!session.is_authenticated());
        assert!(session.backend().calls().is_empty());
    }
}
