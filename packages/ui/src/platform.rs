//! Platform wiring for the auth session.
//!
//! Picks the [`store::KeyValueStore`] that backs the profile cache and the
//! [`Navigator`] used for the post-logout hard reload:
//! - **Web** (WASM + `web` feature): `localStorage` via [`store::LocalStore`],
//!   navigation through `window.location`
//! - **Desktop / Mobile** (native): files under `<data_dir>/healthconnect/`
//!   via [`store::FileStore`]; hard navigation is logged only

use api::{ApiConfig, ApiError, AuthSession, HttpClient, Navigator};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStore = store::LocalStore;
#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
pub type PlatformStore = store::MemoryStore;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStore = store::FileStore;

/// The session type the app runs with.
pub type AppSession = AuthSession<HttpClient, PlatformStore, BrowserNavigator>;

/// Create the platform-appropriate profile store.
pub fn make_store() -> PlatformStore {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::LocalStore::new()
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        store::MemoryStore::new()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let base = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("healthconnect");
        store::FileStore::new(base)
    }
}

/// Build the app session from environment configuration.
pub fn make_session() -> Result<AppSession, ApiError> {
    make_session_with(ApiConfig::from_env())
}

pub fn make_session_with(config: ApiConfig) -> Result<AppSession, ApiError> {
    let policy = config.refresh_policy;
    let client = HttpClient::new(config)?;
    Ok(AuthSession::new(client, make_store(), BrowserNavigator).with_policy(policy))
}

/// Navigates by replacing `window.location`, which drops all app state.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn hard_navigate(&self, path: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.location().set_href(path) {
                    tracing::error!("Failed to navigate to {}: {:?}", path, e);
                }
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::info!("Hard navigation to {} requested; no page to reload on this platform", path);
        }
    }
}
