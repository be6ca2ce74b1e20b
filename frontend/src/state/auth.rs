use std::{cell::Cell, rc::Rc};

use leptos::*;

use super::session::{self, AuthError, Profile};
use crate::{
    api::{ApiClient, LoginRequest, UserRecord},
    utils::storage::{self as storage_utils, KeyValueStorage},
};

/// Read-only snapshot of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub identity: Option<UserRecord>,
    pub profile: Option<Profile>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self::restoring()
    }
}

impl AuthState {
    pub fn restoring() -> Self {
        Self {
            identity: None,
            profile: None,
            loading: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            loading: false,
            ..Self::restoring()
        }
    }

    pub fn signed_in(user: &UserRecord) -> Self {
        let mut state = Self::signed_out();
        state.set_user(user);
        state
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    fn set_user(&mut self, user: &UserRecord) {
        self.profile = Some(Profile::from(user));
        self.identity = Some(user.clone());
    }

    fn clear_user(&mut self) {
        self.identity = None;
        self.profile = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl From<Credentials> for LoginRequest {
    fn from(credentials: Credentials) -> Self {
        LoginRequest {
            email: credentials.identifier,
            password: credentials.secret,
        }
    }
}

/// Released when the sign-in future completes or is dropped.
struct PendingSignIn(Rc<Cell<bool>>);

impl PendingSignIn {
    fn acquire(flag: &Rc<Cell<bool>>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(Rc::clone(flag)))
        }
    }
}

impl Drop for PendingSignIn {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Owns the in-memory session and is the only writer of the persisted one.
#[derive(Clone)]
pub struct SessionStore {
    api: Rc<ApiClient>,
    storage: Rc<dyn KeyValueStorage>,
    state: RwSignal<AuthState>,
    sign_in_pending: Rc<Cell<bool>>,
}

impl SessionStore {
    pub fn new(api: Rc<ApiClient>, storage: Rc<dyn KeyValueStorage>) -> Self {
        Self {
            api,
            storage,
            state: create_rw_signal(AuthState::restoring()),
            sign_in_pending: Rc::new(Cell::new(false)),
        }
    }

    pub fn state(&self) -> ReadSignal<AuthState> {
        self.state.read_only()
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.get_untracked()
    }

    pub fn is_signing_in(&self) -> bool {
        self.sign_in_pending.get()
    }

    /// Restores the persisted session. Only the first call does anything;
    /// `loading` is cleared whatever the outcome.
    pub fn initialize(&self) {
        if !self.state.with_untracked(|state| state.loading) {
            log::debug!("Session already restored; skipping");
            return;
        }

        let restored = match session::load(self.storage.as_ref()) {
            Ok(Some(stored)) => {
                log::info!("Restored session for user {}", stored.user.id);
                Some(stored.user)
            }
            Ok(None) => None,
            Err(err) => {
                log::warn!("Discarding persisted session: {}", err);
                None
            }
        };
        // Leftover keys from a partial record must not outlive "no session".
        if restored.is_none() {
            if let Err(err) = session::clear(self.storage.as_ref()) {
                log::warn!("Failed to clear persisted session: {}", err);
            }
        }

        self.state.update(|state| {
            if state.identity.is_none() {
                if let Some(user) = &restored {
                    state.set_user(user);
                }
            }
            state.loading = false;
        });
    }

    /// Verifies credentials, persists the session, then publishes it.
    /// A second call while one is pending fails with `SignInPending`.
    pub async fn sign_in(&self, credentials: Credentials) -> Result<UserRecord, AuthError> {
        let _pending =
            PendingSignIn::acquire(&self.sign_in_pending).ok_or(AuthError::SignInPending)?;

        let request = LoginRequest::from(credentials);
        let response = self.api.login(&request).await.map_err(|err| {
            log::info!("Sign-in rejected ({}): {}", err.code, err.error);
            AuthError::from(err)
        })?;

        session::persist(self.storage.as_ref(), &response)?;
        self.state.update(|state| state.set_user(&response.user));
        log::info!(
            "Signed in user {} as {}",
            response.user.id,
            response.user.role
        );
        Ok(response.user)
    }

    /// Clears the session locally, then asks the backend to invalidate the
    /// token. Invalidation failures are logged and ignored. Does nothing
    /// while signed out.
    pub async fn sign_out(&self) {
        if !self.state.with_untracked(AuthState::is_authenticated) {
            log::debug!("Sign-out requested while already signed out");
            return;
        }
        let (access_token, refresh_token) = session::tokens(self.storage.as_ref());

        if let Err(err) = session::clear(self.storage.as_ref()) {
            log::warn!("Failed to clear persisted session: {}", err);
        }
        self.state.update(AuthState::clear_user);

        if let Some(token) = access_token {
            if let Err(err) = self.api.logout(&token, refresh_token).await {
                log::warn!("Session invalidation failed (ignored): {}", err);
            }
        }
        log::info!("Signed out");
    }

    /// Re-derives the profile from the stored user record. The identity is
    /// left as it is.
    pub fn refresh_profile(&self) {
        if !self.state.with_untracked(AuthState::is_authenticated) {
            return;
        }
        let profile = match session::load_user(self.storage.as_ref()) {
            Ok(user) => user.as_ref().map(Profile::from),
            Err(err) => {
                log::warn!("Stored profile is unreadable: {}", err);
                None
            }
        };
        if profile.is_none() {
            log::warn!("No stored profile for the signed-in user");
        }
        self.state.update(|state| state.profile = profile);
    }

    #[cfg(test)]
    pub(crate) fn overwrite_state_for_test(&self, state: AuthState) {
        self.state.set(state);
    }
}

fn create_session_store() -> SessionStore {
    let api = use_context::<ApiClient>().unwrap_or_default();
    let store = SessionStore::new(Rc::new(api), storage_utils::default_storage());
    store.initialize();
    store
}

#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    provide_context(create_session_store());
    view! { <>{children()}</> }
}

pub fn use_session() -> SessionStore {
    use_context::<SessionStore>().unwrap_or_else(create_session_store)
}

pub fn use_auth() -> ReadSignal<AuthState> {
    use_session().state()
}

pub fn use_sign_in_action() -> Action<Credentials, Result<UserRecord, AuthError>> {
    let store = use_session();
    create_action(move |credentials: &Credentials| {
        let store = store.clone();
        let credentials = credentials.clone();
        async move { store.sign_in(credentials).await }
    })
}

pub fn use_sign_out_action() -> Action<(), ()> {
    let store = use_session();
    create_action(move |_: &()| {
        let store = store.clone();
        async move { store.sign_out().await }
    })
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::helpers::{credentials, login_json, user_record};
    use crate::utils::storage::MemoryStorage;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn store_for(server: &MockServer, storage: &MemoryStorage) -> SessionStore {
        SessionStore::new(
            Rc::new(ApiClient::new_with_base_url(server.url("/api"))),
            Rc::new(storage.clone()),
        )
    }

    #[tokio::test]
    async fn sign_in_persists_and_survives_reload() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login/");
            then.status(200).json_body(login_json("u1", "doctor"));
        });

        let runtime = create_runtime();
        let storage = MemoryStorage::new();
        let store = store_for(&server, &storage);
        store.initialize();

        let user = store.sign_in(credentials()).await.unwrap();
        assert_eq!(user, user_record("u1", "doctor"));
        let state = store.snapshot();
        assert_eq!(state.identity.as_ref(), Some(&user));
        assert_eq!(state.profile, Some(Profile::from(&user)));
        assert!(!store.is_signing_in());

        let reloaded = store_for(&server, &storage);
        reloaded.initialize();
        assert_eq!(reloaded.snapshot().profile, state.profile);
        assert_eq!(
            reloaded.snapshot().profile.unwrap().role().unwrap(),
            crate::state::access::Role::Doctor
        );
        runtime.dispose();
    }

    #[tokio::test]
    async fn invalid_credentials_leave_state_untouched() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/auth/login/")
                .json_body(json!({ "email": "dana@example.org", "password": "secret" }));
            then.status(200).json_body(login_json("u1", "staff"));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/auth/login/")
                .json_body(json!({ "email": "dana@example.org", "password": "wrong" }));
            then.status(401)
                .json_body(json!({ "error": "Invalid credentials" }));
        });

        let runtime = create_runtime();
        let storage = MemoryStorage::new();
        let store = store_for(&server, &storage);
        store.initialize();

        let err = store
            .sign_in(Credentials {
                secret: "wrong".into(),
                ..credentials()
            })
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials("Invalid credentials".into()));
        assert_eq!(store.snapshot(), AuthState::signed_out());
        assert!(storage.is_empty());

        store.sign_in(credentials()).await.unwrap();
        let before = store.snapshot();
        let err = store
            .sign_in(Credentials {
                secret: "wrong".into(),
                ..credentials()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_CREDENTIALS");
        assert_eq!(store.snapshot(), before);
        assert!(!store.is_signing_in());
        runtime.dispose();
    }

    #[tokio::test]
    async fn missing_profile_at_sign_in_is_reported() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login/");
            then.status(404).json_body(json!({ "error": "Profile not found" }));
        });

        let runtime = create_runtime();
        let store = store_for(&server, &MemoryStorage::new());
        store.initialize();
        let err = store.sign_in(credentials()).await.unwrap_err();
        assert_eq!(err, AuthError::MissingProfile);
        assert_eq!(store.snapshot(), AuthState::signed_out());
        runtime.dispose();
    }

    #[tokio::test]
    async fn concurrent_sign_in_is_rejected() {
        let server = MockServer::start_async().await;
        let login = server.mock(|when, then| {
            when.method(POST).path("/api/auth/login/");
            then.status(200)
                .delay(Duration::from_millis(100))
                .json_body(login_json("u1", "patient"));
        });

        let runtime = create_runtime();
        let store = store_for(&server, &MemoryStorage::new());
        store.initialize();

        let (first, second) = futures::join!(
            store.sign_in(credentials()),
            store.sign_in(credentials())
        );
        assert_eq!(first.unwrap().id, "u1");
        assert_eq!(second.unwrap_err(), AuthError::SignInPending);
        assert_eq!(login.hits(), 1);
        assert!(!store.is_signing_in());
        runtime.dispose();
    }

    #[tokio::test]
    async fn hung_sign_in_times_out() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login/");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(login_json("u1", "patient"));
        });

        let runtime = create_runtime();
        let storage = MemoryStorage::new();
        let store = SessionStore::new(
            Rc::new(
                ApiClient::new_with_base_url(server.url("/api"))
                    .with_timeout(Duration::from_millis(50)),
            ),
            Rc::new(storage.clone()),
        );
        store.initialize();

        let err = store.sign_in(credentials()).await.unwrap_err();
        assert!(matches!(err, AuthError::Timeout(_)));
        assert_eq!(store.snapshot(), AuthState::signed_out());
        assert!(storage.is_empty());
        runtime.dispose();
    }

    #[tokio::test]
    async fn sign_out_is_idempotent() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login/");
            then.status(200).json_body(login_json("u1", "admin"));
        });
        let logout = server.mock(|when, then| {
            when.method(POST)
                .path("/api/auth/logout/")
                .header("authorization", "Bearer access-u1")
                .json_body(json!({ "refresh": "refresh-u1" }));
            then.status(200).json_body(json!({}));
        });

        let runtime = create_runtime();
        let storage = MemoryStorage::new();
        let store = store_for(&server, &storage);
        store.initialize();
        store.sign_in(credentials()).await.unwrap();

        store.sign_out().await;
        let once = store.snapshot();
        store.sign_out().await;
        let twice = store.snapshot();

        assert_eq!(once, AuthState::signed_out());
        assert_eq!(once, twice);
        assert!(storage.is_empty());
        assert_eq!(logout.hits(), 1);
        runtime.dispose();
    }

    #[tokio::test]
    async fn sign_out_after_partial_record_stays_local() {
        let server = MockServer::start_async().await;
        let logout = server.mock(|when, then| {
            when.method(POST).path("/api/auth/logout/");
            then.status(200).json_body(json!({}));
        });

        let runtime = create_runtime();
        let storage = MemoryStorage::new();
        storage.set("access_token", "stale").unwrap();
        let store = store_for(&server, &storage);
        store.initialize();
        assert_eq!(store.snapshot(), AuthState::signed_out());

        // A token written behind the store's back is not a session either.
        storage.set("access_token", "stale").unwrap();
        store.sign_out().await;

        assert_eq!(store.snapshot(), AuthState::signed_out());
        assert_eq!(storage.get("access_token").unwrap().as_deref(), Some("stale"));
        assert_eq!(logout.hits(), 0);
        runtime.dispose();
    }

    #[tokio::test]
    async fn sign_out_ignores_invalidation_failures() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login/");
            then.status(200).json_body(login_json("u1", "staff"));
        });
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/logout/");
            then.status(500).json_body(json!({ "error": "down" }));
        });

        let runtime = create_runtime();
        let storage = MemoryStorage::new();
        let store = store_for(&server, &storage);
        store.initialize();
        store.sign_in(credentials()).await.unwrap();

        store.sign_out().await;
        assert_eq!(store.snapshot(), AuthState::signed_out());
        assert!(storage.is_empty());
        runtime.dispose();
    }

    #[tokio::test]
    async fn refresh_profile_picks_up_stored_changes() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login/");
            then.status(200).json_body(login_json("u1", "staff"));
        });

        let runtime = create_runtime();
        let storage = MemoryStorage::new();
        let store = store_for(&server, &storage);
        store.initialize();
        let user = store.sign_in(credentials()).await.unwrap();

        let promoted = UserRecord {
            role: "doctor".into(),
            ..user.clone()
        };
        storage
            .set("user", &serde_json::to_string(&promoted).unwrap())
            .unwrap();
        store.refresh_profile();
        let state = store.snapshot();
        assert_eq!(state.identity, Some(user.clone()));
        assert_eq!(state.profile.unwrap().role, "doctor");

        storage.remove("user").unwrap();
        store.refresh_profile();
        let state = store.snapshot();
        assert_eq!(state.identity, Some(user));
        assert!(state.profile.is_none());
        runtime.dispose();
    }
}
