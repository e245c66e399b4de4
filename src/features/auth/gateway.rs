use crate::api::{ApiClient, ApiError};
use crate::features::auth::client;
use crate::features::auth::resolver::{self, Resolution};
use crate::features::auth::store::TokenStore;
use crate::features::auth::types::{Session, SessionState, TokenPair};
use reqwest::multipart::Form;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

/// Owner of the session state machine and the single place allowed to mutate
/// it. Also the shared authenticated-request helper: every protected call
/// goes through the `get_json`/`post_json`/… methods here, which inject the
/// bearer token and force a local logout when the backend says the session is
/// no longer valid.
///
/// State machine: `Initializing` → `Unauthenticated` | `Authenticated`, then
/// back and forth via `login`/`logout` for the life of the process.
pub struct AuthGateway {
    api: ApiClient,
    store: TokenStore,
    session: RwLock<Session>,
    /// Bumped on every resolution request; a finished resolution only
    /// commits if it still carries the latest value (last token wins).
    generation: AtomicU64,
}

impl AuthGateway {
    #[must_use]
    pub fn new(api: ApiClient, store: TokenStore) -> Self {
        Self {
            api,
            store,
            session: RwLock::new(Session::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// The underlying client, for endpoints that take no bearer token.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Read-only copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.read().tokens.as_ref().map(|t| t.access.clone())
    }

    /// Startup transition out of `Initializing`: load the persisted pair and
    /// resolve it. With nothing stored this settles to `Unauthenticated`
    /// without a network call.
    pub async fn initialize(&self) {
        let tokens = self.store.load();
        self.resolve(tokens).await;
    }

    /// Store the pair and confirm it with one profile fetch. Login is not
    /// complete until the profile resolves; on failure the new pair is not
    /// persisted and the session is left cleared. A rejection also clears
    /// any previously stored pair; a transport failure keeps it.
    ///
    /// # Errors
    /// Returns the profile-fetch error when the new tokens cannot be
    /// confirmed.
    pub async fn login(&self, access: &str, refresh: &str) -> Result<(), ApiError> {
        let generation = self.next_generation();

        match client::fetch_profile(&self.api, access).await {
            Ok(profile) => {
                let tokens = TokenPair {
                    access: access.to_string(),
                    refresh: refresh.to_string(),
                };

                if let Err(e) = self.store.save(&tokens) {
                    warn!("failed to persist tokens: {e}");
                }

                self.commit(
                    generation,
                    Session {
                        tokens: Some(tokens),
                        user: Some(profile),
                        state: SessionState::Authenticated,
                    },
                );

                Ok(())
            }
            Err(err) => {
                self.commit(generation, Self::cleared());

                // A transport failure says nothing about the previously
                // stored pair; only a rejection burns it.
                if err.is_auth() {
                    self.store.clear();
                }

                Err(err)
            }
        }
    }

    /// Clear the session in memory and in the store. Unconditionally
    /// effective locally and idempotent; backend notification is the
    /// caller's (best-effort) concern.
    pub fn logout(&self) {
        {
            // Bump and clear under one guard so no in-flight resolution can
            // slot its session in between.
            let mut session = self.write();
            self.next_generation();
            *session = Self::cleared();
        }

        self.store.clear();

        debug!("session cleared");
    }

    /// Resolve a token pair into a session, last token wins.
    async fn resolve(&self, tokens: Option<TokenPair>) {
        let generation = self.next_generation();

        let Some(tokens) = tokens else {
            self.commit(generation, Self::cleared());
            return;
        };

        match resolver::resolve(&self.api, &tokens.access).await {
            Resolution::Authenticated(profile) => {
                self.commit(
                    generation,
                    Session {
                        tokens: Some(tokens),
                        user: Some(profile),
                        state: SessionState::Authenticated,
                    },
                );
            }
            Resolution::Invalid => {
                if self.commit(generation, Self::cleared()) {
                    self.store.clear();
                }
            }
            Resolution::Unreachable => {
                // Transient failure: stay logged out for now but keep the
                // pair stored so a later run can try again.
                self.commit(
                    generation,
                    Session {
                        tokens: Some(tokens),
                        user: None,
                        state: SessionState::Unauthenticated,
                    },
                );
            }
        }
    }

    fn cleared() -> Session {
        Session {
            tokens: None,
            user: None,
            state: SessionState::Unauthenticated,
        }
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply a resolved session unless a newer resolution has been requested
    /// since. Returns whether the commit happened. The generation check and
    /// the write happen under the same guard; `logout` bumps the generation
    /// under that guard too, so a stale commit can never land after it.
    fn commit(&self, generation: u64, session: Session) -> bool {
        let mut guard = self.write();

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding stale session resolution");
            return false;
        }

        *guard = session;
        true
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn require_token(&self) -> Result<String, ApiError> {
        self.access_token().ok_or(ApiError::Auth { status: 401 })
    }

    /// 401/403 from a protected call means the session is gone; enforce the
    /// convention in one place instead of at every call site.
    fn guard<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(err) = &result {
            if err.is_auth() {
                warn!("authorization rejected, clearing session");
                self.logout();
            }
        }

        result
    }

    /// Authorized GET.
    ///
    /// # Errors
    /// `Auth` without a network call when no session exists; otherwise the
    /// underlying request error.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let token = self.require_token()?;
        self.guard(self.api.get_json(path, Some(&token)).await)
    }

    /// GET with the bearer token attached only when a session exists, for
    /// endpoints that serve both visitors and members.
    ///
    /// # Errors
    /// Returns the underlying request error.
    pub async fn get_json_optional_auth<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        match self.access_token() {
            Some(token) => self.guard(self.api.get_json(path, Some(&token)).await),
            None => self.api.get_json(path, None).await,
        }
    }

    /// Authorized POST with a JSON body and JSON response.
    ///
    /// # Errors
    /// Same contract as [`Self::get_json`].
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let token = self.require_token()?;
        self.guard(self.api.post_json(path, body, Some(&token)).await)
    }

    /// Authorized POST where only the status matters.
    ///
    /// # Errors
    /// Same contract as [`Self::get_json`].
    pub async fn post_json_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let token = self.require_token()?;
        self.guard(self.api.post_json_unit(path, body, Some(&token)).await)
    }

    /// Authorized bodyless POST (like/follow toggles).
    ///
    /// # Errors
    /// Same contract as [`Self::get_json`].
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        let token = self.require_token()?;
        self.guard(self.api.post_empty(path, Some(&token)).await)
    }

    /// Authorized multipart POST.
    ///
    /// # Errors
    /// Same contract as [`Self::get_json`].
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let token = self.require_token()?;
        self.guard(self.api.post_multipart(path, form, Some(&token)).await)
    }

    /// Authorized multipart PUT.
    ///
    /// # Errors
    /// Same contract as [`Self::get_json`].
    pub async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let token = self.require_token()?;
        self.guard(self.api.put_multipart(path, form, Some(&token)).await)
    }

    /// Authorized DELETE.
    ///
    /// # Errors
    /// Same contract as [`Self::get_json`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let token = self.require_token()?;
        self.guard(self.api.delete(path, Some(&token)).await)
    }
}
