//! Session controller
//!
//! A [`Session`] owns the listing cache, the fetch tokens, navigation, the
//! active filter and query, the signed-in user and the admin gate. UI layers
//! drive it through intent methods and observe it through a [`ViewSink`].

pub mod mutations;
pub mod preview;
pub mod state;

pub use mutations::{Mutation, MutationOutcome, PurgeReport};
pub use preview::FolderPreview;
pub use state::SessionState;

use crate::auth::{
    AdminAuthority, AdminCapability, AdminGate, AuthProvider, SecretAuthority, StaticAuthProvider,
    User,
};
use crate::cache::{ListingCache, DEFAULT_TTL_MS};
use crate::clock::{Clock, SystemClock};
use crate::concurrency::MarkerLocks;
use crate::error::ApiError;
use crate::fetch::{FetchOrchestrator, RefreshOutcome};
use crate::listing::FilterType;
use crate::navigation::NavigationIntent;
use crate::storage::{ObjectStorage, StorageLayout};
use crate::types::{ListingContext, ViewMode};
use crate::view::{AdminPrompt, NullSink, ViewSink};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub struct SessionBuilder {
    storage: Arc<dyn ObjectStorage>,
    layout: StorageLayout,
    clock: Arc<dyn Clock>,
    ttl_ms: u64,
    authority: Arc<dyn AdminAuthority>,
    auth: Arc<dyn AuthProvider>,
    sink: Arc<dyn ViewSink>,
}

impl SessionBuilder {
    pub fn layout(mut self, layout: StorageLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    pub fn admin_authority(mut self, authority: Arc<dyn AdminAuthority>) -> Self {
        self.authority = authority;
        self
    }

    /// Shorthand for a [`SecretAuthority`] over `secret`.
    pub fn admin_secret(self, secret: Option<String>) -> Self {
        self.admin_authority(Arc::new(SecretAuthority::new(secret)))
    }

    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = auth;
        self
    }

    pub fn sink(mut self, sink: Arc<dyn ViewSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn build(self) -> Session {
        let cache = Arc::new(ListingCache::new(self.ttl_ms, self.clock.clone()));
        let fetcher = FetchOrchestrator::new(self.storage.clone(), self.layout.clone(), cache.clone());
        Session {
            storage: self.storage,
            layout: self.layout,
            clock: self.clock,
            cache,
            fetcher,
            gate: AdminGate::new(self.authority),
            auth: self.auth,
            sink: self.sink,
            markers: MarkerLocks::new(),
            state: Mutex::new(SessionState::default()),
        }
    }
}

pub struct Session {
    storage: Arc<dyn ObjectStorage>,
    layout: StorageLayout,
    clock: Arc<dyn Clock>,
    cache: Arc<ListingCache>,
    fetcher: FetchOrchestrator,
    gate: AdminGate,
    auth: Arc<dyn AuthProvider>,
    sink: Arc<dyn ViewSink>,
    markers: MarkerLocks,
    state: Mutex<SessionState>,
}

impl Session {
    pub fn builder(storage: Arc<dyn ObjectStorage>) -> SessionBuilder {
        SessionBuilder {
            storage,
            layout: StorageLayout::default(),
            clock: Arc::new(SystemClock),
            ttl_ms: DEFAULT_TTL_MS,
            authority: Arc::new(SecretAuthority::default()),
            auth: Arc::new(StaticAuthProvider::new(Vec::new())),
            sink: Arc::new(NullSink),
        }
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }

    pub fn fetcher(&self) -> &FetchOrchestrator {
        &self.fetcher
    }

    /// Copy of the current UI state.
    pub fn snapshot(&self) -> SessionState {
        self.state.lock().clone()
    }

    pub fn context(&self) -> ListingContext {
        self.state.lock().context()
    }

    /// Refresh the current context's listing.
    pub async fn refresh(&self) -> RefreshOutcome {
        let (context, view) = {
            let state = self.state.lock();
            (state.context(), state.listing_view(self.gate.is_authorized()))
        };
        self.fetcher.refresh(&context, &view, self.sink.as_ref()).await
    }

    pub async fn on_navigate(&self, intent: NavigationIntent) -> RefreshOutcome {
        {
            let mut state = self.state.lock();
            state.navigation.apply(intent);
            debug!(context = %state.context(), "Navigated");
        }
        self.refresh().await
    }

    pub async fn on_filter_change(&self, filter: FilterType) -> RefreshOutcome {
        self.state.lock().filter = filter;
        self.refresh().await
    }

    pub async fn on_search_change(&self, query: &str) -> RefreshOutcome {
        self.state.lock().set_query(query);
        self.refresh().await
    }

    pub async fn toggle_view_mode(&self) -> ViewMode {
        let mode = {
            let mut state = self.state.lock();
            state.view_mode = state.view_mode.toggled();
            state.view_mode
        };
        self.refresh().await;
        mode
    }

    /// Unlock the admin gate and re-render with admin controls.
    pub async fn authorize_admin(&self, attempt: &str) -> Result<(), ApiError> {
        self.gate.authorize(attempt).await?;
        self.refresh().await;
        Ok(())
    }

    /// Lock an open gate, or ask for the password when it is locked.
    pub async fn toggle_admin_lock(&self) -> Option<AdminPrompt> {
        if self.gate.is_authorized() {
            self.gate.lock();
            self.refresh().await;
            None
        } else {
            let prompt = self.admin_prompt();
            self.sink.admin_prompt(prompt);
            Some(prompt)
        }
    }

    fn admin_prompt(&self) -> AdminPrompt {
        if self.gate.is_configured() {
            AdminPrompt::Locked
        } else {
            AdminPrompt::NotConfigured
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let user = self.auth.sign_in(email, password).await?;
        self.on_auth_state(Some(user.clone())).await;
        Ok(user)
    }

    pub async fn sign_out(&self) -> Result<(), ApiError> {
        self.auth.sign_out().await?;
        self.on_auth_state(None).await;
        Ok(())
    }

    /// Apply a session transition reported by the auth provider.
    ///
    /// Repeated reports of the same state are ignored. Signing in loads the
    /// current listing; signing out locks the gate, returns to root and
    /// clears the cache.
    pub async fn on_auth_state(&self, user: Option<User>) -> Option<RefreshOutcome> {
        {
            let mut state = self.state.lock();
            if state.user == user {
                return None;
            }
            state.user = user.clone();
            if user.is_none() {
                state.navigation.reset();
            }
        }

        match user {
            Some(user) => {
                info!(email = %user.email, "Session started");
                Some(self.refresh().await)
            }
            None => {
                self.gate.lock();
                self.cache.clear();
                info!("Session ended");
                None
            }
        }
    }

    /// Follow the auth provider's state on a background task.
    ///
    /// The task applies the state seen at subscription and every change after
    /// it. It ends once the session is dropped or the provider stops publishing.
    pub fn watch_auth(self: &Arc<Self>) -> JoinHandle<()> {
        let session = Arc::downgrade(self);
        let mut rx = self.auth.subscribe();
        tokio::spawn(async move {
            loop {
                let user = rx.borrow_and_update().clone();
                match session.upgrade() {
                    Some(session) => {
                        session.on_auth_state(user).await;
                    }
                    None => break,
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
            debug!("Auth watch ended");
        })
    }

    /// Capability for a mutation; prompts for the password when locked.
    fn require_admin(&self) -> Result<AdminCapability, ApiError> {
        self.gate.require().map_err(|e| {
            self.sink.admin_prompt(self.admin_prompt());
            e
        })
    }
}
