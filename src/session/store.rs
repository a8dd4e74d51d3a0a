//! Session lifecycle: startup token recovery, login, registration, and the
//! paced two-step logout.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::api::{AuthService, LoginResponse};
use crate::error::Result;
use crate::notify::{NotificationCenter, Severity};

use super::registration::RegistrationForm;
use super::state::{SessionSnapshot, SessionState};
use super::token::CredentialStore;

/// Session toasts linger slightly longer than workflow toasts.
const SESSION_TOAST_TTL: Duration = Duration::from_millis(3200);
/// Gap between the "processing" toast and the actual sign-out, so the first
/// toast is readable before the view swaps underneath it.
const LOGOUT_DELAY: Duration = Duration::from_secs(2);

const LOGOUT_PENDING_MESSAGE: &str = "Processing logout...";
const LOGOUT_DONE_MESSAGE: &str = "You have been successfully logged out.";

#[derive(Clone)]
pub struct SessionStore {
    state: Arc<Mutex<SessionState>>,
    auth: Arc<dyn AuthService>,
    credentials: Arc<dyn CredentialStore>,
    notifier: NotificationCenter,
    /// Cancels a not-yet-fired delayed logout when a newer login or logout
    /// supersedes it.
    pending_logout: Arc<Mutex<Option<CancellationToken>>>,
    watch_tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionStore {
    pub fn new(
        auth: Arc<dyn AuthService>,
        credentials: Arc<dyn CredentialStore>,
        notifier: NotificationCenter,
    ) -> Self {
        let state = SessionState::new();
        let (watch_tx, _) = watch::channel(state.snapshot());

        Self {
            state: Arc::new(Mutex::new(state)),
            auth,
            credentials,
            notifier,
            pending_logout: Arc::new(Mutex::new(None)),
            watch_tx: Arc::new(watch_tx),
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Receiver that yields a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.watch_tx.subscribe()
    }

    fn publish(&self, state: &SessionState) {
        self.watch_tx.send_replace(state.snapshot());
    }

    /// One-time startup pass: recover a persisted token, resolve its user,
    /// then drop the loading gate. Without a token this touches the network
    /// zero times. A second call is ignored.
    pub async fn bootstrap(&self) -> Result<()> {
        {
            let guard = self.state.lock().await;
            if !guard.loading {
                warn!("bootstrap called more than once; ignoring");
                return Ok(());
            }
        }

        let outcome = self.recover_session().await;

        // The loading gate drops exactly once, recovered or not.
        let mut guard = self.state.lock().await;
        guard.loading = false;
        self.publish(&guard);
        info!(
            "session bootstrap complete (authenticated: {})",
            guard.user.is_some()
        );
        outcome
    }

    async fn recover_session(&self) -> Result<()> {
        let Some(token) = self.credentials.get()? else {
            return Ok(());
        };
        {
            let mut guard = self.state.lock().await;
            guard.token = Some(token.clone());
            self.publish(&guard);
        }
        self.resolve_active_user(&token).await;
        Ok(())
    }

    /// Exchanges credentials for a token, persists and activates it, then
    /// resolves the profile. On a rejected login nothing is mutated.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let response = self.auth.login(email, password).await?;

        // A successful login supersedes any delayed logout still pending.
        self.cancel_pending_logout().await;

        self.credentials.set(&response.token)?;
        {
            let mut guard = self.state.lock().await;
            guard.token = Some(response.token.clone());
            self.publish(&guard);
        }
        self.resolve_active_user(&response.token).await;
        info!("login accepted");
        Ok(response)
    }

    /// Signs the user out. With `announce` the clearing is deferred behind a
    /// "processing" toast; without it state and storage are cleared
    /// immediately and no toast is shown.
    pub async fn logout(&self, announce: bool) {
        self.cancel_pending_logout().await;

        if !announce {
            self.clear_session().await;
            info!("silent logout complete");
            return;
        }

        self.notifier
            .show(LOGOUT_PENDING_MESSAGE, Severity::Info, SESSION_TOAST_TTL)
            .await;

        let cancel = CancellationToken::new();
        *self.pending_logout.lock().await = Some(cancel.clone());

        let store = self.clone();
        // Created here, not inside the task, so the delay anchors at
        // logout-time rather than at the task's first poll.
        let delay = tokio::time::sleep(LOGOUT_DELAY);
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("pending logout superseded");
                }
                _ = delay => {
                    store.clear_session().await;
                    store
                        .notifier
                        .show(LOGOUT_DONE_MESSAGE, Severity::Success, SESSION_TOAST_TTL)
                        .await;
                    info!("logout complete");
                }
            }
        });
    }

    /// Validates the form locally, then registers with the service. A form
    /// that fails validation produces zero network calls.
    pub async fn register(&self, form: &RegistrationForm) -> Result<()> {
        form.validate()?;
        self.auth.register(&form.to_request()).await
    }

    /// Shared by bootstrap and login. Any resolve failure means the token is
    /// no good, so the session is cleared without ceremony.
    async fn resolve_active_user(&self, token: &str) {
        match self.auth.resolve_user(token).await {
            Ok(profile) => {
                let mut guard = self.state.lock().await;
                if guard.token.as_deref() == Some(token) {
                    guard.user = Some(profile);
                    self.publish(&guard);
                } else {
                    warn!("resolved a profile for a superseded token; discarding");
                }
            }
            Err(err) => {
                warn!("could not resolve user, token may be invalid: {err}");
                self.clear_session().await;
            }
        }
    }

    async fn clear_session(&self) {
        if let Err(err) = self.credentials.remove() {
            log::error!("failed to remove persisted token: {err}");
        }
        let mut guard = self.state.lock().await;
        guard.token = None;
        guard.user = None;
        self.publish(&guard);
    }

    async fn cancel_pending_logout(&self) {
        if let Some(token) = self.pending_logout.lock().await.take() {
            token.cancel();
        }
    }
}
