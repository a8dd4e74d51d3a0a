//! Application core for EcoSort, a waste-classification app.
//!
//! The view shell renders snapshots and forwards user intents; every piece
//! of state lives here. Three parts matter:
//!
//! - [`SessionStore`]: token recovery at startup, login/registration, and
//!   the paced two-step logout.
//! - [`ClassificationWorkflow`]: one attempt's upload/classify/review
//!   machine, created per visit to the classification screen.
//! - [`NotificationCenter`]: the single live toast both of them announce
//!   through.
//!
//! Stores publish through `tokio::sync::watch`; a shell subscribes once and
//! re-renders from each snapshot.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod session;
pub mod workflow;

use std::sync::Arc;

use anyhow::Context;

use api::{AuthService, ClassificationService, HttpAuthService, HttpClassifyService};

pub use config::AppConfig;
pub use error::{EcosortError, Result};
pub use models::{ClassificationResult, UserProfile};
pub use notify::{Notification, NotificationCenter, Severity};
pub use session::{CredentialStore, RegistrationForm, SessionSnapshot, SessionStore};
pub use workflow::{ClassificationWorkflow, Phase, WorkflowSnapshot};

use session::FileCredentialStore;

/// Owns the long-lived stores and hands out per-visit workflows.
pub struct AppCore {
    notifier: NotificationCenter,
    session: SessionStore,
    classify_service: Arc<dyn ClassificationService>,
}

impl AppCore {
    /// Wires the core against the real HTTP services. `config.data_dir`
    /// must be writable; the credential file lives there.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("failed to create data dir {}", config.data_dir.display()))?;

        let credentials = Arc::new(FileCredentialStore::new(
            config.data_dir.join("credentials.json"),
        )?);
        let auth = Arc::new(HttpAuthService::new(&config.api_base_url)?);
        let classify_service: Arc<dyn ClassificationService> =
            Arc::new(HttpClassifyService::new(&config.api_base_url)?);

        Ok(Self::with_services(auth, classify_service, credentials))
    }

    /// Assembles the core from explicit collaborators, for tests and shells
    /// that bring their own transport or storage.
    pub fn with_services(
        auth: Arc<dyn AuthService>,
        classify_service: Arc<dyn ClassificationService>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        let notifier = NotificationCenter::new();
        let session = SessionStore::new(auth, credentials, notifier.clone());

        Self {
            notifier,
            session,
            classify_service,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifier
    }

    /// Fresh attempt for one visit to the classification screen.
    pub fn new_classification(&self) -> ClassificationWorkflow {
        ClassificationWorkflow::new(self.classify_service.clone(), self.notifier.clone())
    }
}
