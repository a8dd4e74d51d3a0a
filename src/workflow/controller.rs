//! State machine for one classification attempt, from dropped file to tips.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use crate::api::{ClassificationService, ImageUpload};
use crate::error::{EcosortError, Result};
use crate::notify::{NotificationCenter, Severity};

use super::state::{Phase, SelectedImage, WorkflowSnapshot, WorkflowState};

/// Workflow toasts use the short window; session toasts linger longer.
const WORKFLOW_TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct ClassificationWorkflow {
    id: Uuid,
    state: Arc<Mutex<WorkflowState>>,
    service: Arc<dyn ClassificationService>,
    notifier: NotificationCenter,
    watch_tx: Arc<watch::Sender<WorkflowSnapshot>>,
}

impl ClassificationWorkflow {
    /// Fresh attempt in `Idle`. Each visit to the classification screen gets
    /// its own instance; finished attempts are simply dropped.
    pub fn new(service: Arc<dyn ClassificationService>, notifier: NotificationCenter) -> Self {
        let state = WorkflowState::default();
        let (watch_tx, _) = watch::channel(state.snapshot());

        Self {
            id: Uuid::new_v4(),
            state: Arc::new(Mutex::new(state)),
            service,
            notifier,
            watch_tx: Arc::new(watch_tx),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        self.state.lock().await.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.watch_tx.subscribe()
    }

    fn publish(&self, state: &WorkflowState) {
        self.watch_tx.send_replace(state.snapshot());
    }

    /// Stages a selected file and moves to `Previewing`. Replaces any prior
    /// selection (deleting its preview file) and discards a prior result. A
    /// rejected file leaves the existing state untouched.
    pub async fn select_image(&self, bytes: Vec<u8>, file_name: &str) -> Result<()> {
        let mut guard = self.state.lock().await;
        if guard.phase == Phase::Submitting {
            return Err(EcosortError::invalid_transition(
                "select image",
                guard.phase.as_str(),
            ));
        }

        let staged = SelectedImage::stage(bytes, file_name)?;
        info!(
            "workflow {}: staged '{}' ({} bytes)",
            self.id,
            staged.file_name,
            staged.bytes.len()
        );
        guard.selected = Some(staged);
        guard.result = None;
        guard.phase = Phase::Previewing;
        self.publish(&guard);
        Ok(())
    }

    /// Uploads the staged image and waits for the verdict. Exactly one
    /// submission can be in flight; a failed one returns to `Previewing`
    /// with the selection intact and the error surfaced as a toast.
    pub async fn classify(&self) -> Result<()> {
        let (upload, my_seq) = {
            let mut guard = self.state.lock().await;
            match guard.phase {
                Phase::Submitting => return Err(EcosortError::SubmissionInFlight),
                Phase::Result | Phase::Tips => {
                    return Err(EcosortError::invalid_transition(
                        "classify",
                        guard.phase.as_str(),
                    ))
                }
                Phase::Idle | Phase::Previewing => {}
            }
            let Some(selected) = guard.selected.as_ref() else {
                return Err(EcosortError::NoFileSelected);
            };

            let upload = ImageUpload {
                bytes: selected.bytes.clone(),
                file_name: selected.file_name.clone(),
                mime: selected.mime().to_string(),
            };
            guard.submit_seq += 1;
            guard.phase = Phase::Submitting;
            self.publish(&guard);
            (upload, guard.submit_seq)
        };

        // No lock across the upload; the fence below re-checks currency.
        let outcome = self.service.classify(upload).await;

        let mut guard = self.state.lock().await;
        if guard.submit_seq != my_seq || guard.phase != Phase::Submitting {
            warn!("workflow {}: discarding stale classification outcome", self.id);
            return Ok(());
        }

        match outcome {
            Ok(result) => {
                if let Err(err) = result.validate_confidence() {
                    warn!("workflow {}: {err}", self.id);
                    guard.phase = Phase::Previewing;
                    self.publish(&guard);
                    drop(guard);
                    self.notifier
                        .show(err.to_string(), Severity::Error, WORKFLOW_TOAST_TTL)
                        .await;
                    return Err(err);
                }
                info!(
                    "workflow {}: classified as '{}' at {}%",
                    self.id, result.label, result.confidence_percent
                );
                guard.result = Some(result);
                guard.phase = Phase::Result;
                self.publish(&guard);
                Ok(())
            }
            Err(err) => {
                guard.phase = Phase::Previewing;
                self.publish(&guard);
                drop(guard);
                self.notifier
                    .show(err.to_string(), Severity::Error, WORKFLOW_TOAST_TTL)
                    .await;
                Err(err)
            }
        }
    }

    /// `Result` to `Tips`. The result stays loaded for the way back.
    pub async fn show_tips(&self) -> Result<()> {
        let mut guard = self.state.lock().await;
        if guard.phase != Phase::Result || guard.result.is_none() {
            return Err(EcosortError::invalid_transition(
                "show tips",
                guard.phase.as_str(),
            ));
        }
        guard.phase = Phase::Tips;
        self.publish(&guard);
        Ok(())
    }

    /// `Tips` back to `Result`, with the result unchanged.
    pub async fn back_to_results(&self) -> Result<()> {
        let mut guard = self.state.lock().await;
        if guard.phase != Phase::Tips {
            return Err(EcosortError::invalid_transition(
                "back to results",
                guard.phase.as_str(),
            ));
        }
        guard.phase = Phase::Result;
        self.publish(&guard);
        Ok(())
    }

    /// Terminal acknowledgement from the result or tips screen. Navigation
    /// is the caller's job; the attempt keeps its state and a new attempt is
    /// a new instance.
    pub async fn done(&self) -> Result<()> {
        let guard = self.state.lock().await;
        match guard.phase {
            Phase::Result | Phase::Tips => {
                info!("workflow {}: attempt finished", self.id);
                Ok(())
            }
            other => Err(EcosortError::invalid_transition("done", other.as_str())),
        }
    }
}
