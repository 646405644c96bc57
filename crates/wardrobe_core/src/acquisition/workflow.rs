//! Workflow coordinator between presentation intents, pickers and catalog.

use crate::acquisition::feed::{picker_feed, FeedStep, PickerFeed, PickerFeedSender};
use crate::acquisition::session::{
    AcquisitionMethod, AcquisitionSession, PickerRequest, SessionStatus,
};
use crate::acquisition::sink::PickerResultSink;
use crate::acquisition::{AcquisitionError, AcquisitionResult};
use crate::catalog::manager::{Catalog, CatalogObserver, SubscriptionId};
use crate::config::{AcquisitionConfig, ConfigResult};
use crate::model::asset::{AssetRef, PickerResult};
use crate::model::garment::{GarmentEntry, GarmentId};
use log::{info, warn};
use std::mem;

/// How a finished session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// New entries were appended, in this order.
    Committed { ids: Vec<GarmentId>, dropped: usize },
    /// Nothing was appended.
    Cancelled { dropped: usize },
}

/// Externally visible workflow phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    Idle,
    /// The add prompt is open and waits for a method choice.
    Prompting,
    Session {
        method: AcquisitionMethod,
        status: SessionStatus,
    },
}

#[derive(Debug)]
enum WorkflowState {
    Idle,
    Prompting,
    Active(AcquisitionSession),
}

/// Owner of the catalog and of the single acquisition session.
///
/// Every method must be called from the owning thread or task; picker work
/// running elsewhere reaches the workflow through a [`PickerFeed`].
#[derive(Debug)]
pub struct AcquisitionWorkflow {
    config: AcquisitionConfig,
    catalog: Catalog,
    state: WorkflowState,
}

impl AcquisitionWorkflow {
    pub fn new(config: AcquisitionConfig) -> ConfigResult<Self> {
        Self::with_catalog(config, Catalog::new())
    }

    pub fn with_catalog(config: AcquisitionConfig, catalog: Catalog) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            catalog,
            state: WorkflowState::Idle,
        })
    }

    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn subscribe(&mut self, observer: Box<dyn CatalogObserver>) -> SubscriptionId {
        self.catalog.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.catalog.unsubscribe(id)
    }

    pub fn phase(&self) -> WorkflowPhase {
        match &self.state {
            WorkflowState::Idle => WorkflowPhase::Idle,
            WorkflowState::Prompting => WorkflowPhase::Prompting,
            WorkflowState::Active(session) => WorkflowPhase::Session {
                method: session.method(),
                status: session.status(),
            },
        }
    }

    /// User tapped "add". Opens the method prompt.
    pub fn start_acquisition(&mut self) -> AcquisitionResult<()> {
        match &self.state {
            WorkflowState::Idle => {
                self.state = WorkflowState::Prompting;
                Ok(())
            }
            WorkflowState::Prompting => Ok(()),
            WorkflowState::Active(session) => Err(self.reject_active(session.method())),
        }
    }

    /// User closed the method prompt without choosing.
    pub fn cancel_prompt(&mut self) -> AcquisitionResult<()> {
        match &self.state {
            WorkflowState::Idle | WorkflowState::Prompting => {
                self.state = WorkflowState::Idle;
                Ok(())
            }
            WorkflowState::Active(session) => Err(self.reject_active(session.method())),
        }
    }

    /// User picked camera or library from the prompt.
    pub fn choose_method(&mut self, method: AcquisitionMethod) -> AcquisitionResult<()> {
        match &self.state {
            WorkflowState::Prompting => {
                self.state =
                    WorkflowState::Active(AcquisitionSession::open(method, &self.config));
                info!(
                    "event=acquisition_open module=acquisition status=ok method={}",
                    method.as_str()
                );
                Ok(())
            }
            WorkflowState::Idle => Err(AcquisitionError::NoPendingPrompt),
            WorkflowState::Active(session) => Err(self.reject_active(session.method())),
        }
    }

    /// The presentation layer is about to show the picker.
    pub fn launch_picker(&mut self) -> AcquisitionResult<PickerRequest> {
        self.active_session()?.launch()
    }

    /// Opens a feed for a library picker that resolves items asynchronously.
    pub fn open_feed(&self) -> (PickerFeedSender, PickerFeed) {
        picker_feed(self.config.feed_capacity)
    }

    /// Forwards one picker result to the running session.
    pub fn deliver(&mut self, result: PickerResult) -> AcquisitionResult<()> {
        let session = self.awaiting_session("deliver result")?;
        session.on_result(result);
        Ok(())
    }

    /// Forwards a batch of picker results in order.
    pub fn deliver_batch<I>(&mut self, results: I) -> AcquisitionResult<()>
    where
        I: IntoIterator<Item = PickerResult>,
    {
        let session = self.awaiting_session("deliver results")?;
        for result in results {
            session.on_result(result);
        }
        Ok(())
    }

    /// Camera picker dismissal: an optional capture, then completion.
    pub fn deliver_capture(
        &mut self,
        capture: Option<AssetRef>,
    ) -> AcquisitionResult<SessionOutcome> {
        let session = self.awaiting_session("deliver capture")?;
        if session.method() != AcquisitionMethod::Camera {
            return Err(AcquisitionError::InvalidTransition {
                status: session.status(),
                action: "deliver capture",
            });
        }
        if let Some(asset) = capture {
            self.deliver(Ok(asset))?;
        }
        self.complete()
    }

    /// Drains a library feed on the owning task, then completes the session.
    ///
    /// If this future is dropped early the session keeps what arrived so far;
    /// use [`AcquisitionWorkflow::apply_feed_step`] or
    /// [`AcquisitionWorkflow::abort_session`] to finish it.
    pub async fn collect_from(
        &mut self,
        mut feed: PickerFeed,
    ) -> AcquisitionResult<SessionOutcome> {
        self.awaiting_session("collect picker feed")?;
        loop {
            let step = feed.next_step().await;
            if let Some(outcome) = self.apply_feed_step(step)? {
                return Ok(outcome);
            }
        }
    }

    /// Applies one step read from a [`PickerFeed`].
    ///
    /// Returns the outcome once the feed has finished, `None` while results
    /// are still flowing. Lets hosts interleave other intents between steps.
    pub fn apply_feed_step(&mut self, step: FeedStep) -> AcquisitionResult<Option<SessionOutcome>> {
        match step {
            FeedStep::Result(result) => self.deliver(result).map(|()| None),
            FeedStep::Finished => self.complete().map(Some),
        }
    }

    /// Ends the active session without committing anything.
    ///
    /// Works in any session status; accepted assets are discarded and the
    /// catalog is left untouched.
    pub fn abort_session(&mut self) -> AcquisitionResult<SessionOutcome> {
        if !matches!(self.state, WorkflowState::Active(_)) {
            return Err(AcquisitionError::NoActiveSession);
        }
        let WorkflowState::Active(mut session) = mem::replace(&mut self.state, WorkflowState::Idle)
        else {
            return Err(AcquisitionError::NoActiveSession);
        };
        let discarded = session.abort();
        info!(
            "event=acquisition_abort module=acquisition status=ok method={} discarded={discarded} dropped={}",
            session.method().as_str(),
            session.dropped()
        );
        Ok(SessionOutcome::Cancelled {
            dropped: session.dropped(),
        })
    }

    /// Picker dismissed: commit accumulated assets or cancel.
    pub fn complete(&mut self) -> AcquisitionResult<SessionOutcome> {
        let session = self.active_session()?;
        session.on_complete();
        match session.status() {
            SessionStatus::Committing | SessionStatus::Cancelled => {}
            status => {
                return Err(AcquisitionError::InvalidTransition {
                    status,
                    action: "complete",
                })
            }
        }

        let WorkflowState::Active(session) = mem::replace(&mut self.state, WorkflowState::Idle)
        else {
            return Err(AcquisitionError::NoActiveSession);
        };
        Ok(self.resolve(session))
    }

    /// User tapped delete on an entry. Returns whether an entry was removed.
    pub fn delete_requested(&mut self, id: GarmentId) -> bool {
        self.catalog.remove(id)
    }

    /// User edited the label of an entry. Returns whether the entry exists.
    pub fn relabel_requested(&mut self, id: GarmentId, label: impl Into<String>) -> bool {
        self.catalog.relabel(id, label)
    }

    fn resolve(&mut self, session: AcquisitionSession) -> SessionOutcome {
        let method = session.method();
        let dropped = session.dropped();

        if session.status() == SessionStatus::Cancelled {
            info!(
                "event=acquisition_cancel module=acquisition status=ok method={} dropped={dropped}",
                method.as_str()
            );
            return SessionOutcome::Cancelled { dropped };
        }

        let entries: Vec<GarmentEntry> = session
            .into_assets()
            .into_iter()
            .map(GarmentEntry::from_asset)
            .collect();
        let ids = entries.iter().map(GarmentEntry::id).collect();
        self.catalog.append(entries);
        info!(
            "event=acquisition_commit module=acquisition status=ok method={} dropped={dropped}",
            method.as_str()
        );
        SessionOutcome::Committed { ids, dropped }
    }

    fn active_session(&mut self) -> AcquisitionResult<&mut AcquisitionSession> {
        match &mut self.state {
            WorkflowState::Active(session) => Ok(session),
            _ => Err(AcquisitionError::NoActiveSession),
        }
    }

    fn awaiting_session(
        &mut self,
        action: &'static str,
    ) -> AcquisitionResult<&mut AcquisitionSession> {
        let session = self.active_session()?;
        match session.status() {
            SessionStatus::AwaitingResult => Ok(session),
            status => Err(AcquisitionError::InvalidTransition { status, action }),
        }
    }

    fn reject_active(&self, method: AcquisitionMethod) -> AcquisitionError {
        warn!(
            "event=acquisition_intent module=acquisition status=rejected reason=session_active method={}",
            method.as_str()
        );
        AcquisitionError::SessionActive(method)
    }
}

#[cfg(test)]
mod tests {
    use super::{AcquisitionWorkflow, SessionOutcome, WorkflowPhase};
    use crate::acquisition::session::{AcquisitionMethod, SessionStatus};
    use crate::acquisition::AcquisitionError;
    use crate::config::{AcquisitionConfig, ConfigError};

    #[test]
    fn rejects_invalid_config() {
        let config = AcquisitionConfig {
            feed_capacity: 0,
            ..AcquisitionConfig::default()
        };
        let err = AcquisitionWorkflow::new(config).expect_err("zero capacity must fail");
        assert_eq!(err, ConfigError::ZeroFeedCapacity);
    }

    #[test]
    fn prompt_can_be_cancelled() {
        let mut workflow = AcquisitionWorkflow::new(AcquisitionConfig::default()).unwrap();
        workflow.start_acquisition().unwrap();
        assert_eq!(workflow.phase(), WorkflowPhase::Prompting);
        workflow.cancel_prompt().unwrap();
        assert_eq!(workflow.phase(), WorkflowPhase::Idle);

        let err = workflow
            .choose_method(AcquisitionMethod::Camera)
            .expect_err("method needs an open prompt");
        assert_eq!(err, AcquisitionError::NoPendingPrompt);
    }

    #[test]
    fn complete_before_launch_keeps_session() {
        let mut workflow = AcquisitionWorkflow::new(AcquisitionConfig::default()).unwrap();
        workflow.start_acquisition().unwrap();
        workflow.choose_method(AcquisitionMethod::Library).unwrap();

        let err = workflow.complete().expect_err("not launched yet");
        assert!(matches!(
            err,
            AcquisitionError::InvalidTransition {
                status: SessionStatus::MethodChosen,
                ..
            }
        ));
        assert_eq!(
            workflow.phase(),
            WorkflowPhase::Session {
                method: AcquisitionMethod::Library,
                status: SessionStatus::MethodChosen,
            }
        );
    }

    #[test]
    fn abort_needs_an_active_session() {
        let mut workflow = AcquisitionWorkflow::new(AcquisitionConfig::default()).unwrap();
        workflow.start_acquisition().unwrap();
        assert_eq!(
            workflow.abort_session().expect_err("prompt is not a session"),
            AcquisitionError::NoActiveSession
        );
        assert_eq!(workflow.phase(), WorkflowPhase::Prompting);

        workflow.choose_method(AcquisitionMethod::Camera).unwrap();
        assert_eq!(
            workflow.abort_session().unwrap(),
            SessionOutcome::Cancelled { dropped: 0 }
        );
        assert_eq!(workflow.phase(), WorkflowPhase::Idle);
    }
}
