//! Acquisition session state machine.
//!
//! `MethodChosen -> AwaitingResult -> (Committing | Cancelled)`. The idle
//! state is the absence of a session, owned by the workflow.

use crate::acquisition::sink::PickerResultSink;
use crate::acquisition::{AcquisitionError, AcquisitionResult};
use crate::config::{AcquisitionConfig, MediaFilter};
use crate::model::asset::{AcquisitionSource, AssetRef, PickerResult};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Which external picker a session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionMethod {
    /// Single live capture.
    Camera,
    /// Multi-select from the photo library.
    Library,
}

impl AcquisitionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Library => "library",
        }
    }

    /// Source tag every asset delivered through this method must carry.
    pub fn expected_source(self) -> AcquisitionSource {
        match self {
            Self::Camera => AcquisitionSource::LiveCapture,
            Self::Library => AcquisitionSource::LibraryImport,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    MethodChosen,
    AwaitingResult,
    Committing,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MethodChosen => "method_chosen",
            Self::AwaitingResult => "awaiting_result",
            Self::Committing => "committing",
            Self::Cancelled => "cancelled",
        }
    }
}

/// What the presentation layer needs to configure the external picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerRequest {
    pub method: AcquisitionMethod,
    /// `None` means unlimited.
    pub selection_cap: Option<usize>,
    pub media_filter: MediaFilter,
}

/// One in-progress add operation.
#[derive(Debug)]
pub struct AcquisitionSession {
    method: AcquisitionMethod,
    status: SessionStatus,
    selection_cap: Option<usize>,
    media_filter: MediaFilter,
    pending_single: Option<AssetRef>,
    pending_batch: Vec<AssetRef>,
    dropped: usize,
}

impl AcquisitionSession {
    pub fn open(method: AcquisitionMethod, config: &AcquisitionConfig) -> Self {
        let selection_cap = match method {
            AcquisitionMethod::Camera => Some(1),
            AcquisitionMethod::Library => config.selection_cap(),
        };
        Self {
            method,
            status: SessionStatus::MethodChosen,
            selection_cap,
            media_filter: config.media_filter,
            pending_single: None,
            pending_batch: Vec::new(),
            dropped: 0,
        }
    }

    pub fn method(&self) -> AcquisitionMethod {
        self.method
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Assets accepted so far.
    pub fn pending_len(&self) -> usize {
        match self.method {
            AcquisitionMethod::Camera => usize::from(self.pending_single.is_some()),
            AcquisitionMethod::Library => self.pending_batch.len(),
        }
    }

    /// Deliveries dropped so far (failed decode, wrong source, over the cap).
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Marks the picker as launched.
    pub fn launch(&mut self) -> AcquisitionResult<PickerRequest> {
        if self.status != SessionStatus::MethodChosen {
            return Err(AcquisitionError::InvalidTransition {
                status: self.status,
                action: "launch picker",
            });
        }
        self.status = SessionStatus::AwaitingResult;
        Ok(PickerRequest {
            method: self.method,
            selection_cap: self.selection_cap,
            media_filter: self.media_filter,
        })
    }

    /// Discards everything accumulated and ends as `Cancelled`.
    ///
    /// Returns the number of accepted assets that were thrown away.
    pub(crate) fn abort(&mut self) -> usize {
        let discarded = self.pending_len();
        self.pending_single = None;
        self.pending_batch.clear();
        self.status = SessionStatus::Cancelled;
        discarded
    }

    /// Takes the accumulated assets in accumulation order.
    pub(crate) fn into_assets(self) -> Vec<AssetRef> {
        let mut assets: Vec<AssetRef> = self.pending_single.into_iter().collect();
        assets.extend(self.pending_batch);
        assets
    }

    fn drop_result(&mut self, reason: &str) {
        self.dropped += 1;
        debug!(
            "event=picker_result module=acquisition status=dropped method={} reason={reason}",
            self.method.as_str()
        );
    }

    fn is_full(&self) -> bool {
        self.selection_cap
            .is_some_and(|cap| self.pending_len() >= cap)
    }
}

impl PickerResultSink for AcquisitionSession {
    fn on_result(&mut self, result: PickerResult) {
        if self.status != SessionStatus::AwaitingResult {
            warn!(
                "event=picker_result module=acquisition status=ignored method={} session_status={}",
                self.method.as_str(),
                self.status.as_str()
            );
            return;
        }

        let asset = match result {
            Ok(asset) => asset,
            Err(_) => return self.drop_result("resolution_failed"),
        };
        if asset.source != self.method.expected_source() {
            return self.drop_result("source_mismatch");
        }
        if self.is_full() {
            return self.drop_result("over_limit");
        }

        match self.method {
            AcquisitionMethod::Camera => self.pending_single = Some(asset),
            AcquisitionMethod::Library => self.pending_batch.push(asset),
        }
    }

    /// Resolves the session on picker dismissal. Repeated calls are no-ops.
    fn on_complete(&mut self) {
        if self.status != SessionStatus::AwaitingResult {
            return;
        }
        self.status = if self.pending_len() == 0 {
            SessionStatus::Cancelled
        } else {
            SessionStatus::Committing
        };
    }
}
