//! Core logic for the wardrobe catalog.
//! This crate owns the garment catalog and the acquisition workflow; the
//! presentation layer only renders `Catalog::list()` and raises intents.

pub mod acquisition;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod model;

pub use acquisition::feed::{picker_feed, FeedStep, PickerFeed, PickerFeedSender};
pub use acquisition::session::{
    AcquisitionMethod, AcquisitionSession, PickerRequest, SessionStatus,
};
pub use acquisition::sink::PickerResultSink;
pub use acquisition::workflow::{AcquisitionWorkflow, SessionOutcome, WorkflowPhase};
pub use acquisition::{AcquisitionError, AcquisitionResult};
pub use catalog::manager::{Catalog, CatalogChange, CatalogObserver, SubscriptionId};
pub use config::{AcquisitionConfig, ConfigError, ConfigResult, MediaFilter};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::asset::{
    AcquisitionSource, AssetRef, AssetResolutionError, ImageHandle, PickerResult,
};
pub use model::garment::{GarmentEntry, GarmentId, DEFAULT_LABEL};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
