//! Garment entry model and factory.
//!
//! # Invariants
//! - `id` is generated once by the factory and never mutated.
//! - `asset` is owned exclusively by the entry.
//! - `label` is never blank; blank input falls back to `DEFAULT_LABEL`.

use crate::model::asset::AssetRef;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Placeholder label given to freshly acquired garments.
pub const DEFAULT_LABEL: &str = "New Item";

/// Process-unique garment identity.
///
/// Opaque: ids carry no ordering meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GarmentId(Uuid);

impl GarmentId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Display for GarmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// One catalog record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GarmentEntry {
    id: GarmentId,
    asset: AssetRef,
    label: String,
}

impl GarmentEntry {
    /// Wraps an acquired asset into a new entry with a fresh id and the
    /// placeholder label.
    pub fn from_asset(asset: AssetRef) -> Self {
        Self {
            id: GarmentId::generate(),
            asset,
            label: DEFAULT_LABEL.to_string(),
        }
    }

    pub fn id(&self) -> GarmentId {
        self.id
    }

    pub fn asset(&self) -> &AssetRef {
        &self.asset
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replaces the label. Blank input restores the placeholder.
    pub fn set_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        let trimmed = label.trim();
        self.label = if trimmed.is_empty() {
            DEFAULT_LABEL.to_string()
        } else {
            trimmed.to_string()
        };
    }
}
