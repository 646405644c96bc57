//! Asset references produced by external pickers.
//!
//! An asset reference is an already-decoded image plus the path it took into
//! the app. Decoding itself happens outside the core.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// How an asset entered the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionSource {
    /// Captured just now through the camera.
    LiveCapture,
    /// Picked from the existing photo library.
    LibraryImport,
}

impl AcquisitionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LiveCapture => "live_capture",
            Self::LibraryImport => "library_import",
        }
    }
}

/// Opaque handle to decoded image data.
///
/// Cloning shares the underlying buffer. Two entries may hold equal handles;
/// the catalog never deduplicates by image.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageHandle(Arc<[u8]>);

impl ImageHandle {
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn byte_len(&self) -> usize {
        self.0.len()
    }

    /// Whether both handles point at the same buffer.
    pub fn shares_buffer(&self, other: &ImageHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// Image bytes never end up in logs or debug output.
impl Debug for ImageHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ImageHandle({} bytes)", self.0.len())
    }
}

/// A resolved image plus its acquisition source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub image: ImageHandle,
    pub source: AcquisitionSource,
}

impl AssetRef {
    pub fn new(image: ImageHandle, source: AcquisitionSource) -> Self {
        Self { image, source }
    }

    pub fn live_capture(image: ImageHandle) -> Self {
        Self::new(image, AcquisitionSource::LiveCapture)
    }

    pub fn library_import(image: ImageHandle) -> Self {
        Self::new(image, AcquisitionSource::LibraryImport)
    }
}

/// Failure to turn one picked item into a decoded image.
///
/// Recovered locally: the item is dropped and the rest of the batch proceeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetResolutionError {
    /// The picked item is not an image the filter accepts.
    Unsupported,
    /// The item could not be decoded.
    Decode(String),
}

impl Display for AssetResolutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported => write!(f, "picked item is not a supported image"),
            Self::Decode(reason) => write!(f, "failed to decode picked image: {reason}"),
        }
    }
}

impl Error for AssetResolutionError {}

/// What a picker hands back for one selected item.
pub type PickerResult = Result<AssetRef, AssetResolutionError>;
