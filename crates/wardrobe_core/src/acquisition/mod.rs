//! Acquisition workflow: turning an "add item" intent into catalog entries.
//!
//! # Responsibility
//! - Track at most one in-progress acquisition session.
//! - Accumulate picker results (single capture or multi-select) and commit
//!   them to the catalog in one append, or discard them on cancellation.
//!
//! # Invariants
//! - A session exists only between method selection and commit/cancel.
//! - Protocol violations leave workflow and catalog state untouched.
//! - Cancellation never leaks partially accumulated results.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod feed;
pub mod session;
pub mod sink;
pub mod workflow;

use session::{AcquisitionMethod, SessionStatus};

pub type AcquisitionResult<T> = Result<T, AcquisitionError>;

/// Rejected workflow calls.
///
/// None of these are user-facing: each one means the presentation layer
/// raised an intent its own affordances should have prevented, and the call
/// had no effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    /// A session is already running with this method.
    SessionActive(AcquisitionMethod),
    /// A method was chosen without a preceding add intent.
    NoPendingPrompt,
    /// A picker call arrived while no session exists.
    NoActiveSession,
    /// The session is not in a state that accepts `action`.
    InvalidTransition {
        status: SessionStatus,
        action: &'static str,
    },
}

impl Display for AcquisitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionActive(method) => {
                write!(f, "an acquisition session is already active ({})", method.as_str())
            }
            Self::NoPendingPrompt => write!(f, "no add prompt is open; start an acquisition first"),
            Self::NoActiveSession => write!(f, "no acquisition session is active"),
            Self::InvalidTransition { status, action } => {
                write!(f, "cannot {action} while session is {}", status.as_str())
            }
        }
    }
}

impl Error for AcquisitionError {}
