//! Shared capability implemented by every picker result consumer.

use crate::model::asset::PickerResult;

/// Consumer of picker deliveries.
///
/// Camera and library pickers talk to the core through this one interface:
/// zero or more `on_result` calls followed by `on_complete` on dismissal.
pub trait PickerResultSink {
    fn on_result(&mut self, result: PickerResult);
    fn on_complete(&mut self);
}
