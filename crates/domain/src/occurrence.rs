use crate::date::DateKey;
use serde::{Deserialize, Serialize};

/// A single concrete calendar-date instance of an `Event`'s schedule.
/// Computed on demand for a window, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub date_key: DateKey,
    /// Whether this projection is trustworthy for notification and digest
    /// purposes. Expansion of an unconfident schedule is empty, so every
    /// emitted occurrence carries `true`; consumers still filter on the
    /// flag at the seam.
    pub is_confident: bool,
}
