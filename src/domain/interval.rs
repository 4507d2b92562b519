use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TeamId;

/// A span of time during which a person was assigned to `team`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAssignmentInterval {
    pub team: TeamId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl TeamAssignmentInterval {
    pub fn duration_millis(&self) -> i64 {
        (self.end_date - self.start_date).num_milliseconds()
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_date < other.end_date && other.start_date < self.end_date
    }
}
