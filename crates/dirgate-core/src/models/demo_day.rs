//! Demo day domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DemoDayStatus {
    Upcoming,
    Live,
    Completed,
}

impl DemoDayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoDayStatus::Upcoming => "UPCOMING",
            DemoDayStatus::Live => "LIVE",
            DemoDayStatus::Completed => "COMPLETED",
        }
    }

    /// Status only ever moves forward: UPCOMING -> LIVE -> COMPLETED.
    /// Staying in place is allowed.
    pub fn can_transition_to(&self, next: DemoDayStatus) -> bool {
        next >= *self
    }
}

/// A demo day event. `host` is the namespace that administrators'
/// `HOST` scopes are matched against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoDay {
    pub id: Uuid,
    pub slug_url: String,
    pub name: String,
    pub host: String,
    pub status: DemoDayStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDemoDay {
    pub slug_url: String,
    pub name: String,
    pub host: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_moves_forward_only() {
        use DemoDayStatus::*;
        assert!(Upcoming.can_transition_to(Live));
        assert!(Live.can_transition_to(Completed));
        assert!(Upcoming.can_transition_to(Completed));
        assert!(Live.can_transition_to(Live));
        assert!(!Live.can_transition_to(Upcoming));
        assert!(!Completed.can_transition_to(Live));
    }
}
