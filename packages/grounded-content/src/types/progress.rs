//! Progress event types - the observable side of a pipeline run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline stages in execution order.
///
/// `Researching` and `BuildingContext` are skipped entirely when
/// grounding is off or the planner produces no queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Normalizing,
    Planning,
    Researching,
    BuildingContext,
    Generating,
    ExtractingCitations,
    Scoring,
}

impl Stage {
    /// Stable wire name for the stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normalizing => "normalizing",
            Self::Planning => "planning",
            Self::Researching => "researching",
            Self::BuildingContext => "building_context",
            Self::Generating => "generating",
            Self::ExtractingCitations => "extracting_citations",
            Self::Scoring => "scoring",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a single stage within a run.
///
/// Per stage the sequence is monotonic: pending, active, then either
/// completed or error. A stage is never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Active,
    Completed,
    Error,
}

/// One observable transition in a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Run this event belongs to
    pub run_id: Uuid,

    /// Stage the event describes
    pub stage: Stage,

    /// New status of the stage
    pub status: StageStatus,

    /// Short human-readable detail
    pub message: String,

    /// When the transition happened
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    /// Create an event stamped with the current time.
    pub fn new(run_id: Uuid, stage: Stage, status: StageStatus, message: impl Into<String>) -> Self {
        Self {
            run_id,
            stage,
            status,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_matches_pipeline() {
        assert!(Stage::Normalizing < Stage::Planning);
        assert!(Stage::Planning < Stage::Researching);
        assert!(Stage::Researching < Stage::BuildingContext);
        assert!(Stage::BuildingContext < Stage::Generating);
        assert!(Stage::Generating < Stage::ExtractingCitations);
        assert!(Stage::ExtractingCitations < Stage::Scoring);
    }

    #[test]
    fn test_status_order_is_monotonic() {
        assert!(StageStatus::Pending < StageStatus::Active);
        assert!(StageStatus::Active < StageStatus::Completed);
    }

    #[test]
    fn test_event_wire_format() {
        let event = ProgressEvent::new(
            Uuid::new_v4(),
            Stage::BuildingContext,
            StageStatus::Active,
            "assembling",
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["stage"], "building_context");
        assert_eq!(json["status"], "active");
    }
}
