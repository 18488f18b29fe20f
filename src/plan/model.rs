use serde::{Deserialize, Serialize};

/// Lifecycle state of a single study day.
/// Any status may follow any other; "undo" flips Completed back to InProgress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudyStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
}

/// One granular checkable concept within a day.
///
/// `explanation` is a cache-once field: populated at most once per session by
/// the explanation generator and never refetched while present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgePoint {
    pub text: String,
    pub is_learned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl KnowledgePoint {
    pub fn new<S: Into<String>>(text: S) -> Self {
        KnowledgePoint {
            text: text.into(),
            is_learned: false,
            explanation: None,
        }
    }
}

/// One calendar day's curriculum unit.
///
/// Field names serialize camelCase to stay compatible with the persisted
/// plan blob format. `knowledgePoints` and `notes` carry defaults so plans
/// written by the earlier schema (which lacked them) still load; this is the
/// single documented shape migration, every other field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day: u32,
    pub title: String,
    pub description: String,
    pub topics: Vec<String>,
    #[serde(default)]
    pub knowledge_points: Vec<KnowledgePoint>,
    pub coding_task: String,
    pub interview_focus: String,
    pub status: StudyStatus,
    pub hours_spent: f32,
    pub target_hours: u32,
    #[serde(default)]
    pub notes: String,
}

/// A day record as returned by the plan generator, before any user state
/// is attached. All fields are required at generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDayPlan {
    pub day: u32,
    pub title: String,
    pub description: String,
    pub topics: Vec<String>,
    pub knowledge_points: Vec<String>,
    pub coding_task: String,
    pub interview_focus: String,
    pub target_hours: u32,
}

impl RawDayPlan {
    /// Hydrate a generated record with default client-side state
    pub fn hydrate(self) -> DayPlan {
        DayPlan {
            day: self.day,
            title: self.title,
            description: self.description,
            topics: self.topics,
            knowledge_points: self
                .knowledge_points
                .into_iter()
                .map(KnowledgePoint::new)
                .collect(),
            coding_task: self.coding_task,
            interview_focus: self.interview_focus,
            status: StudyStatus::Pending,
            hours_spent: 0.0,
            target_hours: self.target_hours,
            notes: String::new(),
        }
    }
}

/// Hydrate a full generated plan into day-plan records
pub fn hydrate_plan(raw: Vec<RawDayPlan>) -> Vec<DayPlan> {
    raw.into_iter().map(RawDayPlan::hydrate).collect()
}
