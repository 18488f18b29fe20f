use crate::error::TrackerError;
use crate::plan::model::{DayPlan, StudyStatus};

/// Index of the day the user is expected to be working on: first day whose
/// status is not Completed, or the last day when everything is done.
/// Undefined for an empty plan.
pub fn resolve_active_index(plan: &[DayPlan]) -> Option<usize> {
    if plan.is_empty() {
        return None;
    }
    plan.iter()
        .position(|d| d.status != StudyStatus::Completed)
        .or(Some(plan.len() - 1))
}

/// Owns the canonical ordered plan collection and applies keyed mutations.
///
/// The active index is session state: it is resolved when a plan is installed
/// (generation or load) and stays put across status mutations until
/// `refresh_active_index` is called explicitly.
#[derive(Debug, Clone, Default)]
pub struct PlanManager {
    days: Vec<DayPlan>,
    active_index: Option<usize>,
}

impl PlanManager {
    /// Empty initial state: no plan
    pub fn new() -> Self {
        PlanManager {
            days: Vec::new(),
            active_index: None,
        }
    }

    /// Wholesale replacement, used when a fresh plan is generated or loaded
    /// from storage. Display order is the curriculum order, so the plan is
    /// sorted by day number before the active index is resolved.
    pub fn replace_all(&mut self, mut new_plan: Vec<DayPlan>) {
        new_plan.sort_by_key(|d| d.day);
        self.days = new_plan;
        self.active_index = resolve_active_index(&self.days);
    }

    /// Back to the empty initial state (full reset)
    pub fn clear(&mut self) {
        self.days.clear();
        self.active_index = None;
    }

    pub fn days(&self) -> &[DayPlan] {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn active_day(&self) -> Option<&DayPlan> {
        self.active_index.and_then(|i| self.days.get(i))
    }

    /// Re-resolve the active index from current statuses.
    /// Mutations never call this implicitly; the index stays put until asked.
    pub fn refresh_active_index(&mut self) {
        self.active_index = resolve_active_index(&self.days);
    }

    fn day_mut(&mut self, day: u32) -> Result<&mut DayPlan, TrackerError> {
        self.days
            .iter_mut()
            .find(|d| d.day == day)
            .ok_or_else(|| TrackerError::not_found(format!("No plan entry for day {}", day)))
    }

    fn point_mut(
        &mut self,
        day: u32,
        point_index: usize,
    ) -> Result<&mut crate::plan::model::KnowledgePoint, TrackerError> {
        let entry = self.day_mut(day)?;
        let total = entry.knowledge_points.len();
        entry.knowledge_points.get_mut(point_index).ok_or_else(|| {
            TrackerError::not_found(format!(
                "Knowledge point {} out of bounds for day {} ({} points)",
                point_index, day, total
            ))
        })
    }

    /// Replace the status of the matching day. Transitions are not validated:
    /// the user can undo Completed back to InProgress.
    pub fn set_status(&mut self, day: u32, status: StudyStatus) -> Result<(), TrackerError> {
        self.day_mut(day)?.status = status;
        Ok(())
    }

    /// Replace the logged hours of the matching day. Range validation is a
    /// presentation concern; any finite value is accepted.
    pub fn set_hours_spent(&mut self, day: u32, hours: f32) -> Result<(), TrackerError> {
        self.day_mut(day)?.hours_spent = hours;
        Ok(())
    }

    /// Flip the learned flag of one knowledge point. Self-inverse.
    pub fn toggle_knowledge_point(
        &mut self,
        day: u32,
        point_index: usize,
    ) -> Result<(), TrackerError> {
        let point = self.point_mut(day, point_index)?;
        point.is_learned = !point.is_learned;
        Ok(())
    }

    /// Store an explanation on one knowledge point. Overwrites unconditionally;
    /// the cache-once contract is enforced by the caller checking for an
    /// existing explanation first.
    pub fn set_explanation<S: Into<String>>(
        &mut self,
        day: u32,
        point_index: usize,
        text: S,
    ) -> Result<(), TrackerError> {
        self.point_mut(day, point_index)?.explanation = Some(text.into());
        Ok(())
    }
}
