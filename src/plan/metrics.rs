use serde::{Deserialize, Serialize};

use crate::plan::model::{DayPlan, StudyStatus};

/// Read-only aggregate snapshot of a plan, recomputed in full on every
/// mutation. Plan sizes are bounded at generation time, so a full scan
/// stays trivial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStats {
    pub completed_count: usize,
    pub total_hours_logged: f32,
    pub total_target_hours: u32,
    pub progress_percent: f32,
    pub total_knowledge_points: usize,
    pub learned_knowledge_points: usize,
    pub mastery_percent: f32,
}

pub fn compute_stats(plan: &[DayPlan]) -> PlanStats {
    let completed_count = plan
        .iter()
        .filter(|d| d.status == StudyStatus::Completed)
        .count();
    let total_hours_logged: f32 = plan.iter().map(|d| d.hours_spent).sum();
    let total_target_hours: u32 = plan.iter().map(|d| d.target_hours).sum();
    let total_knowledge_points: usize = plan.iter().map(|d| d.knowledge_points.len()).sum();
    let learned_knowledge_points: usize = plan
        .iter()
        .map(|d| d.knowledge_points.iter().filter(|p| p.is_learned).count())
        .sum();

    let progress_percent = if plan.is_empty() {
        0.0
    } else {
        completed_count as f32 / plan.len() as f32 * 100.0
    };
    let mastery_percent = if total_knowledge_points == 0 {
        0.0
    } else {
        learned_knowledge_points as f32 / total_knowledge_points as f32 * 100.0
    };

    PlanStats {
        completed_count,
        total_hours_logged,
        total_target_hours,
        progress_percent,
        total_knowledge_points,
        learned_knowledge_points,
        mastery_percent,
    }
}

/// Extra hours owed on the active day: exactly 1 when the immediately
/// preceding day (by sequence position) was left incomplete, else 0.
/// No compounding across multiple missed days. Pure function of its inputs.
pub fn penalty_hours(plan: &[DayPlan], active_index: usize) -> u32 {
    if active_index == 0 {
        return 0;
    }
    match plan.get(active_index - 1) {
        Some(prev) if prev.status != StudyStatus::Completed => 1,
        _ => 0,
    }
}

/// Effective target for the active day: base target plus penalty.
/// Non-active days always display their unmodified base target.
pub fn effective_target_hours(plan: &[DayPlan], active_index: usize) -> u32 {
    let base = plan.get(active_index).map(|d| d.target_hours).unwrap_or(0);
    base + penalty_hours(plan, active_index)
}
