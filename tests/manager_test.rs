use studytrack::plan::manager::PlanManager;
use studytrack::plan::model::{DayPlan, KnowledgePoint, StudyStatus};

fn day(day: u32, status: StudyStatus) -> DayPlan {
    DayPlan {
        day,
        title: format!("Day {}", day),
        description: "Transformers refresher".to_string(),
        topics: vec!["attention".to_string()],
        knowledge_points: vec![
            KnowledgePoint::new("Self-attention"),
            KnowledgePoint::new("Positional encodings"),
        ],
        coding_task: "Implement scaled dot-product attention".to_string(),
        interview_focus: "Why scale by sqrt(d_k)?".to_string(),
        status,
        hours_spent: 0.0,
        target_hours: 4,
        notes: String::new(),
    }
}

fn three_day_manager() -> PlanManager {
    let mut manager = PlanManager::new();
    manager.replace_all(vec![
        day(1, StudyStatus::Completed),
        day(2, StudyStatus::Pending),
        day(3, StudyStatus::Pending),
    ]);
    manager
}

#[test]
fn test_initial_state_is_empty() {
    let manager = PlanManager::new();
    assert!(manager.is_empty());
    assert_eq!(manager.active_index(), None);
    assert!(manager.active_day().is_none());
}

#[test]
fn test_set_status_targets_only_matching_day() {
    let mut manager = three_day_manager();
    manager.set_status(2, StudyStatus::InProgress).unwrap();

    assert_eq!(manager.days()[0].status, StudyStatus::Completed);
    assert_eq!(manager.days()[1].status, StudyStatus::InProgress);
    assert_eq!(manager.days()[2].status, StudyStatus::Pending);
}

#[test]
fn test_set_status_allows_undo_from_completed() {
    let mut manager = three_day_manager();
    manager.set_status(1, StudyStatus::InProgress).unwrap();
    assert_eq!(manager.days()[0].status, StudyStatus::InProgress);
}

#[test]
fn test_set_status_unknown_day_errors_and_leaves_plan_unchanged() {
    let mut manager = three_day_manager();
    let before = manager.days().to_vec();

    let err = manager.set_status(99, StudyStatus::Completed).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(manager.days(), &before[..]);
}

#[test]
fn test_set_hours_accepts_out_of_range_values() {
    // Range clamping is a presentation concern, not the manager's
    let mut manager = three_day_manager();
    manager.set_hours_spent(2, 30.5).unwrap();
    assert_eq!(manager.days()[1].hours_spent, 30.5);
}

#[test]
fn test_set_hours_unknown_day_errors() {
    let mut manager = three_day_manager();
    assert!(manager.set_hours_spent(7, 1.0).unwrap_err().is_not_found());
}

#[test]
fn test_toggle_knowledge_point_is_self_inverse() {
    let mut manager = three_day_manager();
    assert!(!manager.days()[0].knowledge_points[1].is_learned);

    manager.toggle_knowledge_point(1, 1).unwrap();
    assert!(manager.days()[0].knowledge_points[1].is_learned);
    // The sibling point is untouched
    assert!(!manager.days()[0].knowledge_points[0].is_learned);

    manager.toggle_knowledge_point(1, 1).unwrap();
    assert!(!manager.days()[0].knowledge_points[1].is_learned);
}

#[test]
fn test_toggle_knowledge_point_out_of_bounds_errors() {
    let mut manager = three_day_manager();
    let err = manager.toggle_knowledge_point(1, 5).unwrap_err();
    assert!(err.is_not_found());

    let err = manager.toggle_knowledge_point(9, 0).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_set_explanation_overwrites_unconditionally() {
    let mut manager = three_day_manager();
    manager.set_explanation(2, 0, "first").unwrap();
    manager.set_explanation(2, 0, "second").unwrap();

    assert_eq!(
        manager.days()[1].knowledge_points[0].explanation.as_deref(),
        Some("second")
    );
}

#[test]
fn test_replace_all_sorts_by_day_and_resolves_index() {
    let mut manager = PlanManager::new();
    manager.replace_all(vec![
        day(3, StudyStatus::Pending),
        day(1, StudyStatus::Completed),
        day(2, StudyStatus::Pending),
    ]);

    let days: Vec<u32> = manager.days().iter().map(|d| d.day).collect();
    assert_eq!(days, vec![1, 2, 3]);
    assert_eq!(manager.active_index(), Some(1));
}

#[test]
fn test_active_index_is_sticky_across_status_changes() {
    let mut manager = three_day_manager();
    assert_eq!(manager.active_index(), Some(1));

    // Completing the active day does not auto-advance the pointer
    manager.set_status(2, StudyStatus::Completed).unwrap();
    assert_eq!(manager.active_index(), Some(1));

    // Only an explicit refresh re-resolves it
    manager.refresh_active_index();
    assert_eq!(manager.active_index(), Some(2));
}

#[test]
fn test_clear_returns_to_initial_state() {
    let mut manager = three_day_manager();
    manager.clear();
    assert!(manager.is_empty());
    assert_eq!(manager.active_index(), None);
}
