use studytrack::lang::Language;
use studytrack::plan::model::{DayPlan, KnowledgePoint, StudyStatus};
use studytrack::plan::store::{FsPlanStore, MemoryPlanStore, PlanStore};

fn temp_root(tag: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "studytrack_test_{}_{}_{}",
        tag,
        std::process::id(),
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0)
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample_day() -> DayPlan {
    DayPlan {
        day: 1,
        title: "DL Basics".to_string(),
        description: "Backprop refresher".to_string(),
        topics: vec!["backprop".to_string(), "optimizers".to_string()],
        knowledge_points: vec![KnowledgePoint::new("Chain rule")],
        coding_task: "Implement SGD from scratch".to_string(),
        interview_focus: "Vanishing gradients".to_string(),
        status: StudyStatus::Pending,
        hours_spent: 0.0,
        target_hours: 4,
        notes: String::new(),
    }
}

#[test]
fn test_legacy_plan_without_knowledge_points_backfills_empty() {
    // Persisted by the earlier schema: no knowledgePoints, no notes
    let legacy = r#"[{
        "day": 1,
        "title": "DL Basics",
        "description": "Backprop refresher",
        "topics": ["backprop"],
        "codingTask": "Implement SGD",
        "interviewFocus": "Vanishing gradients",
        "status": "IN_PROGRESS",
        "hoursSpent": 2.5,
        "targetHours": 4
    }]"#;

    let plan: Vec<DayPlan> = serde_json::from_str(legacy).unwrap();
    assert_eq!(plan.len(), 1);
    assert!(plan[0].knowledge_points.is_empty());
    assert_eq!(plan[0].notes, "");
    assert_eq!(plan[0].status, StudyStatus::InProgress);
    assert_eq!(plan[0].hours_spent, 2.5);
}

#[test]
fn test_blob_uses_camel_case_and_status_tags() {
    let json = serde_json::to_string(&vec![sample_day()]).unwrap();
    assert!(json.contains("\"knowledgePoints\""));
    assert!(json.contains("\"codingTask\""));
    assert!(json.contains("\"interviewFocus\""));
    assert!(json.contains("\"hoursSpent\""));
    assert!(json.contains("\"targetHours\""));
    assert!(json.contains("\"isLearned\""));
    assert!(json.contains("\"PENDING\""));
    // Cache-once field is omitted until populated
    assert!(!json.contains("\"explanation\""));
}

#[tokio::test]
async fn test_fs_store_round_trip() {
    let store = FsPlanStore::with_root(temp_root("round_trip"));

    assert!(store.load_plan().await.unwrap().is_none());

    let plan = vec![sample_day()];
    store.save_plan(&plan).await.unwrap();

    let loaded = store.load_plan().await.unwrap().unwrap();
    assert_eq!(loaded, plan);
}

#[tokio::test]
async fn test_fs_store_corrupt_plan_treated_as_absent() {
    let root = temp_root("corrupt");
    std::fs::write(root.join("plan.json"), "{ not valid json").unwrap();

    let store = FsPlanStore::with_root(root);
    assert!(store.load_plan().await.unwrap().is_none());
}

#[tokio::test]
async fn test_fs_store_clear_removes_only_plan() {
    let store = FsPlanStore::with_root(temp_root("clear"));

    store.save_plan(&[sample_day()]).await.unwrap();
    store.save_language(Language::Chinese).await.unwrap();

    store.clear_plan().await.unwrap();
    assert!(store.load_plan().await.unwrap().is_none());
    // Language preference survives a reset
    assert_eq!(
        store.load_language().await.unwrap(),
        Some(Language::Chinese)
    );

    // Clearing an already-absent blob is not an error
    store.clear_plan().await.unwrap();
}

#[tokio::test]
async fn test_fs_store_language_round_trip() {
    let store = FsPlanStore::with_root(temp_root("language"));

    assert!(store.load_language().await.unwrap().is_none());
    store.save_language(Language::Chinese).await.unwrap();
    assert_eq!(
        store.load_language().await.unwrap(),
        Some(Language::Chinese)
    );
}

#[tokio::test]
async fn test_fs_store_unknown_language_tag_defaults_to_english() {
    let root = temp_root("unknown_lang");
    std::fs::write(root.join("language.json"), "\"fr\"").unwrap();

    let store = FsPlanStore::with_root(root);
    // Lenient parse: an unrecognized tag is a preference, not corruption
    assert_eq!(
        store.load_language().await.unwrap(),
        Some(Language::English)
    );
}

#[tokio::test]
async fn test_fs_store_activity_round_trip() {
    use chrono::NaiveDate;
    use studytrack::activity::ActivityLog;

    let store = FsPlanStore::with_root(temp_root("activity"));

    // Absent blob loads as an empty log
    assert_eq!(store.load_activity().await.unwrap(), ActivityLog::new());

    let mut log = ActivityLog::new();
    log.add_hours(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), 3.5);
    store.save_activity(&log).await.unwrap();

    assert_eq!(store.load_activity().await.unwrap(), log);
}

#[tokio::test]
async fn test_memory_store_behaves_like_fs_store() {
    let store = MemoryPlanStore::new();

    assert!(store.load_plan().await.unwrap().is_none());
    store.save_plan(&[sample_day()]).await.unwrap();
    assert_eq!(store.load_plan().await.unwrap().unwrap().len(), 1);

    store.save_language(Language::English).await.unwrap();
    store.clear_plan().await.unwrap();
    assert!(store.load_plan().await.unwrap().is_none());
    assert_eq!(
        store.load_language().await.unwrap(),
        Some(Language::English)
    );
}
