use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::activity::ActivityLog;
use crate::config;
use crate::error::TrackerError;
use crate::lang::Language;
use crate::plan::model::DayPlan;

/// Persistence port for the tracker's durable blobs.
///
/// Three independent keyed blobs: the plan (a JSON array of day records),
/// the language preference, and the activity log. `clear_plan` removes only
/// the plan blob; preference and activity survive a reset.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Load the persisted plan. Missing blob and corrupt JSON both resolve
    /// to `Ok(None)` (corruption is logged and treated as "no saved plan").
    async fn load_plan(&self) -> Result<Option<Vec<DayPlan>>, TrackerError>;
    async fn save_plan(&self, plan: &[DayPlan]) -> Result<(), TrackerError>;
    async fn clear_plan(&self) -> Result<(), TrackerError>;

    async fn load_language(&self) -> Result<Option<Language>, TrackerError>;
    async fn save_language(&self, language: Language) -> Result<(), TrackerError>;

    async fn load_activity(&self) -> Result<ActivityLog, TrackerError>;
    async fn save_activity(&self, activity: &ActivityLog) -> Result<(), TrackerError>;
}

/// Filesystem store: pretty JSON files under the platform app-data dir
pub struct FsPlanStore {
    root: PathBuf,
}

impl FsPlanStore {
    pub fn new() -> Self {
        FsPlanStore {
            root: config::app_data_dir(),
        }
    }

    /// Store rooted at an explicit directory (used by tests)
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        FsPlanStore { root: root.into() }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    async fn write_json<T: serde::Serialize>(
        &self,
        file: &str,
        value: &T,
    ) -> Result<(), TrackerError> {
        let path = self.path(file);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| {
                    TrackerError::new(format!("Failed to create directory: {}", e), "io")
                        .with_context(format!("path: {:?}", parent))
                })?;
        }

        let json = serde_json::to_string_pretty(value).map_err(|e| {
            TrackerError::new(format!("Failed to serialize {}: {}", file, e), "json_serialize")
        })?;

        tokio::fs::write(&path, json).await.map_err(|e| {
            TrackerError::new(format!("Failed to write {}: {}", file, e), "io")
                .with_context(format!("path: {:?}", path))
        })?;

        Ok(())
    }

    /// Read and parse one blob. `Ok(None)` for a missing file; parse failures
    /// are logged and also resolve to `Ok(None)` so a corrupt blob degrades
    /// to first-run state instead of wedging startup.
    async fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        file: &str,
    ) -> Result<Option<T>, TrackerError> {
        let path = self.path(file);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<T>(&content) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    tracing::warn!(
                        path = ?path,
                        error = %e,
                        "Failed to parse persisted blob, treating as absent"
                    );
                    Ok(None)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TrackerError::new(
                format!("Failed to read {}: {}", file, e),
                "io",
            )
            .with_context(format!("path: {:?}", path))),
        }
    }
}

impl Default for FsPlanStore {
    fn default() -> Self {
        Self::new()
    }
}

const PLAN_FILE: &str = "plan.json";
const LANGUAGE_FILE: &str = "language.json";
const ACTIVITY_FILE: &str = "activity.json";

#[async_trait]
impl PlanStore for FsPlanStore {
    async fn load_plan(&self) -> Result<Option<Vec<DayPlan>>, TrackerError> {
        self.read_json(PLAN_FILE).await
    }

    async fn save_plan(&self, plan: &[DayPlan]) -> Result<(), TrackerError> {
        self.write_json(PLAN_FILE, &plan).await
    }

    async fn clear_plan(&self) -> Result<(), TrackerError> {
        let path = self.path(PLAN_FILE);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TrackerError::new(
                format!("Failed to remove {}: {}", PLAN_FILE, e),
                "io",
            )
            .with_context(format!("path: {:?}", path))),
        }
    }

    async fn load_language(&self) -> Result<Option<Language>, TrackerError> {
        // Read the bare tag and parse leniently: an unrecognized tag means
        // an old or hand-edited blob, which defaults rather than discards
        Ok(self
            .read_json::<String>(LANGUAGE_FILE)
            .await?
            .map(|tag| Language::from_tag(&tag)))
    }

    async fn save_language(&self, language: Language) -> Result<(), TrackerError> {
        self.write_json(LANGUAGE_FILE, &language).await
    }

    async fn load_activity(&self) -> Result<ActivityLog, TrackerError> {
        Ok(self.read_json(ACTIVITY_FILE).await?.unwrap_or_default())
    }

    async fn save_activity(&self, activity: &ActivityLog) -> Result<(), TrackerError> {
        self.write_json(ACTIVITY_FILE, activity).await
    }
}

/// In-memory store, the substitutable fake for tests
#[derive(Default)]
pub struct MemoryPlanStore {
    plan: Mutex<Option<Vec<DayPlan>>>,
    language: Mutex<Option<Language>>,
    activity: Mutex<ActivityLog>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a plan blob, as if a previous session had saved one
    pub fn with_plan(plan: Vec<DayPlan>) -> Self {
        let store = Self::new();
        *store.plan.lock() = Some(plan);
        store
    }
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn load_plan(&self) -> Result<Option<Vec<DayPlan>>, TrackerError> {
        Ok(self.plan.lock().clone())
    }

    async fn save_plan(&self, plan: &[DayPlan]) -> Result<(), TrackerError> {
        *self.plan.lock() = Some(plan.to_vec());
        Ok(())
    }

    async fn clear_plan(&self) -> Result<(), TrackerError> {
        *self.plan.lock() = None;
        Ok(())
    }

    async fn load_language(&self) -> Result<Option<Language>, TrackerError> {
        Ok(*self.language.lock())
    }

    async fn save_language(&self, language: Language) -> Result<(), TrackerError> {
        *self.language.lock() = Some(language);
        Ok(())
    }

    async fn load_activity(&self) -> Result<ActivityLog, TrackerError> {
        Ok(self.activity.lock().clone())
    }

    async fn save_activity(&self, activity: &ActivityLog) -> Result<(), TrackerError> {
        *self.activity.lock() = activity.clone();
        Ok(())
    }
}
