use std::collections::HashSet;
use std::sync::Arc;

use chrono::Local;
use parking_lot::{Mutex, RwLock};

use crate::activity::ActivityLog;
use crate::error::TrackerError;
use crate::generator::gemini::GeminiGenerator;
use crate::generator::{ExplanationGenerator, PlanGenerator};
use crate::lang::Language;
use crate::metrics::Metrics;
use crate::plan::manager::PlanManager;
use crate::plan::metrics::{self as plan_metrics, PlanStats};
use crate::plan::model::{hydrate_plan, DayPlan, StudyStatus};
use crate::plan::store::{FsPlanStore, PlanStore};

/// Application-wide state container and facade over the injected
/// collaborators (store, plan generator, explanation generator).
///
/// All mutable state lives behind locks here and every plan mutation is
/// followed by a last-write-wins save of the affected blob. Lock guards are
/// never held across an await point.
#[derive(Clone)]
pub struct AppState {
    plan: Arc<RwLock<PlanManager>>,
    language: Arc<RwLock<Language>>,
    activity: Arc<RwLock<ActivityLog>>,
    /// Explanation fetches currently in flight, keyed (day, point index).
    /// Guarantees at most one outstanding request per knowledge point.
    inflight_explanations: Arc<Mutex<HashSet<(u32, usize)>>>,
    pub metrics: Metrics,
    store: Arc<dyn PlanStore>,
    plan_generator: Arc<dyn PlanGenerator>,
    explanation_generator: Arc<dyn ExplanationGenerator>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn PlanStore>,
        plan_generator: Arc<dyn PlanGenerator>,
        explanation_generator: Arc<dyn ExplanationGenerator>,
    ) -> Self {
        AppState {
            plan: Arc::new(RwLock::new(PlanManager::new())),
            language: Arc::new(RwLock::new(Language::default())),
            activity: Arc::new(RwLock::new(ActivityLog::new())),
            inflight_explanations: Arc::new(Mutex::new(HashSet::new())),
            metrics: Metrics::new(),
            store,
            plan_generator,
            explanation_generator,
        }
    }

    /// Production wiring: filesystem store and the Gemini adapter serving
    /// both generator ports
    pub fn with_defaults() -> Self {
        let generator = Arc::new(GeminiGenerator::new());
        AppState::new(Arc::new(FsPlanStore::new()), generator.clone(), generator)
    }

    /// Hydrate state from the persisted blobs. A missing or corrupt plan
    /// blob resolves to the empty state; the active index is resolved here
    /// and then stays sticky for the session.
    pub async fn load(&self) -> Result<(), TrackerError> {
        let saved_plan = self.store.load_plan().await?.unwrap_or_default();
        let saved_language = self.store.load_language().await?.unwrap_or_default();
        let saved_activity = self.store.load_activity().await?;

        {
            let mut manager = self.plan.write();
            if saved_plan.is_empty() {
                manager.clear();
            } else {
                manager.replace_all(saved_plan);
            }
        }
        *self.language.write() = saved_language;
        *self.activity.write() = saved_activity;

        let len = self.plan.read().len();
        tracing::info!(days = len, language = %saved_language, "State loaded");
        Ok(())
    }

    /// Request a fresh curriculum from the plan generator and install it.
    /// On any failure the prior plan is left untouched; a partial plan is
    /// never installed.
    pub async fn generate_plan(&self) -> Result<(), TrackerError> {
        let language = self.language();

        let raw = match self.plan_generator.generate(language).await {
            Ok(raw) => raw,
            Err(e) => {
                self.metrics.record_generation_failure();
                tracing::error!(error = %e, "Plan generation failed");
                return Err(e);
            }
        };

        let hydrated = hydrate_plan(raw);
        {
            let mut manager = self.plan.write();
            manager.replace_all(hydrated);
        }
        self.metrics.record_generation_success();
        self.persist_plan().await?;

        tracing::info!(days = self.plan.read().len(), "Plan generated and installed");
        Ok(())
    }

    /// Clear the plan in memory and in storage. The language preference and
    /// the activity log survive a reset.
    pub async fn reset(&self) -> Result<(), TrackerError> {
        self.plan.write().clear();
        self.store.clear_plan().await?;
        tracing::info!("Plan reset");
        Ok(())
    }

    // --- keyed mutations, each persisted last-write-wins ---

    pub async fn set_status(&self, day: u32, status: StudyStatus) -> Result<(), TrackerError> {
        self.mutate(|m| m.set_status(day, status))?;
        self.persist_plan().await
    }

    /// Update logged hours for a day; the change is also recorded against
    /// today's date in the activity log.
    pub async fn set_hours(&self, day: u32, hours: f32) -> Result<(), TrackerError> {
        let delta = self.mutate_returning(|m| {
            let previous = m
                .days()
                .iter()
                .find(|d| d.day == day)
                .map(|d| d.hours_spent)
                .ok_or_else(|| TrackerError::not_found(format!("No plan entry for day {}", day)))?;
            m.set_hours_spent(day, hours)?;
            Ok(hours - previous)
        })?;

        if delta != 0.0 {
            let today = Local::now().date_naive();
            let snapshot = {
                let mut activity = self.activity.write();
                activity.add_hours(today, delta);
                activity.clone()
            };
            self.store.save_activity(&snapshot).await?;
        }

        self.persist_plan().await
    }

    pub async fn toggle_knowledge_point(
        &self,
        day: u32,
        point_index: usize,
    ) -> Result<(), TrackerError> {
        self.mutate(|m| m.toggle_knowledge_point(day, point_index))?;
        self.persist_plan().await
    }

    /// Resolve an explanation for one knowledge point.
    ///
    /// Cache-once: a stored explanation is returned without a fetch. At most
    /// one fetch per point may be in flight; a duplicate call while one is
    /// pending gets an explicit error. A failed fetch returns the localized
    /// fallback string, which is never written into the record, so the next
    /// call retries.
    pub async fn explain_knowledge_point(
        &self,
        day: u32,
        point_index: usize,
    ) -> Result<String, TrackerError> {
        let key = (day, point_index);
        let language = self.language();

        // Snapshot the target under the read lock; nothing async yet
        let (concept, day_title) = {
            let manager = self.plan.read();
            let entry = manager
                .days()
                .iter()
                .find(|d| d.day == day)
                .ok_or_else(|| {
                    self.metrics.record_lookup_miss();
                    TrackerError::not_found(format!("No plan entry for day {}", day))
                })?;
            let point = entry.knowledge_points.get(point_index).ok_or_else(|| {
                self.metrics.record_lookup_miss();
                TrackerError::not_found(format!(
                    "Knowledge point {} out of bounds for day {}",
                    point_index, day
                ))
            })?;

            if let Some(cached) = &point.explanation {
                self.metrics.record_explanation_cache_hit();
                return Ok(cached.clone());
            }

            (point.text.clone(), entry.title.clone())
        };

        {
            let mut inflight = self.inflight_explanations.lock();
            if !inflight.insert(key) {
                return Err(TrackerError::new(
                    format!(
                        "Explanation fetch already in flight for day {} point {}",
                        day, point_index
                    ),
                    "explanation",
                ));
            }
        }

        self.metrics.record_explanation_fetch();
        let fetched = self
            .explanation_generator
            .explain(&concept, &day_title, language)
            .await;

        let result = match fetched {
            Ok(text) => match self.mutate(|m| m.set_explanation(day, point_index, text.clone())) {
                Ok(()) => self.persist_plan().await.map(|_| text),
                // The point vanished while the fetch was in flight (plan reset
                // or regenerated); surface the miss, nothing to cache.
                Err(e) => Err(e),
            },
            Err(e) => {
                self.metrics.record_explanation_fallback();
                tracing::warn!(
                    day,
                    point_index,
                    error = %e,
                    "Explanation fetch failed, substituting fallback text"
                );
                Ok(language.explanation_fallback().to_string())
            }
        };

        self.inflight_explanations.lock().remove(&key);
        result
    }

    // --- read side ---

    pub fn plan(&self) -> Vec<DayPlan> {
        self.plan.read().days().to_vec()
    }

    pub fn is_empty(&self) -> bool {
        self.plan.read().is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.plan.read().active_index()
    }

    pub fn active_day(&self) -> Option<DayPlan> {
        self.plan.read().active_day().cloned()
    }

    /// Re-resolve the active index from current statuses. Within a session
    /// the index is sticky; the consuming UI calls this only on the flows
    /// where the resolver is meant to run again.
    pub fn refresh_active_index(&self) {
        self.plan.write().refresh_active_index();
    }

    /// Full recompute of the aggregate snapshot
    pub fn stats(&self) -> PlanStats {
        plan_metrics::compute_stats(self.plan.read().days())
    }

    /// Penalty owed on the active day (0 when there is no plan)
    pub fn penalty_hours(&self) -> u32 {
        let manager = self.plan.read();
        match manager.active_index() {
            Some(index) => plan_metrics::penalty_hours(manager.days(), index),
            None => 0,
        }
    }

    /// Base target plus penalty for the active day
    pub fn effective_target_hours(&self) -> Option<u32> {
        let manager = self.plan.read();
        manager
            .active_index()
            .map(|index| plan_metrics::effective_target_hours(manager.days(), index))
    }

    pub fn language(&self) -> Language {
        *self.language.read()
    }

    pub async fn set_language(&self, language: Language) -> Result<(), TrackerError> {
        *self.language.write() = language;
        self.store.save_language(language).await
    }

    pub fn activity(&self) -> ActivityLog {
        self.activity.read().clone()
    }

    // --- internals ---

    fn mutate<F>(&self, f: F) -> Result<(), TrackerError>
    where
        F: FnOnce(&mut PlanManager) -> Result<(), TrackerError>,
    {
        self.mutate_returning(|m| f(m))
    }

    fn mutate_returning<T, F>(&self, f: F) -> Result<T, TrackerError>
    where
        F: FnOnce(&mut PlanManager) -> Result<T, TrackerError>,
    {
        let mut manager = self.plan.write();
        f(&mut manager).map_err(|e| {
            if e.is_not_found() {
                self.metrics.record_lookup_miss();
            }
            e
        })
    }

    async fn persist_plan(&self) -> Result<(), TrackerError> {
        let snapshot = self.plan();
        self.store.save_plan(&snapshot).await
    }
}
