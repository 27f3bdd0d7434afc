//! Daily planning: instantiate, assign, advise, persist.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

use crate::advisor::{Advisor, HttpTextAdvisor, TextAdvisor};
use crate::assignment::AssignmentEngine;
use crate::availability::{AvailabilityModel, AvailabilitySnapshot};
use crate::catalog::{CadenceConfig, ChoreCatalog, ChoreInstance};
use crate::clock::Clock;
use crate::error::Result;
use crate::fairness::FairnessScorer;
use crate::storage::{Config, RunRecord, Store};

/// Runs one day's assignment against a [`Store`].
pub struct DailyPlanner {
    catalog: ChoreCatalog,
    cadence: CadenceConfig,
    engine: AssignmentEngine,
    advisor: Advisor,
    text_advisor: Option<Arc<dyn TextAdvisor>>,
}

impl DailyPlanner {
    pub fn new(catalog: ChoreCatalog) -> Self {
        Self {
            catalog,
            cadence: CadenceConfig::default(),
            engine: AssignmentEngine::new(),
            advisor: Advisor::new(),
            text_advisor: None,
        }
    }

    /// Build from configuration.
    ///
    /// The text advisor is attached only when `advisor.enabled` is set and
    /// its API key is present; otherwise planning is rule-only.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = config.catalog.load_catalog()?;
        let availability = AvailabilityModel::with_config(config.availability.clone());
        let engine = AssignmentEngine::with_config(config.engine.clone())
            .with_availability(availability)
            .with_fairness(FairnessScorer::with_config(config.fairness.clone()));
        let advisor = Advisor::with_config(config.advisor.clone())
            .with_low_availability_rate(config.availability.low_rate_threshold);

        let text_advisor: Option<Arc<dyn TextAdvisor>> = if config.advisor.enabled {
            match HttpTextAdvisor::from_config(&config.advisor) {
                Ok(http) => Some(Arc::new(http)),
                Err(e) => {
                    tracing::warn!(error = %e, "text advisor disabled");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            catalog,
            cadence: config.catalog.cadence.clone(),
            engine,
            advisor,
            text_advisor,
        })
    }

    pub fn with_engine(mut self, engine: AssignmentEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_advisor(mut self, advisor: Advisor) -> Self {
        self.advisor = advisor;
        self
    }

    pub fn with_cadence(mut self, cadence: CadenceConfig) -> Self {
        self.cadence = cadence;
        self
    }

    pub fn with_text_advisor(mut self, text_advisor: Arc<dyn TextAdvisor>) -> Self {
        self.text_advisor = Some(text_advisor);
        self
    }

    /// Drop the text advisor; advisories come from rules alone.
    pub fn offline(mut self) -> Self {
        self.text_advisor = None;
        self
    }

    pub fn catalog(&self) -> &ChoreCatalog {
        &self.catalog
    }

    pub fn engine(&self) -> &AssignmentEngine {
        &self.engine
    }

    /// Catalog chores due on `date`, with stored status and assignees carried
    /// over. Stored instances not in the catalog are appended in stored order.
    pub fn instances_for(&self, store: &dyn Store, date: NaiveDate) -> Result<Vec<ChoreInstance>> {
        let stored = store.load_instances(date)?;
        let mut by_id: HashMap<String, ChoreInstance> = HashMap::with_capacity(stored.len());
        let mut extra_order = Vec::new();
        for instance in stored {
            extra_order.push(instance.id.clone());
            by_id.insert(instance.id.clone(), instance);
        }

        let mut chores: Vec<ChoreInstance> = self
            .catalog
            .instantiate_for(date, &self.cadence)
            .into_iter()
            .map(|fresh| match by_id.remove(&fresh.id) {
                Some(saved) => ChoreInstance {
                    status: saved.status,
                    assignee: saved.assignee,
                    ..fresh
                },
                None => fresh,
            })
            .collect();

        chores.extend(extra_order.into_iter().filter_map(|id| by_id.remove(&id)));
        Ok(chores)
    }

    /// Plan `date` (default: the clock's today), store the run and return it.
    pub async fn plan(
        &self,
        store: &dyn Store,
        clock: &dyn Clock,
        date: Option<NaiveDate>,
    ) -> Result<RunRecord> {
        let date = date.unwrap_or_else(|| clock.today());
        let chores = self.instances_for(store, date)?;
        let roster = store.load_roster()?;
        let snapshot = AvailabilitySnapshot::new(date, store.load_out_of_home(date)?);

        tracing::info!(%date, chores = chores.len(), members = roster.len(), "planning day");
        let result = self.engine.assign(&chores, &roster, &snapshot)?;

        let advisories = match &self.text_advisor {
            Some(text_advisor) => {
                self.advisor
                    .advise_with(&result, Arc::clone(text_advisor))
                    .await
            }
            None => self.advisor.advise(&result),
        };
        let result = result.with_advisories(advisories);

        let run = RunRecord::new(result, clock.now());
        store.save_assignments(&run)?;
        tracing::info!(
            run_id = %run.run_id,
            score = run.result.fairness.score,
            "stored assignment run"
        );
        Ok(run)
    }
}
