//! Generation entry point: script in, upcoming workout queue out.
//!
//! Generation runs in two phases. [`Generator::build_plan`] validates the
//! request, parses and resolves everything without touching a store; only
//! a fully built plan is then handed to the store by [`Generator::generate`].

use crate::builder::{build_plan, parse_template};
use crate::category::CategoryTable;
use crate::materialize::publish;
use crate::resolver::Rounding;
use crate::store::UpcomingStore;
use crate::{Config, Error, GenerationResult, Lift, Maxes, Plan, Result};

/// Default upper bound on `num_cycles`
pub const DEFAULT_MAX_CYCLES: u32 = 52;

/// Default upper bound on records in one plan
pub const DEFAULT_MAX_RECORDS: u64 = 10_000;

/// Plan generator holding the per-install policy
#[derive(Clone, Debug)]
pub struct Generator {
    table: CategoryTable,
    rounding: Rounding,
    max_cycles: u32,
    max_records: u64,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            table: CategoryTable::default(),
            rounding: Rounding::default(),
            max_cycles: DEFAULT_MAX_CYCLES,
            max_records: DEFAULT_MAX_RECORDS,
        }
    }
}

impl Generator {
    pub fn new(
        table: CategoryTable,
        rounding: Rounding,
        max_cycles: u32,
        max_records: u64,
    ) -> Self {
        Self {
            table,
            rounding,
            max_cycles,
            max_records,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            config.category_table(),
            config.rounding()?,
            config.plan.max_cycles,
            config.plan.max_records,
        ))
    }

    /// Phase one: validate, parse and resolve. Never touches a store.
    pub fn build_plan(&self, script: &str, num_cycles: u32, maxes: &Maxes) -> Result<Plan> {
        self.validate_request(script, num_cycles, maxes)?;

        let template = parse_template(script, &self.table)?;
        if template.sessions.is_empty() {
            return Err(Error::InvalidParameter(
                "script has no `##` day with exercises".into(),
            ));
        }

        let records = template.set_count() * u64::from(num_cycles);
        if records > self.max_records {
            return Err(Error::InvalidParameter(format!(
                "plan would create {} workouts, more than the limit of {}",
                records, self.max_records
            )));
        }

        build_plan(&template, maxes, num_cycles, &self.rounding)
    }

    /// Build the plan, then replace the store's queue with it.
    pub fn generate<S: UpcomingStore + ?Sized>(
        &self,
        store: &mut S,
        script: &str,
        num_cycles: u32,
        maxes: &Maxes,
    ) -> Result<GenerationResult> {
        let plan = self.build_plan(script, num_cycles, maxes)?;
        publish(&plan, store)
    }

    /// Like [`Generator::generate`], with failures folded into the result.
    pub fn run<S: UpcomingStore + ?Sized>(
        &self,
        store: &mut S,
        script: &str,
        num_cycles: u32,
        maxes: &Maxes,
    ) -> GenerationResult {
        match self.generate(store, script, num_cycles, maxes) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Generation failed: {}", e);
                GenerationResult::failure(e.to_string())
            }
        }
    }

    fn validate_request(&self, script: &str, num_cycles: u32, maxes: &Maxes) -> Result<()> {
        if script.trim().is_empty() {
            return Err(Error::InvalidParameter("script is empty".into()));
        }
        if num_cycles < 1 {
            return Err(Error::InvalidParameter(
                "num_cycles must be at least 1".into(),
            ));
        }
        if num_cycles > self.max_cycles {
            return Err(Error::InvalidParameter(format!(
                "num_cycles must be at most {}, got {}",
                self.max_cycles, num_cycles
            )));
        }
        for lift in Lift::ALL {
            if let Some(value) = maxes.get(lift) {
                if !value.is_finite() || value <= 0.0 {
                    return Err(Error::InvalidParameter(format!(
                        "{} max must be a positive number, got {}",
                        lift, value
                    )));
                }
            }
        }
        Ok(())
    }
}
