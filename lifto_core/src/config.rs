//! Configuration file support for lifto.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/lifto/config.toml`.

use crate::category::{CategoryTable, KeywordRule};
use crate::resolver::Rounding;
use crate::{Error, Lift, Result, WeightUnit};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of `config.toml`
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub plan: PlanConfig,

    #[serde(default)]
    pub categories: CategoryConfig,

    #[serde(default)]
    pub lifts: LiftsConfig,
}

/// Where the upcoming queue is stored
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Plan generation parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanConfig {
    #[serde(default)]
    pub weight_unit: WeightUnit,

    /// Plate increment; defaults by unit when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding_increment: Option<f64>,

    #[serde(default = "default_max_cycles")]
    pub max_cycles: u32,

    /// Upper bound on records in one generated plan
    #[serde(default = "default_max_records")]
    pub max_records: u64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            weight_unit: WeightUnit::default(),
            rounding_increment: None,
            max_cycles: default_max_cycles(),
            max_records: default_max_records(),
        }
    }
}

/// Extra day-header keywords
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CategoryConfig {
    #[serde(default)]
    pub keywords: Vec<KeywordRule>,
}

/// Exercise names whose logged history estimates each lift's max
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiftsConfig {
    #[serde(default = "default_squat_exercise")]
    pub squat: String,

    #[serde(default = "default_bench_exercise")]
    pub bench: String,

    #[serde(default = "default_deadlift_exercise")]
    pub deadlift: String,
}

impl Default for LiftsConfig {
    fn default() -> Self {
        Self {
            squat: default_squat_exercise(),
            bench: default_bench_exercise(),
            deadlift: default_deadlift_exercise(),
        }
    }
}

impl LiftsConfig {
    pub fn exercise_for(&self, lift: Lift) -> &str {
        match lift {
            Lift::Squat => &self.squat,
            Lift::Bench => &self.bench,
            Lift::Deadlift => &self.deadlift,
        }
    }
}

// serde defaults
fn home_or_current() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_or_current().join(".local/share"));
    base.join("lifto")
}

fn default_max_cycles() -> u32 {
    crate::generate::DEFAULT_MAX_CYCLES
}

fn default_max_records() -> u64 {
    crate::generate::DEFAULT_MAX_RECORDS
}

fn default_squat_exercise() -> String {
    "Barbell Squat".into()
}

fn default_bench_exercise() -> String {
    "Flat Barbell Bench Press".into()
}

fn default_deadlift_exercise() -> String {
    "Deadlift".into()
}

impl Config {
    /// Load from [`Config::default_config_path`], or defaults if absent.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config at {:?}, using built-in defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_or_current().join(".config"));
        base.join("lifto").join("config.toml")
    }

    /// Write this config as TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(increment) = self.plan.rounding_increment {
            if !increment.is_finite() || increment <= 0.0 {
                return Err(Error::Config(format!(
                    "plan.rounding_increment must be positive, got {}",
                    increment
                )));
            }
        }
        if self.plan.max_cycles == 0 {
            return Err(Error::Config("plan.max_cycles must be at least 1".into()));
        }
        if self.plan.max_records == 0 {
            return Err(Error::Config("plan.max_records must be at least 1".into()));
        }
        Ok(())
    }

    /// Rounding policy for percent-based weights
    pub fn rounding(&self) -> Result<Rounding> {
        match self.plan.rounding_increment {
            Some(increment) => Rounding::new(self.plan.weight_unit, increment),
            None => Ok(Rounding::for_unit(self.plan.weight_unit)),
        }
    }

    pub fn category_table(&self) -> CategoryTable {
        CategoryTable::with_rules(&self.categories.keywords)
    }

    /// Path of the upcoming workout store
    pub fn upcoming_path(&self) -> PathBuf {
        self.data.data_dir.join("upcoming.json")
    }

    /// Default history file that completed sessions are appended to
    pub fn history_path(&self) -> PathBuf {
        self.data.data_dir.join("history.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.plan.weight_unit, WeightUnit::Lbs);
        assert_eq!(config.plan.max_cycles, 52);
        assert_eq!(config.rounding().unwrap().increment, 5.0);
        assert_eq!(config.lifts.exercise_for(Lift::Bench), "Flat Barbell Bench Press");
        assert!(config.upcoming_path().ends_with("upcoming.json"));
        assert_eq!(
            config.history_path().parent(),
            config.upcoming_path().parent()
        );
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.plan.max_cycles, parsed.plan.max_cycles);
        assert_eq!(config.lifts.squat, parsed.lifts.squat);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[plan]
weight_unit = "kg"

[[categories.keywords]]
keyword = "legs"
category = "Squat"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.plan.weight_unit, WeightUnit::Kg);
        assert_eq!(config.rounding().unwrap().increment, 2.5);
        assert_eq!(config.plan.max_cycles, 52); // default
        assert_eq!(
            config.category_table().infer("Legs"),
            Category::Lift(Lift::Squat)
        );
    }

    #[test]
    fn test_explicit_increment_and_validation() {
        let mut config = Config::default();
        config.plan.rounding_increment = Some(2.5);
        assert_eq!(config.rounding().unwrap().increment, 2.5);

        config.plan.rounding_increment = Some(-1.0);
        assert!(config.validate().is_err());

        config.plan.rounding_increment = None;
        config.plan.max_cycles = 0;
        assert!(config.validate().is_err());

        config.plan.max_cycles = 4;
        config.plan.max_records = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.plan.max_cycles = 12;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.plan.max_cycles, 12);
    }
}
