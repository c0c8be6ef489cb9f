//! Core domain types for the Liftoscript plan generator.
//!
//! This module defines the fundamental types used throughout the system:
//! - Lifts, categories and weight units
//! - Set specifications as written in a script
//! - The parsed template and the resolved, numbered plan
//! - Upcoming workout records and generation summaries

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Lifts and Categories
// ============================================================================

/// A main lift with a tracked one-rep max
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Lift {
    Squat,
    Bench,
    Deadlift,
}

impl Lift {
    pub const ALL: [Lift; 3] = [Lift::Squat, Lift::Bench, Lift::Deadlift];

    pub fn name(&self) -> &'static str {
        match self {
            Lift::Squat => "Squat",
            Lift::Bench => "Bench",
            Lift::Deadlift => "Deadlift",
        }
    }
}

impl fmt::Display for Lift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category of a training day, inferred from its `##` header
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Lift(Lift),
    /// Header text that matched no keyword, kept verbatim
    Other(String),
}

impl Category {
    /// The lift whose max backs percentage weights on this day
    pub fn lift(&self) -> Option<Lift> {
        match self {
            Category::Lift(lift) => Some(*lift),
            Category::Other(_) => None,
        }
    }

    /// Parse a category name as written in config files.
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        match trimmed.to_lowercase().as_str() {
            "squat" => Category::Lift(Lift::Squat),
            "bench" => Category::Lift(Lift::Bench),
            "deadlift" => Category::Lift(Lift::Deadlift),
            _ => Category::Other(trimmed.to_string()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Lift(lift) => write!(f, "{}", lift),
            Category::Other(text) => f.write_str(text),
        }
    }
}

/// Unit attached to a weight for display
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "lbs", alias = "lb")]
    Lbs,
    #[serde(rename = "kg")]
    Kg,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Lbs => "lbs",
            WeightUnit::Kg => "kg",
        }
    }

    /// Plate increment used when no explicit rounding is configured
    pub fn default_increment(&self) -> f64 {
        match self {
            WeightUnit::Lbs => 5.0,
            WeightUnit::Kg => 2.5,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lb" | "lbs" => Ok(WeightUnit::Lbs),
            "kg" | "kgs" => Ok(WeightUnit::Kg),
            other => Err(format!("Unknown weight unit: {}", other)),
        }
    }
}

// ============================================================================
// Set Specifications
// ============================================================================

/// Rep target for a set
///
/// Only `Fixed` persists as a number; AMRAP and ranges persist as text
/// (`"5+"`, `"8-12"`) so the script notation survives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reps {
    Fixed(u32),
    /// As many reps as possible, with the listed minimum
    Amrap(u32),
    Range { low: u32, high: u32 },
}

impl Reps {
    /// Numeric floor of the rep target: `5+` → 5, `8-12` → 8
    pub fn floor(&self) -> u32 {
        match self {
            Reps::Fixed(n) | Reps::Amrap(n) => *n,
            Reps::Range { low, .. } => *low,
        }
    }
}

impl fmt::Display for Reps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reps::Fixed(n) => write!(f, "{}", n),
            Reps::Amrap(n) => write!(f, "{}+", n),
            Reps::Range { low, high } => write!(f, "{}-{}", low, high),
        }
    }
}

impl FromStr for Reps {
    type Err = String;

    /// Accepts `5`, `5+` and `8-12`. Zero reps are rejected.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let positive = |t: &str| -> std::result::Result<u32, String> {
            if t.is_empty() || !t.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format!("reps `{}` is not a whole number", t));
            }
            match t.parse::<u32>() {
                Ok(0) => Err("reps must be at least 1".to_string()),
                Ok(n) => Ok(n),
                Err(_) => Err(format!("reps `{}` is not a whole number", t)),
            }
        };

        let s = s.trim();
        if let Some(base) = s.strip_suffix('+') {
            return Ok(Reps::Amrap(positive(base)?));
        }
        if let Some((low, high)) = s.split_once('-') {
            let (low, high) = (positive(low)?, positive(high)?);
            if low > high {
                return Err(format!("rep range {}-{} is inverted", low, high));
            }
            return Ok(Reps::Range { low, high });
        }
        Ok(Reps::Fixed(positive(s)?))
    }
}

impl Serialize for Reps {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Reps::Fixed(n) => serializer.serialize_u32(*n),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Reps {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawReps {
            Number(u32),
            Text(String),
        }

        match RawReps::deserialize(deserializer)? {
            RawReps::Number(0) => Err(serde::de::Error::custom("reps must be at least 1")),
            RawReps::Number(n) => Ok(Reps::Fixed(n)),
            RawReps::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Weight column of a set group
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WeightExpr {
    /// Percentage of the day's lift max; values over 100 are allowed
    Percent(f64),
    /// Literal weight, optionally with an explicit unit suffix
    Absolute { value: f64, unit: Option<WeightUnit> },
}

/// One `NxR [weight]` group from a set list
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SetSpec {
    pub count: u32,
    pub reps: Reps,
    /// `None` for bodyweight/unloaded sets
    pub weight: Option<WeightExpr>,
}

/// Known one-rep maxes for the main lifts
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Maxes {
    pub squat: Option<f64>,
    pub bench: Option<f64>,
    pub deadlift: Option<f64>,
}

impl Maxes {
    pub fn get(&self, lift: Lift) -> Option<f64> {
        match lift {
            Lift::Squat => self.squat,
            Lift::Bench => self.bench,
            Lift::Deadlift => self.deadlift,
        }
    }

    pub fn set(&mut self, lift: Lift, value: Option<f64>) {
        match lift {
            Lift::Squat => self.squat = value,
            Lift::Bench => self.bench = value,
            Lift::Deadlift => self.deadlift = value,
        }
    }

    /// Max backing percentage weights for a day category
    pub fn for_category(&self, category: &Category) -> Option<f64> {
        category.lift().and_then(|lift| self.get(lift))
    }

    /// Fill any missing lift from `other`
    pub fn or(self, other: Maxes) -> Maxes {
        Maxes {
            squat: self.squat.or(other.squat),
            bench: self.bench.or(other.bench),
            deadlift: self.deadlift.or(other.deadlift),
        }
    }
}

// ============================================================================
// Parsed Template
// ============================================================================

/// One exercise line of a script
#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseEntry {
    pub name: String,
    pub sets: Vec<SetSpec>,
    pub comment: Option<String>,
    /// 1-based source line, kept for resolution errors
    pub line: usize,
}

/// One `##` day with its exercises, before numbering
#[derive(Clone, Debug, PartialEq)]
pub struct SessionTemplate {
    pub week: Option<String>,
    pub day: String,
    pub category: Category,
    pub exercises: Vec<ExerciseEntry>,
}

/// A script parsed once, ready to be replicated across cycles
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Template {
    pub sessions: Vec<SessionTemplate>,
}

impl Template {
    /// Whether any set is weighted by a percentage of a max
    pub fn uses_percentages(&self) -> bool {
        self.sessions
            .iter()
            .flat_map(|s| &s.exercises)
            .flat_map(|e| &e.sets)
            .any(|set| matches!(set.weight, Some(WeightExpr::Percent(_))))
    }

    /// Records one cycle expands to
    pub fn set_count(&self) -> u64 {
        self.sessions
            .iter()
            .flat_map(|s| &s.exercises)
            .flat_map(|e| &e.sets)
            .map(|set| u64::from(set.count))
            .sum()
    }
}

// ============================================================================
// Resolved Plan
// ============================================================================

/// A single concrete set with its weight computed
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSet {
    pub exercise: String,
    pub category: Category,
    pub weight: Option<f64>,
    pub weight_unit: WeightUnit,
    pub reps: Reps,
    pub comment: Option<String>,
}

/// A numbered training day in the generated plan
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub number: u32,
    pub cycle: u32,
    pub week: Option<String>,
    pub day: String,
    pub category: Category,
    pub sets: Vec<ResolvedSet>,
}

/// The full generated plan, all cycles included
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Plan {
    pub sessions: Vec<Session>,
}

impl Plan {
    pub fn set_count(&self) -> usize {
        self.sessions.iter().map(|s| s.sets.len()).sum()
    }
}

// ============================================================================
// Output Records
// ============================================================================

/// An upcoming workout row, the unit handed to the store
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UpcomingWorkout {
    pub session: u32,
    pub exercise: String,
    pub category: String,
    pub weight: Option<f64>,
    pub weight_unit: WeightUnit,
    pub reps: Reps,
    pub comment: Option<String>,
}

/// Summary returned to the caller of a generation run
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GenerationResult {
    pub success: bool,
    pub message: String,
    pub count: usize,
    pub sessions: usize,
    pub deleted_count: usize,
}

impl GenerationResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            count: 0,
            sessions: 0,
            deleted_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reps_parse_variants() {
        assert_eq!("5".parse::<Reps>().unwrap(), Reps::Fixed(5));
        assert_eq!("5+".parse::<Reps>().unwrap(), Reps::Amrap(5));
        assert_eq!(
            "8-12".parse::<Reps>().unwrap(),
            Reps::Range { low: 8, high: 12 }
        );
        assert!("0".parse::<Reps>().is_err());
        assert!("12-8".parse::<Reps>().is_err());
        assert!("five".parse::<Reps>().is_err());
        assert!("+5".parse::<Reps>().is_err());
        assert!("5++".parse::<Reps>().is_err());
    }

    #[test]
    fn test_amrap_serializes_as_text() {
        let json = serde_json::to_string(&Reps::Amrap(5)).unwrap();
        assert_eq!(json, "\"5+\"");
        let json = serde_json::to_string(&Reps::Fixed(5)).unwrap();
        assert_eq!(json, "5");
    }

    #[test]
    fn test_reps_deserialize_number_or_text() {
        let fixed: Reps = serde_json::from_str("3").unwrap();
        assert_eq!(fixed, Reps::Fixed(3));
        let amrap: Reps = serde_json::from_str("\"1+\"").unwrap();
        assert_eq!(amrap, Reps::Amrap(1));
        assert!(serde_json::from_str::<Reps>("0").is_err());
    }

    #[test]
    fn test_reps_floor() {
        assert_eq!(Reps::Amrap(5).floor(), 5);
        assert_eq!(Reps::Range { low: 8, high: 12 }.floor(), 8);
    }

    #[test]
    fn test_weight_unit_parsing() {
        assert_eq!("lb".parse::<WeightUnit>().unwrap(), WeightUnit::Lbs);
        assert_eq!("LBS".parse::<WeightUnit>().unwrap(), WeightUnit::Lbs);
        assert_eq!("kg".parse::<WeightUnit>().unwrap(), WeightUnit::Kg);
        assert!("stone".parse::<WeightUnit>().is_err());
    }

    #[test]
    fn test_category_display_and_lift() {
        assert_eq!(Category::Lift(Lift::Squat).to_string(), "Squat");
        assert_eq!(Category::Other("Arms Day".into()).to_string(), "Arms Day");
        assert_eq!(Category::from_name("bench"), Category::Lift(Lift::Bench));
        assert_eq!(Category::Other("Conditioning".into()).lift(), None);
    }

    #[test]
    fn test_maxes_for_category() {
        let maxes = Maxes {
            squat: Some(300.0),
            ..Default::default()
        };
        assert_eq!(maxes.for_category(&Category::Lift(Lift::Squat)), Some(300.0));
        assert_eq!(maxes.for_category(&Category::Lift(Lift::Bench)), None);
        assert_eq!(maxes.for_category(&Category::Other("Arms".into())), None);
    }

    #[test]
    fn test_maxes_or_prefers_self() {
        let explicit = Maxes {
            squat: Some(315.0),
            ..Default::default()
        };
        let history = Maxes {
            squat: Some(300.0),
            bench: Some(225.0),
            deadlift: None,
        };
        let merged = explicit.or(history);
        assert_eq!(merged.squat, Some(315.0));
        assert_eq!(merged.bench, Some(225.0));
        assert_eq!(merged.deadlift, None);
    }
}
