//! Built-in Liftoscript presets.
//!
//! Presets are plain scripts. Whether one needs maxes is worked out by
//! parsing it, so the flag can never drift from the script text.

use crate::builder::parse_template;
use crate::category::CategoryTable;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::Serialize;

/// A named example script
#[derive(Clone, Debug)]
pub struct Preset {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub script: &'static str,
}

/// Listing entry for a preset
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PresetInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub requires_maxes: bool,
}

/// Full preset content
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PresetContent {
    pub name: String,
    pub display_name: String,
    pub script: String,
}

const WENDLER_531: &str = "\
// Wendler 5/3/1: three main-lift days per week, last set AMRAP
# Week 1
## Squat Day
Barbell Squat / 1x5 65%, 1x5 75%, 1x5+ 85%
Pull Up / 3x8
Incline Dumbbell Press / 3x10
Decline Crunch / 3x15

## Bench Day
Flat Barbell Bench Press / 1x5 65%, 1x5 75%, 1x5+ 85%
Front Squat / 3x8
Dumbbell Row / 3x10
Landmines / 3x12

## Deadlift Day
Deadlift / 1x5 65%, 1x5 75%, 1x5+ 85%
Parallel Bar Triceps Dip / 3x10
Bulgarian Split Squat / 3x8
Cable Side Bend / 3x12

# Week 2
## Squat Day
Barbell Squat / 1x3 70%, 1x3 80%, 1x3+ 90%
Pull Up / 3x8
Incline Dumbbell Press / 3x10
Decline Crunch / 3x15

## Bench Day
Flat Barbell Bench Press / 1x3 70%, 1x3 80%, 1x3+ 90%
Front Squat / 3x8
Dumbbell Row / 3x10
Landmines / 3x12

## Deadlift Day
Deadlift / 1x3 70%, 1x3 80%, 1x3+ 90%
Parallel Bar Triceps Dip / 3x10
Bulgarian Split Squat / 3x8
Cable Side Bend / 3x12

# Week 3
## Squat Day
Barbell Squat / 1x5 75%, 1x3 85%, 1x1+ 95%
Pull Up / 3x8
Incline Dumbbell Press / 3x10
Decline Crunch / 3x15

## Bench Day
Flat Barbell Bench Press / 1x5 75%, 1x3 85%, 1x1+ 95%
Front Squat / 3x8
Dumbbell Row / 3x10
Landmines / 3x12

## Deadlift Day
Deadlift / 1x5 75%, 1x3 85%, 1x1+ 95%
Parallel Bar Triceps Dip / 3x10
Bulgarian Split Squat / 3x8
Cable Side Bend / 3x12

# Week 4 Deload
## Squat Day
Barbell Squat / 1x5 40%, 1x5 50%, 1x5 60% // deload
Pull Up / 2x8

## Bench Day
Flat Barbell Bench Press / 1x5 40%, 1x5 50%, 1x5 60% // deload
Dumbbell Row / 2x10

## Deadlift Day
Deadlift / 1x5 40%, 1x5 50%, 1x5 60% // deload
Bulgarian Split Squat / 2x8
";

const LINEAR_STRENGTH: &str = "\
// Alternate A/B days with fixed starting weights
# Week 1
## Day A
Barbell Squat / 3x5 135lb
Flat Barbell Bench Press / 3x5 95lb
Barbell Row / 3x5 95lb

## Day B
Barbell Squat / 3x5 135lb
Overhead Press / 3x5 65lb
Deadlift / 1x5 185lb // single work set
";

const HYPERTROPHY_PPL: &str = "\
// Push / pull / legs with rep ranges, weights chosen per session
# Week 1
## Push
Incline Dumbbell Press / 4x8-12
Overhead Press / 3x8-10
Parallel Bar Triceps Dip / 3x10+

## Pull
Pull Up / 4x6-10
Dumbbell Row / 3x10-12
Barbell Curl / 3x10-15

## Legs
Front Squat / 4x6-10
Bulgarian Split Squat / 3x10-12
Standing Calf Raise / 4x12-20
";

/// Cached preset catalog
static PRESETS: Lazy<Vec<Preset>> = Lazy::new(|| {
    vec![
        Preset {
            name: "wendler_531",
            display_name: "Wendler 5/3/1",
            description: "Four-week 5/3/1 wave on squat, bench and deadlift with a deload week",
            script: WENDLER_531,
        },
        Preset {
            name: "linear_strength",
            display_name: "Linear Strength A/B",
            description: "Two alternating full-body days with fixed starting weights",
            script: LINEAR_STRENGTH,
        },
        Preset {
            name: "hypertrophy_ppl",
            display_name: "Hypertrophy Push/Pull/Legs",
            description: "Three-day split using rep ranges and bodyweight work",
            script: HYPERTROPHY_PPL,
        },
    ]
});

/// All built-in presets
pub fn presets() -> &'static [Preset] {
    &PRESETS
}

/// Whether a script has percent-based sets and therefore needs maxes.
pub fn requires_maxes(script: &str) -> bool {
    match parse_template(script, &CategoryTable::default()) {
        Ok(template) => template.uses_percentages(),
        Err(e) => {
            tracing::warn!("Preset script failed to parse: {}", e);
            false
        }
    }
}

/// List presets with their `requires_maxes` flag.
pub fn list_presets() -> Vec<PresetInfo> {
    presets()
        .iter()
        .map(|p| PresetInfo {
            name: p.name.to_string(),
            display_name: p.display_name.to_string(),
            description: p.description.to_string(),
            requires_maxes: requires_maxes(p.script),
        })
        .collect()
}

/// Look up a preset's script by name.
pub fn get_preset(name: &str) -> Result<PresetContent> {
    presets()
        .iter()
        .find(|p| p.name == name)
        .map(|p| PresetContent {
            name: p.name.to_string(),
            display_name: p.display_name.to_string(),
            script: p.script.to_string(),
        })
        .ok_or_else(|| Error::UnknownPreset(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_parses() {
        for preset in presets() {
            let template = parse_template(preset.script, &CategoryTable::default())
                .unwrap_or_else(|e| panic!("preset {} failed: {}", preset.name, e));
            assert!(!template.sessions.is_empty(), "{} has no sessions", preset.name);
        }
    }

    #[test]
    fn test_requires_maxes_flags() {
        let infos = list_presets();
        let flag = |name: &str| infos.iter().find(|i| i.name == name).unwrap().requires_maxes;
        assert!(flag("wendler_531"));
        assert!(!flag("linear_strength"));
        assert!(!flag("hypertrophy_ppl"));
    }

    #[test]
    fn test_wendler_shape() {
        let template = parse_template(WENDLER_531, &CategoryTable::default()).unwrap();
        assert_eq!(template.sessions.len(), 12);
        assert_eq!(template.sessions[9].week.as_deref(), Some("Week 4 Deload"));
    }

    #[test]
    fn test_get_preset() {
        let preset = get_preset("wendler_531").unwrap();
        assert_eq!(preset.display_name, "Wendler 5/3/1");
        assert!(preset.script.contains("## Squat Day"));

        let err = get_preset("nope").unwrap_err();
        assert!(matches!(err, Error::UnknownPreset(ref n) if n == "nope"));
    }
}
