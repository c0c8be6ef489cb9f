//! Line classifier for Liftoscript text.
//!
//! Scripts are line oriented: `#` opens a week, `##` opens a training day,
//! `//` is a note, and anything else is an exercise line.

use crate::{Error, Result};

/// Classification of one script line, with its payload
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// Text after `#`, trimmed
    WeekHeader(String),
    /// Text after `##`, trimmed
    DayHeader(String),
    /// Text after `//`, trimmed
    Comment(String),
    /// The whole trimmed line, parsed later by the plan builder
    ExerciseSpec(String),
}

/// A classified script line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// 1-based
    pub number: usize,
    pub kind: LineKind,
}

/// Classify a single line of script text.
///
/// Fails on a header deeper than `##`, with the reason.
pub fn classify(raw: &str) -> std::result::Result<LineKind, &'static str> {
    let text = raw.trim();

    let kind = if text.is_empty() {
        LineKind::Blank
    } else if let Some(rest) = text.strip_prefix("//") {
        LineKind::Comment(rest.trim().to_string())
    } else if text.starts_with("###") {
        return Err("only `#` week and `##` day headers exist");
    } else if let Some(rest) = text.strip_prefix("##") {
        LineKind::DayHeader(rest.trim().to_string())
    } else if let Some(rest) = text.strip_prefix('#') {
        LineKind::WeekHeader(rest.trim().to_string())
    } else {
        LineKind::ExerciseSpec(text.to_string())
    };
    Ok(kind)
}

/// Split a script into numbered, classified lines.
///
/// A leading byte order mark is dropped.
pub fn tokenize(script: &str) -> Result<Vec<Line>> {
    let script = script.strip_prefix('\u{feff}').unwrap_or(script);

    script
        .lines()
        .enumerate()
        .map(|(idx, raw)| {
            let number = idx + 1;
            let kind = classify(raw).map_err(|reason| {
                let text = raw.trim();
                let token = text.split_whitespace().next().unwrap_or(text);
                Error::parse(number, text, token, reason)
            })?;
            Ok(Line { number, kind })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_headers() {
        assert_eq!(classify("# Week 1").unwrap(), LineKind::WeekHeader("Week 1".into()));
        assert_eq!(
            classify("  ## Squat Day  ").unwrap(),
            LineKind::DayHeader("Squat Day".into())
        );
        assert_eq!(classify("#Week 2").unwrap(), LineKind::WeekHeader("Week 2".into()));
    }

    #[test]
    fn test_classify_comment_and_blank() {
        assert_eq!(
            classify("// warm up first").unwrap(),
            LineKind::Comment("warm up first".into())
        );
        assert_eq!(classify("   \t ").unwrap(), LineKind::Blank);
        assert_eq!(classify("").unwrap(), LineKind::Blank);
    }

    #[test]
    fn test_classify_exercise_candidate() {
        assert_eq!(
            classify("Barbell Squat / 3x5 75%").unwrap(),
            LineKind::ExerciseSpec("Barbell Squat / 3x5 75%".into())
        );
        // Shape is checked by the builder, not here
        assert_eq!(
            classify("just some words").unwrap(),
            LineKind::ExerciseSpec("just some words".into())
        );
    }

    #[test]
    fn test_tokenize_numbers_lines_from_one() {
        let lines = tokenize("# Week 1\n\n## Squat Day\r\nSquat / 1x5 100\n").unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].kind, LineKind::Blank);
        assert_eq!(lines[2].kind, LineKind::DayHeader("Squat Day".into()));
        assert_eq!(lines[3].number, 4);
    }

    #[test]
    fn test_leading_bom_is_ignored() {
        let lines = tokenize("\u{feff}# Week 1\n## Squat Day\n").unwrap();
        assert_eq!(lines[0].kind, LineKind::WeekHeader("Week 1".into()));
        assert_eq!(lines[0].number, 1);
    }

    #[test]
    fn test_deeper_headers_rejected() {
        assert!(classify("### Squat Day").is_err());
        let err = tokenize("# Week 1\n### Squat Day\n").unwrap_err();
        match err {
            Error::PlanParse { line, token, .. } => {
                assert_eq!(line, 2);
                assert_eq!(token, "###");
            }
            other => panic!("Expected PlanParse, got {:?}", other),
        }
    }
}
