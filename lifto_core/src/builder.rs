//! Plan builder: walks classified lines and assembles sessions.
//!
//! Parsing is a small state machine over the line stream:
//!
//! ```text
//! NoContext --#--> InWeek --##--> InDay --exercise--> Accumulating
//!     |                             ^                     |
//!     +-------------##--------------+---------##----------+
//! ```
//!
//! A `#` week header closes any open day. Exercises are only valid while a
//! day is open. The parsed [`Template`] is then resolved and replicated
//! across cycles by [`build_plan`].

use crate::category::CategoryTable;
use crate::lexer::{tokenize, LineKind};
use crate::resolver::{resolve_weight, Rounding};
use crate::setspec::parse_set_list;
use crate::{
    Error, ExerciseEntry, Maxes, Plan, ResolvedSet, Result, Session, SessionTemplate, Template,
};

/// Parser state between lines
#[derive(Clone, Debug, PartialEq)]
pub enum BuilderState {
    NoContext,
    InWeek { week: String },
    /// Day header seen, no exercises yet
    InDay { session: SessionTemplate },
    /// Day with at least one exercise
    Accumulating { session: SessionTemplate },
}

/// Outcome of one transition: the next state and any session it closed
#[derive(Debug)]
pub struct Transition {
    pub state: BuilderState,
    pub closed: Option<SessionTemplate>,
}

impl Transition {
    fn to(state: BuilderState) -> Self {
        Self {
            state,
            closed: None,
        }
    }
}

impl BuilderState {
    fn week(&self) -> Option<String> {
        match self {
            BuilderState::NoContext => None,
            BuilderState::InWeek { week } => Some(week.clone()),
            BuilderState::InDay { session } | BuilderState::Accumulating { session } => {
                session.week.clone()
            }
        }
    }

    /// Close the open session, if any. Days without exercises are dropped.
    fn close(self) -> Option<SessionTemplate> {
        match self {
            BuilderState::Accumulating { session } => {
                tracing::debug!(
                    "Closed day '{}' ({}) with {} exercises",
                    session.day,
                    session.category,
                    session.exercises.len()
                );
                Some(session)
            }
            BuilderState::InDay { session } => {
                tracing::warn!("Day '{}' has no exercises, skipping it", session.day);
                None
            }
            BuilderState::NoContext | BuilderState::InWeek { .. } => None,
        }
    }

    /// `# label`: record the week and leave any open day.
    pub fn on_week_header(self, label: String) -> Transition {
        Transition {
            closed: self.close(),
            state: BuilderState::InWeek { week: label },
        }
    }

    /// `## label`: close the open day and open a new one.
    pub fn on_day_header(self, label: String, table: &CategoryTable) -> Transition {
        let session = SessionTemplate {
            week: self.week(),
            category: table.infer(&label),
            day: label,
            exercises: Vec::new(),
        };
        Transition {
            closed: self.close(),
            state: BuilderState::InDay { session },
        }
    }

    /// Exercise line: append to the open day.
    pub fn on_exercise(self, line: usize, text: &str) -> Result<Transition> {
        match self {
            BuilderState::InDay { mut session } | BuilderState::Accumulating { mut session } => {
                session.exercises.push(parse_exercise_line(line, text)?);
                Ok(Transition::to(BuilderState::Accumulating { session }))
            }
            BuilderState::NoContext | BuilderState::InWeek { .. } => Err(Error::OrphanExercise {
                line,
                text: text.to_string(),
            }),
        }
    }

    /// End of input.
    pub fn finish(self) -> Option<SessionTemplate> {
        self.close()
    }
}

/// Parse `Name / SetList [// comment]`.
pub fn parse_exercise_line(line: usize, text: &str) -> Result<ExerciseEntry> {
    let (body, comment) = match text.split_once("//") {
        Some((body, comment)) => {
            let comment = comment.trim();
            (body, (!comment.is_empty()).then(|| comment.to_string()))
        }
        None => (text, None),
    };

    let (name, list) = body.split_once('/').ok_or_else(|| {
        Error::parse(line, text, body.trim(), "expected `Exercise / sets`")
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(Error::parse(line, text, "/", "missing exercise name"));
    }

    Ok(ExerciseEntry {
        name: name.to_string(),
        sets: parse_set_list(line, text, list)?,
        comment,
        line,
    })
}

/// Parse a script into its session template.
pub fn parse_template(script: &str, table: &CategoryTable) -> Result<Template> {
    let mut state = BuilderState::NoContext;
    let mut sessions = Vec::new();

    for line in tokenize(script)? {
        let transition = match line.kind {
            LineKind::Blank | LineKind::Comment(_) => continue,
            LineKind::WeekHeader(label) => {
                if label.is_empty() {
                    return Err(Error::parse(line.number, "#", "#", "week header needs a label"));
                }
                state.on_week_header(label)
            }
            LineKind::DayHeader(label) => {
                if label.is_empty() {
                    return Err(Error::parse(line.number, "##", "##", "day header needs a label"));
                }
                state.on_day_header(label, table)
            }
            LineKind::ExerciseSpec(text) => state.on_exercise(line.number, &text)?,
        };

        if let Some(session) = transition.closed {
            sessions.push(session);
        }
        state = transition.state;
    }

    if let Some(session) = state.finish() {
        sessions.push(session);
    }

    tracing::debug!("Parsed template with {} sessions", sessions.len());
    Ok(Template { sessions })
}

/// Resolve a template against `maxes` and repeat it `num_cycles` times.
///
/// Session numbers start at 1 and continue across cycles. Every cycle
/// resolves against the same maxes.
pub fn build_plan(
    template: &Template,
    maxes: &Maxes,
    num_cycles: u32,
    rounding: &Rounding,
) -> Result<Plan> {
    if num_cycles == 0 {
        return Err(Error::InvalidParameter(
            "num_cycles must be at least 1".into(),
        ));
    }

    let mut sessions = Vec::with_capacity(template.sessions.len() * num_cycles as usize);
    let mut number = 0;

    for cycle in 1..=num_cycles {
        for day in &template.sessions {
            number += 1;
            sessions.push(Session {
                number,
                cycle,
                week: day.week.clone(),
                day: day.day.clone(),
                category: day.category.clone(),
                sets: resolve_day(day, maxes, rounding)?,
            });
        }
    }

    let plan = Plan { sessions };
    tracing::debug!(
        "Built plan: {} sessions, {} sets over {} cycles",
        plan.sessions.len(),
        plan.set_count(),
        num_cycles
    );
    Ok(plan)
}

/// Expand every set group of a day into concrete sets.
fn resolve_day(
    day: &SessionTemplate,
    maxes: &Maxes,
    rounding: &Rounding,
) -> Result<Vec<ResolvedSet>> {
    let mut sets = Vec::new();

    for exercise in &day.exercises {
        for spec in &exercise.sets {
            let resolved = spec
                .weight
                .as_ref()
                .map(|expr| resolve_weight(expr, &day.category, maxes, rounding, exercise.line))
                .transpose()?;

            for _ in 0..spec.count {
                sets.push(ResolvedSet {
                    exercise: exercise.name.clone(),
                    category: day.category.clone(),
                    weight: resolved.map(|w| w.value),
                    weight_unit: resolved.map(|w| w.unit).unwrap_or(rounding.unit),
                    reps: spec.reps,
                    comment: exercise.comment.clone(),
                });
            }
        }
    }

    Ok(sets)
}
