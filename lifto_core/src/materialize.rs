//! Output materializer: turns a resolved plan into upcoming workout rows.

use crate::store::UpcomingStore;
use crate::{GenerationResult, Plan, Result, UpcomingWorkout};

/// Flatten a plan into store rows, in session, exercise and set order.
pub fn materialize(plan: &Plan) -> Vec<UpcomingWorkout> {
    plan.sessions
        .iter()
        .flat_map(|session| {
            session.sets.iter().map(move |set| UpcomingWorkout {
                session: session.number,
                exercise: set.exercise.clone(),
                category: set.category.to_string(),
                weight: set.weight,
                weight_unit: set.weight_unit,
                reps: set.reps,
                comment: set.comment.clone(),
            })
        })
        .collect()
}

/// Replace the store's upcoming queue with the plan's rows.
///
/// The store performs delete-then-insert as one atomic step; nothing is
/// written unless the plan was fully built beforehand.
pub fn publish<S: UpcomingStore + ?Sized>(plan: &Plan, store: &mut S) -> Result<GenerationResult> {
    let records = materialize(plan);
    let deleted_count = store.replace_all(&records)?;
    let sessions = plan.sessions.len();

    tracing::info!(
        "Generated {} upcoming workouts across {} sessions ({} replaced)",
        records.len(),
        sessions,
        deleted_count
    );

    Ok(GenerationResult {
        success: true,
        message: format!(
            "Generated {} workouts across {} sessions",
            records.len(),
            sessions
        ),
        count: records.len(),
        sessions,
        deleted_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::{Category, Lift, Reps, ResolvedSet, Session, WeightUnit};

    fn set(exercise: &str, weight: Option<f64>, reps: Reps) -> ResolvedSet {
        ResolvedSet {
            exercise: exercise.into(),
            category: Category::Lift(Lift::Squat),
            weight,
            weight_unit: WeightUnit::Lbs,
            reps,
            comment: None,
        }
    }

    fn plan() -> Plan {
        Plan {
            sessions: vec![
                Session {
                    number: 1,
                    cycle: 1,
                    week: Some("Week 1".into()),
                    day: "Squat Day".into(),
                    category: Category::Lift(Lift::Squat),
                    sets: vec![
                        set("Squat", Some(195.0), Reps::Fixed(5)),
                        set("Squat", Some(255.0), Reps::Amrap(5)),
                    ],
                },
                Session {
                    number: 2,
                    cycle: 1,
                    week: Some("Week 1".into()),
                    day: "Arms".into(),
                    category: Category::Other("Arms".into()),
                    sets: vec![ResolvedSet {
                        category: Category::Other("Arms".into()),
                        ..set("Curl", None, Reps::Range { low: 8, high: 12 })
                    }],
                },
            ],
        }
    }

    #[test]
    fn test_materialize_preserves_order_and_fields() {
        let rows = materialize(&plan());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].session, 1);
        assert_eq!(rows[0].category, "Squat");
        assert_eq!(rows[1].reps, Reps::Amrap(5));
        assert_eq!(rows[2].session, 2);
        assert_eq!(rows[2].category, "Arms");
        assert_eq!(rows[2].weight, None);
    }

    #[test]
    fn test_amrap_reps_persist_as_text() {
        let rows = materialize(&plan());
        let json = serde_json::to_value(&rows[1]).unwrap();
        assert_eq!(json["reps"], serde_json::json!("5+"));
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["reps"], serde_json::json!(5));
    }

    #[test]
    fn test_publish_replaces_existing_rows() {
        let mut store = MemoryStore::default();
        let first = publish(&plan(), &mut store).unwrap();
        assert!(first.success);
        assert_eq!(first.count, 3);
        assert_eq!(first.sessions, 2);
        assert_eq!(first.deleted_count, 0);

        let second = publish(&plan(), &mut store).unwrap();
        assert_eq!(second.deleted_count, 3);
        assert_eq!(store.all().unwrap().len(), 3);
    }
}
