use std::collections::BTreeMap;

use crate::catalog::{CatalogItem, ExerciseRecord, SourceError};
use crate::catalog::sources::ItemSource;

/// The exercise library that ships with the application.
pub struct BuiltinExercises;

const EXERCISES: &[(&str, &str, &str, &str, &str, u32)] = &[
    ("1", "Barbell Bench Press", "Chest", "Barbell", "intermediate", 15),
    ("2", "Pull-ups", "Back", "Bodyweight", "advanced", 10),
    ("3", "Squats", "Legs", "Bodyweight", "beginner", 12),
    ("4", "Shoulder Press", "Shoulders", "Dumbbell", "intermediate", 15),
    ("5", "Bicep Curls", "Arms", "Dumbbell", "beginner", 10),
    ("6", "Plank", "Core", "Bodyweight", "beginner", 5),
];

impl ItemSource for BuiltinExercises {
    fn title(&self) -> String {
        "built-in exercises".into()
    }

    fn load(&self) -> Result<Vec<CatalogItem>, SourceError> {
        let items = EXERCISES
            .iter()
            .map(|&(id, name, muscle, equipment, difficulty, duration_minutes)| ExerciseRecord {
                id: id.into(),
                name: name.into(),
                muscle: muscle.into(),
                equipment: equipment.into(),
                difficulty: difficulty.into(),
                duration_minutes,
                image_url: None,
                extra: BTreeMap::new(),
            })
            .map(Into::into)
            .collect();

        Ok(items)
    }
}
