//! Per-user habit catalog.

use crate::db::SqliteDb;
use crate::error::AppError;
use crate::models::{Habit, NewHabit, User};
use validator::Validate;

#[derive(Clone)]
pub struct HabitCatalog {
    db: SqliteDb,
}

impl HabitCatalog {
    pub fn new(db: SqliteDb) -> Self {
        Self { db }
    }

    /// Add a habit to `user`'s catalog, filing it under `category`.
    ///
    /// Name and category are stored exactly as given.
    pub async fn create_habit(&self, user: &User, new_habit: NewHabit) -> Result<Habit, AppError> {
        new_habit.validate()?;

        let habit = self
            .db
            .create_habit(user.id, new_habit.name, new_habit.category)
            .await?;

        tracing::info!(user_id = user.id, habit_id = habit.id, "Habit created");
        Ok(habit)
    }

    pub async fn habits_for_user(&self, user: &User) -> Result<Vec<Habit>, AppError> {
        self.db.habits_for_user(user.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_list() {
        let db = SqliteDb::open_in_memory().unwrap();
        let catalog = HabitCatalog::new(db.clone());
        let user = db.resolve_user("u1".into(), None, None).await.unwrap();
        let other = db.resolve_user("u2".into(), None, None).await.unwrap();

        let habit = catalog
            .create_habit(
                &user,
                NewHabit {
                    name: "Чтение".into(),
                    category: "Учёба".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(habit.name, "Чтение");

        assert_eq!(catalog.habits_for_user(&user).await.unwrap(), vec![habit]);
        assert!(catalog.habits_for_user(&other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_lengths_store_nothing() {
        let db = SqliteDb::open_in_memory().unwrap();
        let catalog = HabitCatalog::new(db.clone());
        let user = db.resolve_user("u1".into(), None, None).await.unwrap();

        let err = catalog
            .create_habit(
                &user,
                NewHabit {
                    name: "x".repeat(31),
                    category: "Sport".into(),
                },
            )
            .await
            .unwrap_err();
        match err {
            AppError::InvalidInput(msg) => assert!(msg.contains("habit name")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(catalog.habits_for_user(&user).await.unwrap().is_empty());
    }
}
