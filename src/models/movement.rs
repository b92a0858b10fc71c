use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use super::category::{Category, MovementType};

/// Id carried by a movement that has not been stored yet.
pub const NEW_MOVEMENT_ID: i64 = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub id: i64,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub movement_type: MovementType,
    pub category: Category,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Movement {
    pub fn new(
        amount: Decimal,
        description: impl Into<String>,
        date: NaiveDate,
        movement_type: MovementType,
        category: Category,
    ) -> Self {
        let now = chrono::Local::now().naive_local();
        Movement {
            id: NEW_MOVEMENT_ID,
            amount,
            description: description.into(),
            date,
            movement_type,
            category,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id == NEW_MOVEMENT_ID
    }

    /// Plain-text row used by list views.
    pub fn summary_line(&self) -> String {
        let group = self
            .category
            .group()
            .map(|g| g.as_str())
            .unwrap_or("");
        format!(
            "{:<10} {:>12} {:<30} {:<8} {:<15} {}",
            self.date.format("%d-%m-%Y"),
            self.amount,
            self.description,
            self.movement_type,
            self.category,
            group
        )
    }
}
