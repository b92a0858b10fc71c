pub mod db;
pub mod error;
pub mod form;
pub mod models;
pub mod settings;
pub mod summary;
pub mod utils;

// Re-export commonly used items
pub use db::{
    connection::DbConnection,
    movement::MovementDb,
    store::{MonthWatch, MovementStore, SqliteMovementStore},
};
pub use error::{Error, Result};
pub use form::{FormErrors, MovementForm};
pub use models::category::{Category, CategoryGroup, MovementType};
pub use models::month::YearMonth;
pub use models::movement::Movement;
pub use settings::Settings;
pub use summary::{BudgetFlags, BudgetRules, MonthlySummary};
