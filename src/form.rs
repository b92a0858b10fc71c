//! Add/edit form state and its validation.

use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;

use crate::models::category::{Category, MovementType};
use crate::models::movement::{Movement, NEW_MOVEMENT_ID};

static AMOUNT_INPUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d*\.?\d{0,2}$").expect("amount input pattern is valid")
});

/// Whether `text` may stand in the amount field: digits, an optional dot and
/// at most two decimals. Partial input such as `""` or `"12."` is allowed.
pub fn is_valid_amount_input(text: &str) -> bool {
    AMOUNT_INPUT.is_match(text)
}

/// Fields that blocked a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormErrors {
    pub description: bool,
    pub amount: bool,
    pub movement_type: bool,
    pub category: bool,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        !(self.description || self.amount || self.movement_type || self.category)
    }

    pub fn fields(&self) -> Vec<&'static str> {
        [
            (self.description, "description"),
            (self.amount, "amount"),
            (self.movement_type, "type"),
            (self.category, "category"),
        ]
        .into_iter()
        .filter_map(|(failed, name)| failed.then_some(name))
        .collect()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid fields: {}", self.fields().join(", "))
    }
}

impl std::error::Error for FormErrors {}

#[derive(Debug, Clone, PartialEq)]
pub struct MovementForm {
    id: i64,
    created_at: Option<NaiveDateTime>,
    description: String,
    amount: String,
    date: NaiveDate,
    movement_type: MovementType,
    category: Category,
}

impl MovementForm {
    /// Empty form for a new movement dated `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: NEW_MOVEMENT_ID,
            created_at: None,
            description: String::new(),
            amount: String::new(),
            date,
            movement_type: MovementType::None,
            category: Category::None,
        }
    }

    /// Form pre-filled for editing a stored movement.
    pub fn from_movement(movement: &Movement) -> Self {
        Self {
            id: movement.id,
            created_at: Some(movement.created_at),
            description: movement.description.clone(),
            amount: movement.amount.round_dp(2).to_string(),
            date: movement.date,
            movement_type: movement.movement_type,
            category: movement.category,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn movement_type(&self) -> MovementType {
        self.movement_type
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
    }

    /// Applies an edit to the amount field. Returns `false` and keeps the
    /// previous text when the edit does not pass the input filter.
    pub fn set_amount(&mut self, text: &str) -> bool {
        if !is_valid_amount_input(text) {
            return false;
        }
        self.amount = text.to_string();
        true
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    /// Changing the type clears the category, which belonged to the old type.
    pub fn set_type(&mut self, movement_type: MovementType) {
        if self.movement_type != movement_type {
            self.category = Category::None;
        }
        self.movement_type = movement_type;
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    /// Categories the category selector offers for the current type.
    pub fn category_choices(&self) -> Vec<Category> {
        Category::for_type(self.movement_type)
    }

    /// Parsed amount, if the text passes the input filter and is not empty.
    fn parsed_amount(&self) -> Option<Decimal> {
        if !is_valid_amount_input(&self.amount) {
            return None;
        }
        let text = self.amount.trim_end_matches('.');
        if text.is_empty() {
            return None;
        }
        text.parse::<Decimal>().ok()
    }

    pub fn validate(&self) -> FormErrors {
        FormErrors {
            description: self.description.trim().is_empty(),
            amount: self.parsed_amount().is_none(),
            movement_type: self.movement_type == MovementType::None,
            category: !self.category.is_consistent_with(self.movement_type),
        }
    }

    /// Builds the movement to hand to the store, or the fields to highlight.
    pub fn submit(&self) -> Result<Movement, FormErrors> {
        let errors = self.validate();
        let amount = match self.parsed_amount() {
            Some(amount) if errors.is_empty() => amount,
            _ => return Err(errors),
        };

        let mut movement = Movement::new(
            amount,
            self.description.trim(),
            self.date,
            self.movement_type,
            self.category,
        );
        movement.id = self.id;
        if let Some(created_at) = self.created_at {
            movement.created_at = created_at;
        }
        Ok(movement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_amount_input_filter() {
        for ok in ["", "12", "12.", "12.5", "12.50", ".5", "0.99"] {
            assert!(is_valid_amount_input(ok), "{ok} should be accepted");
        }
        for bad in ["12.505", "-3", "abc", "1,5", "1.2.3", " 1"] {
            assert!(!is_valid_amount_input(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_rejected_amount_keeps_previous_text() {
        let mut form = MovementForm::new(today());
        assert!(form.set_amount("12.5"));
        assert!(!form.set_amount("12.555"));
        assert_eq!(form.amount(), "12.5");
    }

    #[test]
    fn test_empty_form_flags_every_field() {
        let errors = MovementForm::new(today()).validate();
        assert_eq!(
            errors,
            FormErrors {
                description: true,
                amount: true,
                movement_type: true,
                category: true,
            }
        );
        assert_eq!(
            errors.to_string(),
            "invalid fields: description, amount, type, category"
        );
    }

    #[test]
    fn test_changing_type_resets_category() {
        let mut form = MovementForm::new(today());
        form.set_type(MovementType::Expense);
        form.set_category(Category::Food);
        form.set_type(MovementType::Expense);
        assert_eq!(form.category(), Category::Food);
        form.set_type(MovementType::Income);
        assert_eq!(form.category(), Category::None);
        assert_eq!(form.category_choices().len(), 3);
    }

    #[test]
    fn test_category_from_wrong_group_is_an_error() {
        let mut form = MovementForm::new(today());
        form.set_description("Pay");
        form.set_amount("1500");
        form.set_type(MovementType::Expense);
        form.set_category(Category::Salary);
        let errors = form.validate();
        assert!(errors.category);
        assert!(!errors.movement_type);
        assert!(form.submit().is_err());
    }

    #[test]
    fn test_valid_form_submits_new_movement() {
        let mut form = MovementForm::new(today());
        form.set_description("  Groceries ");
        form.set_amount("42.");
        form.set_type(MovementType::Expense);
        form.set_category(Category::Food);

        let movement = form.submit().unwrap();
        assert!(movement.is_new());
        assert_eq!(movement.amount, Decimal::from(42));
        assert_eq!(movement.description, "Groceries");
        assert_eq!(movement.date, today());
    }

    #[test]
    fn test_edit_form_keeps_identity() {
        let mut stored = Movement::new(
            Decimal::new(1999, 2),
            "Book",
            today(),
            MovementType::Expense,
            Category::Shopping,
        );
        stored.id = 9;

        let mut form = MovementForm::from_movement(&stored);
        assert_eq!(form.amount(), "19.99");
        form.set_amount("25");
        let edited = form.submit().unwrap();
        assert_eq!(edited.id, 9);
        assert_eq!(edited.created_at, stored.created_at);
        assert_eq!(edited.amount, Decimal::from(25));
    }

    #[test]
    fn test_edit_form_rounds_prefilled_amount() {
        let mut stored = Movement::new(
            "3.14159".parse().unwrap(),
            "Coffee",
            today(),
            MovementType::Expense,
            Category::Food,
        );
        stored.id = 4;

        let form = MovementForm::from_movement(&stored);
        assert_eq!(form.amount(), "3.14");
        assert_eq!(form.submit().unwrap().amount, Decimal::new(314, 2));
    }

    #[test]
    fn test_negative_stored_amount_fails_validation() {
        let mut stored = Movement::new(
            Decimal::new(-2500, 2),
            "Refund",
            today(),
            MovementType::Expense,
            Category::Shopping,
        );
        stored.id = 5;

        let mut form = MovementForm::from_movement(&stored);
        assert_eq!(form.amount(), "-25.00");
        assert!(form.validate().amount);
        assert!(form.submit().is_err());

        assert!(form.set_amount("25"));
        assert!(!form.validate().amount);
    }
}
