//! Monthly budget breakdown.
//!
//! Movements are bucketed by `Category::group` into necessary spending,
//! unnecessary spending and income. Percentages are relative to income;
//! savings is whatever income is left after both kinds of spending.

use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::category::CategoryGroup;
use crate::models::movement::Movement;

/// Thresholds behind the advisory flags.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BudgetRules {
    pub necessary_max: Decimal,
    pub unnecessary_max: Decimal,
    pub savings_min: Decimal,
}

impl Default for BudgetRules {
    fn default() -> Self {
        Self {
            necessary_max: Decimal::from(50),
            unnecessary_max: Decimal::from(30),
            savings_min: Decimal::from(20),
        }
    }
}

/// Display hints only; nothing is blocked when a flag is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BudgetFlags {
    pub necessary_over: bool,
    pub unnecessary_over: bool,
    pub savings_under: bool,
}

impl BudgetFlags {
    pub fn any(&self) -> bool {
        self.necessary_over || self.unnecessary_over || self.savings_under
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthlySummary {
    pub total_necessary: Decimal,
    pub total_unnecessary: Decimal,
    pub total_income: Decimal,
    pub necessary_pct: Decimal,
    pub unnecessary_pct: Decimal,
    pub savings_pct: Decimal,
}

impl MonthlySummary {
    pub fn from_movements<'a, I>(movements: I) -> Self
    where
        I: IntoIterator<Item = &'a Movement>,
    {
        let mut summary = MonthlySummary::default();

        for movement in movements {
            let total = match movement.category.group() {
                Some(CategoryGroup::Necessary) => &mut summary.total_necessary,
                Some(CategoryGroup::Unnecessary) => &mut summary.total_unnecessary,
                Some(CategoryGroup::Income) => &mut summary.total_income,
                None => continue,
            };
            *total = total.saturating_add(movement.amount);
        }

        if summary.total_income > Decimal::ZERO {
            let income = summary.total_income;
            summary.necessary_pct = percentage_of(summary.total_necessary, income);
            summary.unnecessary_pct = percentage_of(summary.total_unnecessary, income);
            summary.savings_pct = percentage_of(summary.savings(), income);
        }

        summary
    }

    pub fn total_spending(&self) -> Decimal {
        self.total_necessary.saturating_add(self.total_unnecessary)
    }

    pub fn savings(&self) -> Decimal {
        self.total_income
            .saturating_sub(self.total_necessary)
            .saturating_sub(self.total_unnecessary)
    }

    pub fn flags(&self, rules: &BudgetRules) -> BudgetFlags {
        BudgetFlags {
            necessary_over: self.necessary_pct > rules.necessary_max,
            unnecessary_over: self.unnecessary_pct > rules.unnecessary_max,
            savings_under: self.savings_pct < rules.savings_min,
        }
    }
}

/// `part / whole * 100` for a positive `whole`, saturating at the
/// `Decimal` bounds instead of overflowing.
fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if part.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

impl fmt::Display for MonthlySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Necessary: {:.2}%  Unnecessary: {:.2}%  Savings: {:.2}%",
            self.necessary_pct.round_dp(2),
            self.unnecessary_pct.round_dp(2),
            self.savings_pct.round_dp(2)
        )?;
        write!(
            f,
            "Total income: {:.2}  Total spending: {:.2}",
            self.total_income.round_dp(2),
            self.total_spending().round_dp(2)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::{Category, MovementType};
    use chrono::NaiveDate;

    fn movement(amount: Decimal, movement_type: MovementType, category: Category) -> Movement {
        let date = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
        Movement::new(amount, "test", date, movement_type, category)
    }

    fn assert_close(actual: Decimal, expected: Decimal) {
        let tolerance = Decimal::new(1, 9);
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_food_and_salary_example() {
        let movements = vec![
            movement(Decimal::from(100), MovementType::Expense, Category::Food),
            movement(Decimal::from(1000), MovementType::Income, Category::Salary),
        ];
        let summary = MonthlySummary::from_movements(&movements);

        assert_eq!(summary.total_necessary, Decimal::from(100));
        assert_eq!(summary.total_unnecessary, Decimal::ZERO);
        assert_eq!(summary.total_income, Decimal::from(1000));
        assert_eq!(summary.necessary_pct, Decimal::from(10));
        assert_eq!(summary.unnecessary_pct, Decimal::ZERO);
        assert_eq!(summary.savings_pct, Decimal::from(90));
        assert!(!summary.flags(&BudgetRules::default()).any());
    }

    #[test]
    fn test_no_movements() {
        let movements: Vec<Movement> = Vec::new();
        let summary = MonthlySummary::from_movements(&movements);
        assert_eq!(summary, MonthlySummary::default());
        assert_eq!(summary.total_spending(), Decimal::ZERO);
    }

    #[test]
    fn test_zero_income_gives_zero_percentages() {
        let movements = vec![
            movement(Decimal::from(80), MovementType::Expense, Category::Rent),
            movement(Decimal::from(20), MovementType::Expense, Category::Shopping),
        ];
        let summary = MonthlySummary::from_movements(&movements);
        assert_eq!(summary.total_spending(), Decimal::from(100));
        assert_eq!(summary.necessary_pct, Decimal::ZERO);
        assert_eq!(summary.unnecessary_pct, Decimal::ZERO);
        assert_eq!(summary.savings_pct, Decimal::ZERO);

        // 0% savings is below the minimum.
        let flags = summary.flags(&BudgetRules::default());
        assert!(flags.savings_under);
        assert!(!flags.necessary_over);
    }

    /// Deterministic movement sets mixing every group, sizes 1 to 12.
    fn generated_sets() -> Vec<Vec<Movement>> {
        let categories = Category::all();
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };

        (0..200)
            .map(|i| {
                let len = 1 + (i % 12) as usize;
                (0..len)
                    .map(|_| {
                        let category = categories[(next() % categories.len() as u64) as usize];
                        let cents = (next() % 10_000_000) as i64;
                        movement(Decimal::new(cents, 2), category.movement_type(), category)
                    })
                    .collect()
            })
            .collect()
    }

    fn assert_percentage_properties(movements: &[Movement]) {
        let summary = MonthlySummary::from_movements(movements);
        if summary.total_income > Decimal::ZERO {
            assert_close(
                summary.necessary_pct + summary.unnecessary_pct + summary.savings_pct,
                Decimal::ONE_HUNDRED,
            );
        } else {
            assert_eq!(summary.necessary_pct, Decimal::ZERO);
            assert_eq!(summary.unnecessary_pct, Decimal::ZERO);
            assert_eq!(summary.savings_pct, Decimal::ZERO);
        }
    }

    #[test]
    fn test_percentages_sum_to_one_hundred() {
        for movements in generated_sets() {
            assert_percentage_properties(&movements);
        }
    }

    #[test]
    fn test_percentages_on_edge_sets() {
        let sets = vec![
            vec![movement(Decimal::new(1, 2), MovementType::Income, Category::OtherIncomes)],
            vec![movement(Decimal::from(75), MovementType::Expense, Category::Health)],
            vec![
                movement(Decimal::from(40), MovementType::Expense, Category::Shopping),
                movement(Decimal::from(60), MovementType::Expense, Category::Entertainment),
            ],
            vec![
                movement(Decimal::from(40), MovementType::Expense, Category::Shopping),
                movement(Decimal::from(3), MovementType::Income, Category::Salary),
            ],
            vec![movement(Decimal::new(33333, 2), MovementType::Expense, Category::Bills)],
        ];
        for movements in sets {
            assert_percentage_properties(&movements);
        }
    }

    #[test]
    fn test_huge_amounts_saturate_instead_of_panicking() {
        let huge: Decimal = "1000000000000000000000000000".parse().unwrap();
        let movements = vec![
            movement(huge, MovementType::Expense, Category::Rent),
            movement(Decimal::new(1, 2), MovementType::Income, Category::Salary),
        ];
        let summary = MonthlySummary::from_movements(&movements);
        assert_eq!(summary.total_necessary, huge);
        assert_eq!(summary.necessary_pct, Decimal::MAX);
        assert_eq!(summary.savings_pct, Decimal::MIN);
        let flags = summary.flags(&BudgetRules::default());
        assert!(flags.necessary_over && flags.savings_under);

        let pay: Decimal = "70000000000000000000000000000".parse().unwrap();
        let movements = vec![
            movement(pay, MovementType::Income, Category::Salary),
            movement(pay, MovementType::Income, Category::Salary),
        ];
        let summary = MonthlySummary::from_movements(&movements);
        assert_eq!(summary.total_income, Decimal::MAX);
        assert_eq!(summary.necessary_pct, Decimal::ZERO);
        assert_eq!(summary.savings_pct, Decimal::ONE_HUNDRED);
        assert!(!summary.to_string().is_empty());
    }

    #[test]
    fn test_overspending_raises_flags() {
        let movements = vec![
            movement(Decimal::from(600), MovementType::Expense, Category::Rent),
            movement(Decimal::from(350), MovementType::Expense, Category::Shopping),
            movement(Decimal::from(1000), MovementType::Income, Category::Salary),
        ];
        let flags = MonthlySummary::from_movements(&movements).flags(&BudgetRules::default());
        assert_eq!(
            flags,
            BudgetFlags {
                necessary_over: true,
                unnecessary_over: true,
                savings_under: true,
            }
        );
    }

    #[test]
    fn test_uncategorised_and_inconsistent_movements() {
        let movements = vec![
            movement(Decimal::from(50), MovementType::Expense, Category::None),
            // Wrong type for the category: grouping follows the category.
            movement(Decimal::from(200), MovementType::Expense, Category::Salary),
        ];
        let summary = MonthlySummary::from_movements(&movements);
        assert_eq!(summary.total_income, Decimal::from(200));
        assert_eq!(summary.total_spending(), Decimal::ZERO);
        assert_eq!(summary.savings_pct, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_display_rounds_to_two_decimals() {
        let movements = vec![
            movement(Decimal::from(1), MovementType::Expense, Category::Food),
            movement(Decimal::from(3), MovementType::Income, Category::Salary),
        ];
        let text = MonthlySummary::from_movements(&movements).to_string();
        assert!(text.starts_with("Necessary: 33.33%"));
        assert!(text.contains("Savings: 66.67%"));
    }
}
