use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Whether a movement adds money or takes it away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Income,
    Expense,
    /// Not selected yet
    #[default]
    None,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Income => "Income",
            MovementType::Expense => "Expense",
            MovementType::None => "None",
        }
    }

    /// Column value used by the store and the CSV layout.
    pub fn key(&self) -> &'static str {
        match self {
            MovementType::Income => "INCOME",
            MovementType::Expense => "EXPENSE",
            MovementType::None => "NONE",
        }
    }

    pub fn all() -> Vec<MovementType> {
        vec![MovementType::Income, MovementType::Expense, MovementType::None]
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MovementType::all()
            .into_iter()
            .find(|t| t.key().eq_ignore_ascii_case(s) || t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidData(format!("unknown movement type '{s}'")))
    }
}

/// Budget bucket a category counts towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryGroup {
    Necessary,
    Unnecessary,
    Income,
}

impl CategoryGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryGroup::Necessary => "Necessary",
            CategoryGroup::Unnecessary => "Unnecessary",
            CategoryGroup::Income => "Income",
        }
    }

    /// The movement type whose categories make up this group.
    pub fn movement_type(&self) -> MovementType {
        match self {
            CategoryGroup::Necessary | CategoryGroup::Unnecessary => MovementType::Expense,
            CategoryGroup::Income => MovementType::Income,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Food,
    Transportation,
    Bills,
    Health,
    Rent,
    Shopping,
    Entertainment,
    OtherExpenses,
    Salary,
    CapitalGains,
    OtherIncomes,
    /// Not selected yet
    #[default]
    None,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Bills => "Bills",
            Category::Health => "Health",
            Category::Rent => "Rent",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::OtherExpenses => "Other expenses",
            Category::Salary => "Salary",
            Category::CapitalGains => "Capital gains",
            Category::OtherIncomes => "Other incomes",
            Category::None => "None",
        }
    }

    /// Column value used by the store and the CSV layout.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Food => "FOOD",
            Category::Transportation => "TRANSPORTATION",
            Category::Bills => "BILLS",
            Category::Health => "HEALTH",
            Category::Rent => "RENT",
            Category::Shopping => "SHOPPING",
            Category::Entertainment => "ENTERTAINMENT",
            Category::OtherExpenses => "OTHER_EXPENSES",
            Category::Salary => "SALARY",
            Category::CapitalGains => "CAPITAL_GAINS",
            Category::OtherIncomes => "OTHER_INCOMES",
            Category::None => "NONE",
        }
    }

    pub fn all() -> Vec<Category> {
        vec![
            Category::Food,
            Category::Transportation,
            Category::Bills,
            Category::Health,
            Category::Rent,
            Category::Shopping,
            Category::Entertainment,
            Category::OtherExpenses,
            Category::Salary,
            Category::CapitalGains,
            Category::OtherIncomes,
            Category::None,
        ]
    }

    /// The single source of truth for budget grouping. `None` belongs to no group.
    pub fn group(&self) -> Option<CategoryGroup> {
        match self {
            Category::Food
            | Category::Transportation
            | Category::Bills
            | Category::Health
            | Category::Rent => Some(CategoryGroup::Necessary),
            Category::Shopping | Category::Entertainment | Category::OtherExpenses => {
                Some(CategoryGroup::Unnecessary)
            }
            Category::Salary | Category::CapitalGains | Category::OtherIncomes => {
                Some(CategoryGroup::Income)
            }
            Category::None => None,
        }
    }

    pub fn movement_type(&self) -> MovementType {
        self.group()
            .map(|group| group.movement_type())
            .unwrap_or(MovementType::None)
    }

    /// Categories selectable for a movement type, in declaration order.
    pub fn for_type(movement_type: MovementType) -> Vec<Category> {
        if movement_type == MovementType::None {
            return Vec::new();
        }
        Category::all()
            .into_iter()
            .filter(|c| c.movement_type() == movement_type)
            .collect()
    }

    pub fn is_consistent_with(&self, movement_type: MovementType) -> bool {
        *self != Category::None && self.movement_type() == movement_type
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::all()
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s) || c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidData(format!("unknown category '{s}'")))
    }
}
