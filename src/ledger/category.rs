use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Fixed set of spending categories an expense can be filed under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Utilities,
    Other,
}

impl Category {
    /// Every category in menu order.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Utilities,
        Category::Other,
    ];

    /// Display name shown to users and written to the data file.
    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Utilities => "Utilities",
            Category::Other => "Other",
        }
    }

    /// Resolves a 1-based menu position into a category.
    pub fn from_position(position: usize) -> Result<Self, LedgerError> {
        position
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or_else(|| {
                LedgerError::InvalidInput(format!(
                    "category #{position} does not exist (choose 1-{})",
                    Self::ALL.len()
                ))
            })
    }

    /// Case-insensitive lookup by display name.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_follow_menu_order() {
        assert_eq!(Category::from_position(1).unwrap(), Category::Food);
        assert_eq!(Category::from_position(5).unwrap(), Category::Other);
    }

    #[test]
    fn rejects_positions_outside_the_menu() {
        for position in [0, 6, usize::MAX] {
            let err = Category::from_position(position).expect_err("position out of range");
            assert!(matches!(err, LedgerError::InvalidInput(_)), "{err:?}");
        }
    }

    #[test]
    fn serializes_as_display_name() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.label()));
        }
    }

    #[test]
    fn label_lookup_ignores_case() {
        assert_eq!(Category::from_label("utilities"), Some(Category::Utilities));
        assert_eq!(Category::from_label("Groceries"), None);
    }
}
