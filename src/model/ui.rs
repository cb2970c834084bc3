//! UI state - presentation state separate from table data

use serde::{Deserialize, Serialize};

/// Dataset tab in the main UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Customers,
    Products,
    Promotions,
    Budgets,
    Analytics,
}

impl View {
    pub fn all() -> Vec<View> {
        vec![
            View::Customers,
            View::Products,
            View::Promotions,
            View::Budgets,
            View::Analytics,
        ]
    }

    pub fn name(&self) -> &str {
        match self {
            View::Customers => "Customers",
            View::Products => "Products",
            View::Promotions => "Promotions",
            View::Budgets => "Budgets",
            View::Analytics => "Analytics",
        }
    }

    /// File stem of the dataset backing this view
    pub fn file_stem(&self) -> &str {
        match self {
            View::Customers => "customers",
            View::Products => "products",
            View::Promotions => "promotions",
            View::Budgets => "budgets",
            View::Analytics => "analytics",
        }
    }

    pub fn index(&self) -> usize {
        View::all().iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn next(&self) -> View {
        let all = View::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn prev(&self) -> View {
        let all = View::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}
