//! Read models for the home and forest screens.

use crate::domain::{Transaction, User};

/// Carbon credited per planted tree on the forest screen.
pub const CO2_PER_TREE_KG: f64 = 25.0;
/// Number of transactions shown on the home screen.
pub const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct HomeSummary {
    pub total_balance: f64,
    pub recent: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForestSummary {
    pub trees_planted: u32,
    pub co2_sequestered_kg: f64,
    pub trees: Vec<Transaction>,
}

pub struct SummaryService;

impl SummaryService {
    pub fn home(user: Option<&User>, transactions: &[Transaction]) -> HomeSummary {
        HomeSummary {
            total_balance: user.map(User::total_balance).unwrap_or_default(),
            recent: transactions.iter().take(RECENT_LIMIT).cloned().collect(),
        }
    }

    pub fn forest(user: Option<&User>, transactions: &[Transaction]) -> ForestSummary {
        let trees_planted = user.map(|u| u.trees_planted).unwrap_or_default();
        ForestSummary {
            trees_planted,
            co2_sequestered_kg: f64::from(trees_planted) * CO2_PER_TREE_KG,
            trees: transactions.to_vec(),
        }
    }
}
