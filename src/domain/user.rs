use serde::{Deserialize, Serialize};

use crate::domain::common::Displayable;

/// Balances and cumulative counters for the authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub balance_usdc: f64,
    pub balance_celo: f64,
    pub trees_planted: u32,
    #[serde(default)]
    pub is_black_falcon_mode: bool,
}

impl User {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            balance_usdc: 0.0,
            balance_celo: 0.0,
            trees_planted: 0,
            is_black_falcon_mode: false,
        }
    }

    pub fn total_balance(&self) -> f64 {
        self.balance_usdc + self.balance_celo
    }
}

impl Displayable for User {
    fn display_label(&self) -> String {
        format!("@{} ({})", self.username, self.id.to_uppercase())
    }
}
