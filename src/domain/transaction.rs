use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, TreeCoords};

/// Stablecoins a transfer can be denominated in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "USDC")]
    Usdc,
    #[serde(rename = "cUSD")]
    CUsd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usdc => "USDC",
            Currency::CUsd => "cUSD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "usdc" => Ok(Currency::Usdc),
            "cusd" => Ok(Currency::CUsd),
            other => Err(format!("unsupported currency `{other}` (expected USDC or cUSD)")),
        }
    }
}

/// Ecological attributes attached to a transfer when it is recorded.
///
/// The ledger treats this as an opaque bundle; where it comes from is
/// decided by an [`ImpactPolicy`](crate::core::services::ImpactPolicy).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImpactBundle {
    pub tree_species: String,
    pub tree_coords: TreeCoords,
    pub carbon_offset_kg: f64,
    pub image_url: String,
}

/// A completed send. Never mutated once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub recipient: String,
    pub amount: f64,
    pub currency: Currency,
    pub timestamp: DateTime<Utc>,
    pub tree_species: String,
    pub tree_coords: TreeCoords,
    pub carbon_offset_kg: f64,
    pub image_url: String,
    /// Draft request that produced this record; seed entries have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

impl Transaction {
    pub fn new(
        recipient: impl Into<String>,
        amount: f64,
        currency: Currency,
        timestamp: DateTime<Utc>,
        impact: ImpactBundle,
    ) -> Self {
        Self {
            id: transaction_id(timestamp),
            recipient: recipient.into(),
            amount,
            currency,
            timestamp,
            tree_species: impact.tree_species,
            tree_coords: impact.tree_coords,
            carbon_offset_kg: impact.carbon_offset_kg,
            image_url: impact.image_url,
            request_id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = Some(request_id);
        self
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "{} -> {} {:.2} {} [{}]",
            self.id, self.recipient, self.amount, self.currency, self.tree_species
        )
    }
}

/// Time-derived identifier; the random suffix keeps ids unique when two
/// transfers land in the same millisecond.
fn transaction_id(timestamp: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("tx_{}_{}", timestamp.timestamp_millis(), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impact() -> ImpactBundle {
        ImpactBundle {
            tree_species: "Baobab".into(),
            tree_coords: TreeCoords::new(9.0820, 8.6753),
            carbon_offset_kg: 60.0,
            image_url: "https://picsum.photos/400/400?random=2".into(),
        }
    }

    #[test]
    fn ids_are_time_derived_and_unique() {
        let now = Utc::now();
        let first = Transaction::new("@a", 1.0, Currency::Usdc, now, impact());
        let second = Transaction::new("@a", 1.0, Currency::Usdc, now, impact());
        let prefix = format!("tx_{}_", now.timestamp_millis());
        assert!(first.id.starts_with(&prefix), "unexpected id {}", first.id);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn currency_parses_case_insensitively() {
        assert_eq!("usdc".parse::<Currency>().unwrap(), Currency::Usdc);
        assert_eq!("cUSD".parse::<Currency>().unwrap(), Currency::CUsd);
        assert!("EUR".parse::<Currency>().is_err());
    }

    #[test]
    fn currency_serializes_with_wire_codes() {
        let json = serde_json::to_string(&Currency::CUsd).unwrap();
        assert_eq!(json, "\"cUSD\"");
    }
}
