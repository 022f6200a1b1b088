//! Instruction text sent to the collaborator.

use std::collections::BTreeSet;

use crate::domain::Transaction;

/// Aggregates the prompt for a forest summary is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestStats {
    pub trees: usize,
    pub carbon_kg: f64,
    pub species: Vec<String>,
}

impl ForestStats {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut seen = BTreeSet::new();
        let mut species = Vec::new();
        for tx in transactions {
            if seen.insert(tx.tree_species.as_str()) {
                species.push(tx.tree_species.clone());
            }
        }
        Self {
            trees: transactions.len(),
            carbon_kg: transactions.iter().map(|tx| tx.carbon_offset_kg).sum(),
            species,
        }
    }
}

pub fn forest_prompt(transactions: &[Transaction]) -> String {
    let stats = ForestStats::from_transactions(transactions);
    format!(
        "You are the spirit of the Heru Falcon.\n\
         The user has planted {} trees, sequestering {}kg of CO2.\n\
         The species include: {}.\n\n\
         Write a very short, poetic, Afrofuturist 2-sentence message about how their \
         financial transfers are physically healing the African continent.\n\
         Use words like \"roots\", \"gold\", \"legacy\", \"ancestors\", \"future\".",
        stats.trees,
        stats.carbon_kg,
        stats.species.join(", ")
    )
}

pub fn impact_prompt(transaction: &Transaction) -> String {
    format!(
        "Describe the ecological impact of planting a {} tree in Africa.\n\
         Keep it under 20 words. Inspiring and scientific.",
        transaction.tree_species
    )
}
