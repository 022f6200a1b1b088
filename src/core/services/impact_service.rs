//! Impact attribution for completed transfers.

use chrono::{DateTime, Utc};

use crate::domain::{DraftTransfer, ImpactBundle, TreeCoords};

/// Decides which tree a transfer funds.
pub trait ImpactPolicy: Send + Sync {
    fn attribute(&self, draft: &DraftTransfer, at: DateTime<Utc>) -> ImpactBundle;
}

/// Attributes every transfer to the same planting site.
#[derive(Debug, Clone)]
pub struct FixedImpactPolicy {
    pub tree_species: String,
    pub tree_coords: TreeCoords,
    pub carbon_offset_kg: f64,
}

impl Default for FixedImpactPolicy {
    fn default() -> Self {
        Self {
            tree_species: "Shea Butter Tree".into(),
            tree_coords: TreeCoords::new(9.0820, 8.6753),
            carbon_offset_kg: 25.0,
        }
    }
}

impl ImpactPolicy for FixedImpactPolicy {
    fn attribute(&self, _draft: &DraftTransfer, at: DateTime<Utc>) -> ImpactBundle {
        ImpactBundle {
            tree_species: self.tree_species.clone(),
            tree_coords: self.tree_coords,
            carbon_offset_kg: self.carbon_offset_kg,
            image_url: format!(
                "https://picsum.photos/400/400?random={}",
                at.timestamp_millis()
            ),
        }
    }
}
