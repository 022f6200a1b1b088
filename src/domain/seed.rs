//! Fixed data every session starts from.

use chrono::{DateTime, Duration, Utc};

use crate::domain::common::TreeCoords;
use crate::domain::transaction::{Currency, ImpactBundle, Transaction};
use crate::domain::user::User;

pub const SEED_USER_ID: &str = "u1";
pub const SEED_USERNAME: &str = "heru_builder";

/// Starting user handed out by every successful authentication.
pub fn seed_user() -> User {
    User {
        balance_usdc: 450.00,
        balance_celo: 120.00,
        trees_planted: 12,
        ..User::new(SEED_USER_ID, SEED_USERNAME)
    }
}

/// History shown before the first send, most recent first.
pub fn initial_transactions(now: DateTime<Utc>) -> Vec<Transaction> {
    vec![
        Transaction::new(
            "@kwame_tech",
            50.00,
            Currency::Usdc,
            now - Duration::days(1),
            ImpactBundle {
                tree_species: "Acacia Senegal".into(),
                tree_coords: TreeCoords::new(14.4974, -14.4524),
                carbon_offset_kg: 25.0,
                image_url: "https://picsum.photos/400/400?random=1".into(),
            },
        )
        .with_id("tx_1"),
        Transaction::new(
            "+234 801 234 5678",
            120.00,
            Currency::CUsd,
            now - Duration::days(2),
            ImpactBundle {
                tree_species: "Baobab".into(),
                tree_coords: TreeCoords::new(9.0820, 8.6753),
                carbon_offset_kg: 60.0,
                image_url: "https://picsum.photos/400/400?random=2".into(),
            },
        )
        .with_id("tx_2"),
    ]
}

/// A restoration site shown on the map screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestLocation {
    pub id: u8,
    pub name: &'static str,
    pub coords: TreeCoords,
}

pub const FOREST_LOCATIONS: [ForestLocation; 7] = [
    ForestLocation {
        id: 1,
        name: "Accra Green Belt",
        coords: TreeCoords::new(5.6037, -0.1870),
    },
    ForestLocation {
        id: 2,
        name: "Lagos Coastal Restoration",
        coords: TreeCoords::new(6.5244, 3.3792),
    },
    ForestLocation {
        id: 3,
        name: "Nairobi National Park Ext",
        coords: TreeCoords::new(-1.2921, 36.8219),
    },
    ForestLocation {
        id: 4,
        name: "Dakar Green Wall",
        coords: TreeCoords::new(14.6928, -17.4467),
    },
    ForestLocation {
        id: 5,
        name: "Jo'burg Urban Forest",
        coords: TreeCoords::new(-26.2041, 28.0473),
    },
    ForestLocation {
        id: 6,
        name: "Abuja Canopy",
        coords: TreeCoords::new(9.0579, 7.4951),
    },
    ForestLocation {
        id: 7,
        name: "Douala Mangroves",
        coords: TreeCoords::new(4.0511, 9.7679),
    },
];
