pub mod common;
pub mod draft;
pub mod seed;
pub mod transaction;
pub mod user;

pub use common::{Displayable, TreeCoords};
pub use draft::{DraftForm, DraftRejection, DraftTransfer};
pub use seed::{ForestLocation, FOREST_LOCATIONS};
pub use transaction::{Currency, ImpactBundle, Transaction};
pub use user::User;
