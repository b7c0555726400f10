pub mod card;
pub mod collection;
pub(crate) mod lenient;
pub mod rarity;
pub mod variant;

pub use card::*;
pub use collection::*;
pub use rarity::*;
pub use variant::*;
