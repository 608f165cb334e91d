pub mod deck;
pub mod equipment;

pub use deck::Deck;
pub use equipment::EquipmentSlots;
