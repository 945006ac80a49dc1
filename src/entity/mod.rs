pub mod combatant;
pub mod persistence;

pub use combatant::{Combatant, LifeState, LootContainer};
pub use persistence::CombatantSnapshot;
