pub mod armor;
pub mod body_zone;
pub mod constants;
pub mod resolution;
pub mod wounds;

pub use armor::{ArmorDefinition, ArmorLayer, ArmorLoadout, ArmorSlot, EquippedArmor, PieceId};
pub use body_zone::{Anatomy, BodyPart, DamageType, SlotDefense};
pub use resolution::{resolve_hit, Hit, HitOutcome};
pub use wounds::{BandageOutcome, Injury, InjuryId, InjuryModel, InjuryType};
