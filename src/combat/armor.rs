//! Layered armor: slots, layers, durability and protection
//!
//! A combatant wears up to one piece per (body part, layer) cell. Protection
//! at a part is the anatomy's natural defense plus every layer's defense
//! scaled by that piece's remaining durability.

use ahash::AHashMap;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::combat::body_zone::{Anatomy, BodyPart, DamageType, SlotDefense, BODY_PART_COUNT};
use crate::core::config::ArmorConfig;

bitflags! {
    /// Body regions a piece of armor covers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ArmorSlot: u16 {
        const HEAD = 1 << 0;
        const FACE = 1 << 1;
        const NECK = 1 << 2;
        const TORSO = 1 << 3;
        const SHOULDERS = 1 << 4;
        const ARMS = 1 << 5;
        const HANDS = 1 << 6;
        const LEGS = 1 << 7;
        const FEET = 1 << 8;
    }
}

impl From<BodyPart> for ArmorSlot {
    fn from(part: BodyPart) -> Self {
        match part {
            BodyPart::Head => ArmorSlot::HEAD,
            BodyPart::Face => ArmorSlot::FACE,
            BodyPart::Neck => ArmorSlot::NECK,
            BodyPart::Torso => ArmorSlot::TORSO,
            BodyPart::Shoulders => ArmorSlot::SHOULDERS,
            BodyPart::Arms => ArmorSlot::ARMS,
            BodyPart::Hands => ArmorSlot::HANDS,
            BodyPart::Legs => ArmorSlot::LEGS,
            BodyPart::Feet => ArmorSlot::FEET,
        }
    }
}

impl ArmorSlot {
    pub fn covers(&self, part: BodyPart) -> bool {
        self.contains(ArmorSlot::from(part))
    }

    /// Body parts in this set, in table order
    pub fn parts(self) -> impl Iterator<Item = BodyPart> {
        BodyPart::all().into_iter().filter(move |p| self.covers(*p))
    }
}

/// Stack position, innermost first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ArmorLayer {
    /// Padding, gambesons, clothing
    Under,
    Chainmail,
    Plate,
    /// Cloaks, surcoats
    Over,
}

pub const LAYER_COUNT: usize = 4;

impl ArmorLayer {
    pub fn all() -> [ArmorLayer; LAYER_COUNT] {
        [ArmorLayer::Under, ArmorLayer::Chainmail, ArmorLayer::Plate, ArmorLayer::Over]
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Static description of an armor item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorDefinition {
    pub id: String,
    pub name: String,
    pub slots: ArmorSlot,
    pub layer: ArmorLayer,
    /// Defense per covered part
    pub defenses: AHashMap<BodyPart, SlotDefense>,
    pub max_durability: f32,
}

impl ArmorDefinition {
    /// A piece with the same defense on every covered part
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        layer: ArmorLayer,
        slots: ArmorSlot,
        defense: SlotDefense,
        max_durability: f32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slots,
            layer,
            defenses: slots.parts().map(|p| (p, defense)).collect(),
            max_durability,
        }
    }

    /// Override the defense on one part (also adds the part to the coverage)
    pub fn with_part_defense(mut self, part: BodyPart, defense: SlotDefense) -> Self {
        self.slots |= ArmorSlot::from(part);
        self.defenses.insert(part, defense);
        self
    }

    /// Defense at `part`; zero for uncovered parts
    pub fn defense_at(&self, part: BodyPart, damage: DamageType) -> f32 {
        if !self.slots.covers(part) {
            return 0.0;
        }
        self.defenses
            .get(&part)
            .map(|d| d.against(damage).max(0.0))
            .unwrap_or(0.0)
    }

    /// Padded jacket: torso, shoulders and arms
    pub fn gambeson() -> Self {
        Self::new(
            "gambeson",
            "Gambeson",
            ArmorLayer::Under,
            ArmorSlot::TORSO | ArmorSlot::SHOULDERS | ArmorSlot::ARMS,
            SlotDefense::new(4.0, 2.0, 3.0),
            80.0,
        )
    }

    /// Mail shirt: torso and arms
    pub fn hauberk() -> Self {
        Self::new(
            "hauberk",
            "Mail Hauberk",
            ArmorLayer::Chainmail,
            ArmorSlot::TORSO | ArmorSlot::ARMS,
            SlotDefense::new(2.0, 6.0, 10.0),
            150.0,
        )
    }

    /// Open helmet: head only
    pub fn kettle_helm() -> Self {
        Self::new(
            "kettle_helm",
            "Kettle Helm",
            ArmorLayer::Plate,
            ArmorSlot::HEAD,
            SlotDefense::new(6.0, 8.0, 12.0),
            120.0,
        )
    }

    /// Plate breastplate: torso only
    pub fn breastplate() -> Self {
        Self::new(
            "breastplate",
            "Breastplate",
            ArmorLayer::Plate,
            ArmorSlot::TORSO,
            SlotDefense::new(8.0, 14.0, 18.0),
            200.0,
        )
    }
}

/// An armor item being worn, with its own wear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquippedArmor {
    pub definition: ArmorDefinition,
    pub durability: f32,
}

impl EquippedArmor {
    /// Fresh piece at full durability
    pub fn new(definition: ArmorDefinition) -> Self {
        let durability = definition.max_durability.max(0.0);
        Self { definition, durability }
    }

    pub fn with_durability(definition: ArmorDefinition, durability: f32) -> Self {
        let max = definition.max_durability.max(0.0);
        Self {
            definition,
            durability: durability.clamp(0.0, max),
        }
    }

    /// Remaining fraction in [0, 1]
    ///
    /// Pieces with no max durability are indestructible and always count fully.
    pub fn durability_ratio(&self) -> f32 {
        if self.definition.max_durability <= 0.0 {
            return 1.0;
        }
        (self.durability / self.definition.max_durability).clamp(0.0, 1.0)
    }

    pub fn is_broken(&self) -> bool {
        self.durability_ratio() <= 0.0
    }

    pub fn contribution(&self, part: BodyPart, damage: DamageType) -> f32 {
        self.definition.defense_at(part, damage) * self.durability_ratio()
    }

    /// Wear from one absorbed hit; returns durability actually lost
    pub fn degrade(&mut self, loss_fraction: f32) -> f32 {
        let max = self.definition.max_durability;
        if max <= 0.0 {
            return 0.0;
        }
        let before = self.durability;
        self.durability = (self.durability - max * loss_fraction.max(0.0)).max(0.0);
        before - self.durability
    }

    pub fn repair(&mut self, amount: f32) {
        let max = self.definition.max_durability.max(0.0);
        self.durability = (self.durability + amount.max(0.0)).min(max);
    }
}

/// Handle to a piece inside an `ArmorLoadout`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceId(pub u32);

/// Everything a combatant wears
///
/// `table[part][layer]` points into `pieces`; a piece covering several parts
/// appears in several cells but exists (and wears) once. Freed slots are
/// reused, so a `PieceId` is only valid while its piece is worn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArmorLoadout {
    table: [[Option<PieceId>; LAYER_COUNT]; BODY_PART_COUNT],
    pieces: Vec<Option<EquippedArmor>>,
}

impl ArmorLoadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wear a fresh copy of `definition`
    pub fn equip(&mut self, definition: ArmorDefinition) -> (PieceId, Vec<EquippedArmor>) {
        self.equip_piece(EquippedArmor::new(definition))
    }

    /// Wear an existing piece, evicting whatever occupies its cells
    ///
    /// Returns the new handle and the evicted pieces (each at most once).
    pub fn equip_piece(&mut self, piece: EquippedArmor) -> (PieceId, Vec<EquippedArmor>) {
        let layer = piece.definition.layer.index();
        let parts: Vec<BodyPart> = piece.definition.slots.parts().collect();

        let mut occupants: Vec<PieceId> = Vec::new();
        for part in &parts {
            if let Some(id) = self.table[part.index()][layer] {
                if !occupants.contains(&id) {
                    occupants.push(id);
                }
            }
        }
        let evicted: Vec<EquippedArmor> = occupants
            .into_iter()
            .filter_map(|id| self.unequip(id))
            .collect();

        let slot = match self.pieces.iter().position(|p| p.is_none()) {
            Some(free) => free,
            None => {
                self.pieces.push(None);
                self.pieces.len() - 1
            }
        };
        let id = PieceId(slot as u32);
        for part in &parts {
            self.table[part.index()][layer] = Some(id);
        }
        tracing::info!(
            "Equipped {} on {:?} layer ({} evicted)",
            piece.definition.name,
            piece.definition.layer,
            evicted.len()
        );
        self.pieces[slot] = Some(piece);

        (id, evicted)
    }

    /// Take a piece off; `None` if it is not worn
    pub fn unequip(&mut self, id: PieceId) -> Option<EquippedArmor> {
        let piece = self.pieces.get_mut(id.0 as usize)?.take()?;
        for row in self.table.iter_mut() {
            for cell in row.iter_mut() {
                if *cell == Some(id) {
                    *cell = None;
                }
            }
        }
        Some(piece)
    }

    /// Take off whatever is worn at `part` on `layer`
    pub fn unequip_at(&mut self, part: BodyPart, layer: ArmorLayer) -> Option<EquippedArmor> {
        let id = self.table[part.index()][layer.index()]?;
        self.unequip(id)
    }

    pub fn get(&self, id: PieceId) -> Option<&EquippedArmor> {
        self.pieces.get(id.0 as usize)?.as_ref()
    }

    pub fn piece_at(&self, part: BodyPart, layer: ArmorLayer) -> Option<&EquippedArmor> {
        self.get(self.table[part.index()][layer.index()]?)
    }

    /// Worn pieces with their handles
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &EquippedArmor)> {
        self.pieces
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|p| (PieceId(i as u32), p)))
    }

    pub fn is_empty(&self) -> bool {
        self.pieces().next().is_none()
    }

    pub fn repair(&mut self, id: PieceId, amount: f32) -> bool {
        match self.pieces.get_mut(id.0 as usize).and_then(|p| p.as_mut()) {
            Some(piece) => {
                piece.repair(amount);
                true
            }
            None => false,
        }
    }

    /// Remove everything, innermost layer first
    pub fn strip(&mut self) -> Vec<EquippedArmor> {
        self.table = [[None; LAYER_COUNT]; BODY_PART_COUNT];
        let mut stripped: Vec<EquippedArmor> = self.pieces.drain(..).flatten().collect();
        stripped.sort_by_key(|p| p.definition.layer);
        stripped
    }

    /// Distinct pieces worn at `part`, innermost first
    fn ids_at(&self, part: BodyPart) -> impl Iterator<Item = PieceId> + '_ {
        self.table[part.index()].iter().filter_map(|cell| *cell)
    }

    /// Protection at `part` against `damage` without wearing anything down
    pub fn protection(&self, part: BodyPart, damage: DamageType, anatomy: &Anatomy) -> f32 {
        let armor: f32 = self
            .ids_at(part)
            .filter_map(|id| self.get(id))
            .map(|p| p.contribution(part, damage))
            .sum();
        anatomy.defense(part, damage) + armor
    }

    /// Protection for one actual hit; every piece at `part` wears down afterwards
    ///
    /// Not idempotent: call exactly once per hit.
    pub fn absorb_hit(
        &mut self,
        part: BodyPart,
        damage: DamageType,
        anatomy: &Anatomy,
        config: &ArmorConfig,
    ) -> f32 {
        let total = self.protection(part, damage, anatomy);

        let ids: Vec<PieceId> = self.ids_at(part).collect();
        for id in ids {
            if let Some(piece) = self.pieces.get_mut(id.0 as usize).and_then(|p| p.as_mut()) {
                let lost = piece.degrade(config.durability_loss_fraction);
                if lost > 0.0 && piece.is_broken() {
                    tracing::debug!("{} is worn through", piece.definition.name);
                }
            }
        }

        total
    }
}
