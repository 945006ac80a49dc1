//! Body parts for hit location, armor coverage and wound tracking (9 parts)

use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a weapon deals damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    /// Clubs, fists, falls
    Blunt,
    /// Spears, arrows, knives used point-first
    Pierce,
    /// Swords, axes
    Slash,
}

impl DamageType {
    pub fn all() -> [DamageType; 3] {
        [DamageType::Blunt, DamageType::Pierce, DamageType::Slash]
    }
}

/// Defense values against each damage type
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotDefense {
    pub blunt: f32,
    pub pierce: f32,
    pub slash: f32,
}

impl SlotDefense {
    pub fn new(blunt: f32, pierce: f32, slash: f32) -> Self {
        Self { blunt, pierce, slash }
    }

    /// Same value against every damage type
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value)
    }

    pub fn against(&self, damage: DamageType) -> f32 {
        match damage {
            DamageType::Blunt => self.blunt,
            DamageType::Pierce => self.pierce,
            DamageType::Slash => self.slash,
        }
    }
}

/// Body regions (each maps to one armor slot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyPart {
    Head,
    Face,
    Neck,
    /// Center mass, most hits land here
    Torso,
    Shoulders,
    Arms,
    Hands,
    Legs,
    Feet,
}

pub const BODY_PART_COUNT: usize = 9;

impl BodyPart {
    /// Returns all body parts in table order
    pub fn all() -> [BodyPart; BODY_PART_COUNT] {
        [
            BodyPart::Head,
            BodyPart::Face,
            BodyPart::Neck,
            BodyPart::Torso,
            BodyPart::Shoulders,
            BodyPart::Arms,
            BodyPart::Hands,
            BodyPart::Legs,
            BodyPart::Feet,
        ]
    }

    /// Row in per-part tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Relative probability of being struck (sums to 1.0)
    pub fn hit_weight(&self) -> f32 {
        match self {
            BodyPart::Torso => 0.30,
            BodyPart::Arms => 0.14,
            BodyPart::Legs => 0.16,
            BodyPart::Head => 0.08,
            BodyPart::Shoulders => 0.10,
            BodyPart::Face => 0.05,
            BodyPart::Neck => 0.03,
            BodyPart::Hands => 0.07,
            BodyPart::Feet => 0.07,
        }
    }

    /// Pick a struck part using `hit_weight`
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> BodyPart {
        let mut roll: f32 = rng.gen_range(0.0..1.0);
        for part in BodyPart::all() {
            roll -= part.hit_weight();
            if roll < 0.0 {
                return part;
            }
        }
        // Float drift past the last bucket
        BodyPart::Torso
    }
}

/// Natural (unarmored) defense per body part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anatomy {
    defenses: [SlotDefense; BODY_PART_COUNT],
}

impl Anatomy {
    /// Bare skin everywhere
    pub fn unprotected() -> Self {
        Self {
            defenses: [SlotDefense::default(); BODY_PART_COUNT],
        }
    }

    /// Human baseline: bone shrugs off a little blunt force, soft tissue nothing
    pub fn human() -> Self {
        let mut anatomy = Self::unprotected();
        anatomy.set(BodyPart::Head, SlotDefense::new(2.0, 0.0, 1.0));
        anatomy.set(BodyPart::Torso, SlotDefense::new(1.0, 0.0, 0.0));
        anatomy.set(BodyPart::Shoulders, SlotDefense::new(1.0, 0.0, 0.5));
        anatomy.set(BodyPart::Legs, SlotDefense::new(1.0, 0.0, 0.0));
        anatomy
    }

    pub fn set(&mut self, part: BodyPart, defense: SlotDefense) {
        self.defenses[part.index()] = defense;
    }

    pub fn defense(&self, part: BodyPart, damage: DamageType) -> f32 {
        self.defenses[part.index()].against(damage).max(0.0)
    }
}

impl Default for Anatomy {
    fn default() -> Self {
        Self::human()
    }
}
