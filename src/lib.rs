//! Survival AI - Combatant simulation for a survival game
//!
//! Behavior state machine, perception, layered armor and injuries for the
//! hostile NPCs of one encounter. The host world is reached through the
//! `Senses` and `Effects` traits.

pub mod ai;
pub mod combat;
pub mod core;
pub mod entity;
pub mod perception;
pub mod simulation;
