pub mod encounter;
pub mod events;
pub mod host;

pub use encounter::Encounter;
pub use events::SimulationEvent;
pub use host::{BlockingMask, Effects, Notification, NullEffects, OpenField, RecordingEffects, Senses};
