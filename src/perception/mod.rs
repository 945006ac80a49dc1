pub mod noise;
pub mod vision;

pub use noise::{NoiseEvent, NoiseField, NoiseSource};
pub use vision::VisionCone;
