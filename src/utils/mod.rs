pub mod logging;
pub mod math;

pub use math::{Rotator, Vector3};
