use std::fmt;

/// 3D vector in Unreal world units
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize, Default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn one() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(X={:.6},Y={:.6},Z={:.6})", self.x, self.y, self.z)
    }
}

/// Unreal rotation, 65536 units per full turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default)]
pub struct Rotator {
    pub pitch: i32,
    pub yaw: i32,
    pub roll: i32,
}

impl Rotator {
    pub fn new(pitch: i32, yaw: i32, roll: i32) -> Self {
        Self { pitch, yaw, roll }
    }

    pub fn is_zero(&self) -> bool {
        self.pitch == 0 && self.yaw == 0 && self.roll == 0
    }
}

impl fmt::Display for Rotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(Pitch={},Yaw={},Roll={})", self.pitch, self.yaw, self.roll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_display() {
        let v = Vector3::new(1.0, -2.5, 0.0);
        assert_eq!(v.to_string(), "(X=1.000000,Y=-2.500000,Z=0.000000)");
    }

    #[test]
    fn test_rotator() {
        assert!(Rotator::default().is_zero());
        assert!(!Rotator::new(0, 0, 1).is_zero());
        assert_eq!(Rotator::new(0, 16384, 0).to_string(), "(Pitch=0,Yaw=16384,Roll=0)");
    }
}
