//! Steering force primitives

use glam::Vec3;

/// A behavior producing a steering force from an agent's kinematic state.
pub trait SteeringBehavior {
    /// Steering force for an agent at `position` moving with `velocity`.
    fn force(&self, position: Vec3, velocity: Vec3) -> Vec3;
}

/// Seek: a fixed-magnitude pull straight toward a target point.
#[derive(Debug, Clone, Copy)]
pub struct Seek {
    /// Point to steer toward
    pub target: Vec3,
    /// Force magnitude
    pub magnitude: f32,
}

impl Seek {
    #[must_use]
    pub fn new(target: Vec3, magnitude: f32) -> Self {
        Self { target, magnitude }
    }
}

impl SteeringBehavior for Seek {
    fn force(&self, position: Vec3, _velocity: Vec3) -> Vec3 {
        (self.target - position).normalize_or_zero() * self.magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_points_at_target() {
        let seek = Seek::new(Vec3::new(10.0, 0.0, 0.0), 5.0);
        let force = seek.force(Vec3::ZERO, Vec3::ZERO);
        assert!((force - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_seek_magnitude_is_distance_independent() {
        let seek = Seek::new(Vec3::new(0.0, 0.0, 100.0), 2.0);
        let near = seek.force(Vec3::new(0.0, 0.0, 99.0), Vec3::ZERO);
        let far = seek.force(Vec3::ZERO, Vec3::ZERO);
        assert!((near.length() - 2.0).abs() < 1e-6);
        assert!((far.length() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_seek_at_target_is_zero() {
        let seek = Seek::new(Vec3::ONE, 5.0);
        assert_eq!(seek.force(Vec3::ONE, Vec3::ZERO), Vec3::ZERO);
    }
}
