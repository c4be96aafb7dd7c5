use rcube_ecs::Component;
use rcube_math::Vec3;

use super::Transform;

/// Light arriving from infinitely far away along the transform's −Z axis.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(color: Vec3) -> Self {
        Self {
            color,
            intensity: 1.0,
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// World space direction the light travels in.
    pub fn direction(&self, transform: &Transform) -> Vec3 {
        transform.world().transform_direction(-Vec3::Z).normalize()
    }

    /// Color premultiplied by intensity, as a shader would consume it.
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::ONE)
    }
}

/// Light emitted from the transform's world position, fading out at `radius`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PointLight {
    pub color: Vec3,
    pub intensity: f32,
    pub radius: f32,
}

impl PointLight {
    pub fn new(color: Vec3, radius: f32) -> Self {
        Self {
            color,
            intensity: 1.0,
            radius,
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn position(&self, transform: &Transform) -> Vec3 {
        transform.world_position()
    }

    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(Vec3::ONE, 10.0)
    }
}
