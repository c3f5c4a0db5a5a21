//! 8-bit RGB color with the small set of operations shading needs.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Multiply by a scalar brightness, saturating.
    pub fn scale(self, f: f32) -> Self {
        Self {
            r: (self.r as f32 * f).clamp(0.0, 255.0) as u8,
            g: (self.g as f32 * f).clamp(0.0, 255.0) as u8,
            b: (self.b as f32 * f).clamp(0.0, 255.0) as u8,
        }
    }

    /// Per-channel multiplicative tint.
    pub fn tint(self, t: Vec3) -> Self {
        Self {
            r: (self.r as f32 * t.x).clamp(0.0, 255.0) as u8,
            g: (self.g as f32 * t.y).clamp(0.0, 255.0) as u8,
            b: (self.b as f32 * t.z).clamp(0.0, 255.0) as u8,
        }
    }

    /// Add a signed offset to every channel, saturating.
    pub fn offset(self, d: i32) -> Self {
        Self {
            r: (self.r as i32 + d).clamp(0, 255) as u8,
            g: (self.g as i32 + d).clamp(0, 255) as u8,
            b: (self.b as i32 + d).clamp(0, 255) as u8,
        }
    }

    /// Linear blend toward `other`; `t` clamped to [0, 1].
    pub fn lerp(self, other: Rgb, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * (1.0 - t) + other.r as f32 * t) as u8,
            g: (self.g as f32 * (1.0 - t) + other.g as f32 * t) as u8,
            b: (self.b as f32 * (1.0 - t) + other.b as f32 * t) as u8,
        }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}
