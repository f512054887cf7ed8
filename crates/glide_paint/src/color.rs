//! Color types and utilities

/// RGBA color with f32 components (0.0 to 1.0)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Component-wise linear interpolation toward `other`
    pub fn lerp(self, other: Color, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Largest per-channel difference to `other`
    pub fn distance(&self, other: &Color) -> f32 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
            .max((self.a - other.a).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_and_distance() {
        let a = Color::new(0.0, 0.0, 0.0, 0.2);
        let b = Color::new(1.0, 0.5, 0.0, 0.6);
        let mid = a.lerp(b, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.g - 0.25).abs() < 1e-6);
        assert!((mid.a - 0.4).abs() < 1e-6);
        assert!((a.distance(&b) - 1.0).abs() < 1e-6);
        assert_eq!(b.lerp(a, 0.0), b);
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 1.0), Color::rgb(1.0, 1.0, 1.0));
    }
}
