//! 2D affine transforms
//!
//! [`AffineMatrix`] is an immutable 2x3 matrix `(a, b, c, d, e, f)` standing
//! for
//!
//! ```text
//! | a  c  e |
//! | b  d  f |
//! | 0  0  1 |
//! ```
//!
//! Steps passed to [`compose`] are concatenated in the order they are
//! pushed, the same way a renderer accumulates `translate`, `scale` and
//! `rotate` calls: the matrix for `[Translate, Scale]` is `T * S`, so points
//! are scaled first and then translated.

use smallvec::SmallVec;

use crate::error::{Result, TransformError};
use crate::geometry::Point;

/// Determinants with a smaller magnitude are treated as singular
const SINGULAR_EPSILON: f64 = 1e-12;

/// 2D affine transformation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineMatrix {
    pub const IDENTITY: AffineMatrix = AffineMatrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn translation(x: f64, y: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `angle` radians
    pub fn rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(c, s, -s, c, 0.0, 0.0)
    }

    /// Matrix elements as `[a, b, c, d, e, f]`
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Concatenate this transform with another (`self * other`).
    ///
    /// The result applies `other` first, then `self`.
    pub fn then(&self, other: &AffineMatrix) -> AffineMatrix {
        multiply(self, other)
    }

    pub fn invert(&self) -> Result<AffineMatrix> {
        invert(self)
    }

    pub fn transform_point(&self, point: Point) -> Point {
        transform_point(self, point)
    }

    /// Translation component
    pub fn translation_part(&self) -> Point {
        Point::new(self.e, self.f)
    }
}

/// A single step of a transform stack
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformStep {
    Translate(f64, f64),
    Scale(f64, f64),
    /// Rotation in radians
    Rotate(f64),
}

impl TransformStep {
    pub fn to_matrix(self) -> AffineMatrix {
        match self {
            TransformStep::Translate(x, y) => AffineMatrix::translation(x, y),
            TransformStep::Scale(sx, sy) => AffineMatrix::scale(sx, sy),
            TransformStep::Rotate(angle) => AffineMatrix::rotation(angle),
        }
    }
}

/// Compose steps left to right into a single matrix
pub fn compose(steps: &[TransformStep]) -> AffineMatrix {
    steps
        .iter()
        .fold(AffineMatrix::IDENTITY, |acc, step| {
            multiply(&acc, &step.to_matrix())
        })
}

/// `a * b`: the resulting transform first applies `b`, then `a`
pub fn multiply(a: &AffineMatrix, b: &AffineMatrix) -> AffineMatrix {
    AffineMatrix {
        a: a.a * b.a + a.c * b.b,
        b: a.b * b.a + a.d * b.b,
        c: a.a * b.c + a.c * b.d,
        d: a.b * b.c + a.d * b.d,
        e: a.a * b.e + a.c * b.f + a.e,
        f: a.b * b.e + a.d * b.f + a.f,
    }
}

/// Invert a matrix, failing with [`TransformError::SingularMatrix`] when the
/// determinant is zero or not finite
pub fn invert(m: &AffineMatrix) -> Result<AffineMatrix> {
    let det = m.determinant();
    if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
        return Err(TransformError::SingularMatrix { determinant: det });
    }
    let inv = 1.0 / det;
    Ok(AffineMatrix {
        a: m.d * inv,
        b: -m.b * inv,
        c: -m.c * inv,
        d: m.a * inv,
        e: (m.c * m.f - m.d * m.e) * inv,
        f: (m.b * m.e - m.a * m.f) * inv,
    })
}

pub fn transform_point(m: &AffineMatrix, p: Point) -> Point {
    Point::new(m.a * p.x + m.c * p.y + m.e, m.b * p.x + m.d * p.y + m.f)
}

/// Accumulates transform steps and composes them on [`build`](Self::build)
#[derive(Clone, Debug, Default)]
pub struct TransformBuilder {
    steps: SmallVec<[TransformStep; 4]>,
}

impl TransformBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(mut self, x: f64, y: f64) -> Self {
        self.steps.push(TransformStep::Translate(x, y));
        self
    }

    pub fn scale(mut self, sx: f64, sy: f64) -> Self {
        self.steps.push(TransformStep::Scale(sx, sy));
        self
    }

    pub fn rotate(mut self, angle: f64) -> Self {
        self.steps.push(TransformStep::Rotate(angle));
        self
    }

    pub fn steps(&self) -> &[TransformStep] {
        &self.steps
    }

    pub fn build(&self) -> AffineMatrix {
        compose(&self.steps)
    }
}
