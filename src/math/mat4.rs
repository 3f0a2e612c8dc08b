//! 4x4 transformation matrix, stored row-major.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//!
//! Besides the general product, two sparse products are provided for the
//! camera pipeline. They exploit the fixed zero pattern of a perspective
//! matrix (diagonal plus `[2][3]`/`[3][2]`) and of a viewport matrix
//! (diagonal plus last column) and must only be used with matrices of that
//! shape.

use std::fmt;
use std::ops::{Index, IndexMut, Mul};

use approx::{AbsDiffEq, RelativeEq};

use super::vec4::Vec4;

/// 4x4 matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f64; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub const fn new(data: [[f64; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub const fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    /// Returns one row as a homogeneous vector.
    #[inline]
    pub fn row(&self, row: usize) -> Vec4 {
        let r = self.data[row];
        Vec4::new(r[0], r[1], r[2], r[3])
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().flatten().all(|v| v.is_finite())
    }

    /// Computes `projection * view` for a perspective `projection`.
    ///
    /// Only `p[0][0]`, `p[1][1]`, `p[2][2]`, `p[2][3]` and `p[3][2]` of the
    /// projection are read, and `view` is assumed to have a `(0, 0, 0, 1)`
    /// bottom row.
    pub fn perspective_mul(projection: &Mat4, view: &Mat4) -> Mat4 {
        let p = &projection.data;
        let v = &view.data;
        Mat4::new([
            [p[0][0] * v[0][0], p[0][0] * v[0][1], p[0][0] * v[0][2], p[0][0] * v[0][3]],
            [p[1][1] * v[1][0], p[1][1] * v[1][1], p[1][1] * v[1][2], p[1][1] * v[1][3]],
            [
                p[2][2] * v[2][0],
                p[2][2] * v[2][1],
                p[2][2] * v[2][2],
                p[2][2] * v[2][3] + p[2][3] * v[3][3],
            ],
            [p[3][2] * v[2][0], p[3][2] * v[2][1], p[3][2] * v[2][2], p[3][2] * v[2][3]],
        ])
    }

    /// Computes `viewport * rhs` for a viewport matrix.
    ///
    /// Only the diagonal scale terms and the last-column offsets of the
    /// viewport are read; its bottom row is taken to be `(0, 0, 0, 1)`.
    pub fn viewport_mul(viewport: &Mat4, rhs: &Mat4) -> Mat4 {
        let v = &viewport.data;
        let t = &rhs.data;
        let mut out = [[0.0f64; 4]; 4];
        for col in 0..4 {
            out[0][col] = v[0][0] * t[0][col] + v[0][3] * t[3][col];
            out[1][col] = v[1][1] * t[1][col] + v[1][3] * t[3][col];
            out[2][col] = v[2][2] * t[2][col] + v[2][3] * t[3][col];
            out[3][col] = t[3][col];
        }
        Mat4::new(out)
    }
}

impl Index<(usize, usize)> for Mat4 {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row][col]
    }
}

impl IndexMut<(usize, usize)> for Mat4 {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row][col]
    }
}

/// Matrix multiplication: Mat4 * Mat4.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f64; 4]; 4];

        for (row, out_row) in result.iter_mut().enumerate() {
            for (col, out) in out_row.iter_mut().enumerate() {
                *out = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

/// Transform a Vec4 by a matrix: Mat4 * Vec4 (column vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let d = &self.data;
        Vec4::new(
            d[0][0] * v.x + d[0][1] * v.y + d[0][2] * v.z + d[0][3] * v.w,
            d[1][0] * v.x + d[1][1] * v.y + d[1][2] * v.z + d[1][3] * v.w,
            d[2][0] * v.x + d[2][1] * v.y + d[2][2] * v.z + d[2][3] * v.w,
            d[3][0] * v.x + d[3][1] * v.y + d[3][2] * v.z + d[3][3] * v.w,
        )
    }
}

/// Debug dump: four lines of four comma-separated `{:.4}` values.
impl fmt::Display for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in &self.data {
            writeln!(f, "{:.4}, {:.4}, {:.4}, {:.4}", r[0], r[1], r[2], r[3])?;
        }
        Ok(())
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.data
            .iter()
            .flatten()
            .zip(other.data.iter().flatten())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.data
            .iter()
            .flatten()
            .zip(other.data.iter().flatten())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
