use cgmath::{Matrix3, Matrix4, Vector3};

use crate::quat::isqrt;

use std::fmt;

/// 1.0 in the 12 fractional bit format used by matrices, scales and interpolation factors.
pub const FIXED_ONE: i32 = 0x1000;
pub const FIXED_SHIFT: u32 = 12;

pub type Translation = [i16; 3];

/// A 3x3 matrix of 1.3.12 fixed point cells, indexed `[row][column]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotationMatrix(pub [[i16; 3]; 3]);

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RotationMatrix {
    pub const IDENTITY: Self = RotationMatrix([[0x1000, 0, 0], [0, 0x1000, 0], [0, 0, 0x1000]]);

    pub fn cell(&self, row: usize, column: usize) -> i32 {
        i32::from(self.0[row][column])
    }

    /// Post-multiplies by `diag(scale)`, with each scale in 12 fractional bits.
    ///
    /// Column `j` is multiplied by `scale[j]`, matching `MRScaleMatrix`.
    pub fn scaled(&self, scale: [i32; 3]) -> Self {
        let mut out = *self;
        for row in out.0.iter_mut() {
            for (cell, s) in row.iter_mut().zip(scale.iter()) {
                *cell = (i32::from(*cell).wrapping_mul(*s) >> FIXED_SHIFT) as i16;
            }
        }
        out
    }

    /// Largest absolute per-cell difference.
    pub fn max_difference(&self, other: &Self) -> i32 {
        let mut max = 0;
        for row in 0..3 {
            for column in 0..3 {
                max = max.max((self.cell(row, column) - other.cell(row, column)).abs());
            }
        }
        max
    }

    /// Euclidean length of a row in the same fixed point scale, rounded down.
    pub fn row_magnitude(&self, row: usize) -> i32 {
        let sum: u64 = self.0[row].iter().map(|&v| (i64::from(v) * i64::from(v)) as u64).sum();
        isqrt(sum) as i32
    }

    pub fn to_cgmath(&self) -> Matrix3<f32> {
        let f = |row: usize, column: usize| self.cell(row, column) as f32 / FIXED_ONE as f32;
        // cgmath takes its arguments column by column.
        #[rustfmt::skip]
        let out = Matrix3::new(
            f(0, 0), f(1, 0), f(2, 0),
            f(0, 1), f(1, 1), f(2, 1),
            f(0, 2), f(1, 2), f(2, 2),
        );
        out
    }

    /// Quantizes a floating point matrix, saturating out of range cells.
    pub fn from_cgmath(matrix: &Matrix3<f32>) -> Self {
        let mut out = [[0i16; 3]; 3];
        for (row, cells) in out.iter_mut().enumerate() {
            for (column, cell) in cells.iter_mut().enumerate() {
                let value = (matrix[column][row] * FIXED_ONE as f32).round();
                *cell = value.max(i16::MIN as f32).min(i16::MAX as f32) as i16;
            }
        }
        RotationMatrix(out)
    }
}

impl fmt::Display for RotationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{:6} {:6} {:6}]", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

/// The result of evaluating a keyframe: a rotation (with any scale already applied),
/// a translation and the applied scale, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatrixTransform {
    pub rotation: RotationMatrix,
    pub translation: Translation,
    pub scale: Option<[i32; 3]>,
}

impl MatrixTransform {
    pub fn new(rotation: RotationMatrix, translation: Translation) -> Self {
        Self {
            rotation,
            translation,
            scale: None,
        }
    }

    /// Applies a 12 fractional bit scale to the rotation and records it.
    pub fn with_scale(mut self, scale: [i32; 3]) -> Self {
        self.rotation = self.rotation.scaled(scale);
        self.scale = Some(scale);
        self
    }

    pub fn translation_vector(&self) -> Vector3<f32> {
        let [x, y, z] = self.translation;
        Vector3::new(f32::from(x), f32::from(y), f32::from(z))
    }

    pub fn to_homogeneous(&self) -> Matrix4<f32> {
        let mut out = Matrix4::from(self.rotation.to_cgmath());
        out.w = self.translation_vector().extend(1.0);
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use cgmath::{Deg, Matrix3, SquareMatrix};

    #[test]
    fn identity_defaults() {
        assert_eq!(RotationMatrix::default(), RotationMatrix::IDENTITY);
        assert_eq!(RotationMatrix::IDENTITY.to_cgmath(), Matrix3::identity());
        assert_eq!(RotationMatrix::IDENTITY.row_magnitude(1), 0x1000);
    }

    #[test]
    fn row_magnitude_is_exact_at_the_limits() {
        let m = RotationMatrix([[i16::MAX; 3], [i16::MIN; 3], [3, 4, 0]]);
        assert_eq!(m.row_magnitude(0), 56754);
        assert_eq!(m.row_magnitude(1), 56755);
        assert_eq!(m.row_magnitude(2), 5);
    }

    #[test]
    fn scale_multiplies_columns() {
        let m = RotationMatrix([[0x1000, 0x800, 0], [0, 0x1000, 0], [-0x1000, 0, 0x1000]]);
        let scaled = m.scaled([0x2000, 0x1000, 0x800]);
        assert_eq!(
            scaled,
            RotationMatrix([[0x2000, 0x800, 0], [0, 0x1000, 0], [-0x2000, 0, 0x800]])
        );
    }

    #[test]
    fn cgmath_round_trip() {
        let rotation = Matrix3::from_angle_y(Deg(30.0f32));
        let fixed = RotationMatrix::from_cgmath(&rotation);
        assert_eq!(fixed.cell(1, 1), 0x1000);
        assert_eq!(fixed.cell(0, 0), 3547);
        // cgmath's from_angle_y puts -sin in the z row of the first column.
        assert_eq!(fixed.cell(2, 0), -2048);
        assert_eq!(fixed.cell(0, 2), 2048);
        let back = fixed.to_cgmath();
        for column in 0..3 {
            for row in 0..3 {
                assert!((back[column][row] - rotation[column][row]).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn homogeneous_carries_translation() {
        let transform = MatrixTransform::new(RotationMatrix::IDENTITY, [10, -20, 30]);
        let m = transform.to_homogeneous();
        assert_eq!(m.w, cgmath::Vector4::new(10.0, -20.0, 30.0, 1.0));
        assert_eq!(m.x, cgmath::Vector4::new(1.0, 0.0, 0.0, 0.0));
    }
}
