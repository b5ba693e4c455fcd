//! Keyframe records for the six animated MOF transform layouts.

use crate::kind::TransformType;
use crate::matrix::{MatrixTransform, RotationMatrix, Translation, FIXED_SHIFT};
use crate::quat::{Quat, QuatComponent};

use std::fmt;

/// Bit 0 of the flags byte: apply the scale vector.
pub const FLAG_ENABLE_SCALING: u8 = 1 << 0;
/// Fractional bits of the stored scale components (3.5 format).
pub const SCALE_FIXED_POINT: u32 = 5;
/// Fractional bits of `MR_MAT34B` cells.
pub const MATRIX_BYTE_FIXED_POINT: u32 = 7;

/// Widens a stored scale component to 12 fractional bits.
pub fn widen_scale(scale: i8) -> i32 {
    i32::from(scale) << (FIXED_SHIFT - SCALE_FIXED_POINT)
}

/// `MR_MAT34`: a full precision matrix and a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MatrixKeyframe {
    pub matrix: RotationMatrix,
    pub translation: Translation,
}

/// `MR_MAT34B`: a 1.7 fixed point matrix, one padding byte and a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ByteMatrixKeyframe {
    pub matrix: [[i8; 3]; 3],
    /// Kept so records write back unchanged.
    pub padding: u8,
    pub translation: Translation,
}

/// `MR_QUAT_TRANS` (`i16`) and `MR_QUATB_TRANS` (`i8`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QuatKeyframe<T> {
    pub rotation: Quat<T>,
    pub translation: Translation,
}

/// `MR_QUAT_SCALE_TRANS` (`i16`) and `MR_QUATB_SCALE_TRANS` (`i8`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QuatScaleKeyframe<T> {
    pub rotation: Quat<T>,
    pub translation: Translation,
    /// 3.5 fixed point.
    pub scale: [i8; 3],
    pub flags: u8,
}

impl MatrixKeyframe {
    pub fn to_matrix(&self) -> MatrixTransform {
        MatrixTransform::new(self.matrix, self.translation)
    }

    pub fn from_matrix(matrix: &RotationMatrix, translation: Translation) -> Self {
        Self {
            matrix: *matrix,
            translation,
        }
    }
}

impl ByteMatrixKeyframe {
    pub fn rotation_matrix(&self) -> RotationMatrix {
        let mut out = [[0i16; 3]; 3];
        for (cells, bytes) in out.iter_mut().zip(self.matrix.iter()) {
            for (cell, byte) in cells.iter_mut().zip(bytes.iter()) {
                *cell = i16::from(*byte) << (FIXED_SHIFT - MATRIX_BYTE_FIXED_POINT);
            }
        }
        RotationMatrix(out)
    }

    pub fn to_matrix(&self) -> MatrixTransform {
        MatrixTransform::new(self.rotation_matrix(), self.translation)
    }

    /// Narrows each cell to 1.7, saturating so that 1.0 stays positive.
    pub fn from_matrix(matrix: &RotationMatrix, translation: Translation) -> Self {
        let mut out = [[0i8; 3]; 3];
        for (bytes, cells) in out.iter_mut().zip(matrix.0.iter()) {
            for (byte, cell) in bytes.iter_mut().zip(cells.iter()) {
                let narrowed = i32::from(*cell) >> (FIXED_SHIFT - MATRIX_BYTE_FIXED_POINT);
                *byte = narrowed.max(i32::from(i8::MIN)).min(i32::from(i8::MAX)) as i8;
            }
        }
        Self {
            matrix: out,
            padding: 0,
            translation,
        }
    }
}

impl<T: QuatComponent> QuatKeyframe<T> {
    pub fn new(rotation: Quat<T>, translation: Translation) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn to_matrix(&self) -> MatrixTransform {
        MatrixTransform::new(self.rotation.to_matrix(), self.translation)
    }

    pub fn from_matrix(matrix: &RotationMatrix, translation: Translation) -> Self {
        Self::new(Quat::from_matrix(matrix), translation)
    }
}

impl<T: QuatComponent> QuatScaleKeyframe<T> {
    pub fn new(rotation: Quat<T>, translation: Translation) -> Self {
        Self {
            rotation,
            translation,
            scale: [1 << SCALE_FIXED_POINT; 3],
            flags: 0,
        }
    }

    pub fn with_scale(mut self, scale: [i8; 3]) -> Self {
        self.scale = scale;
        self.flags |= FLAG_ENABLE_SCALING;
        self
    }

    pub fn scaling_enabled(&self) -> bool {
        self.flags & FLAG_ENABLE_SCALING == FLAG_ENABLE_SCALING
    }

    /// The scale in 12 fractional bits, `None` when the flag is clear.
    pub fn widened_scale(&self) -> Option<[i32; 3]> {
        if self.scaling_enabled() {
            let [x, y, z] = self.scale;
            Some([widen_scale(x), widen_scale(y), widen_scale(z)])
        } else {
            None
        }
    }

    pub fn to_matrix(&self) -> MatrixTransform {
        let out = MatrixTransform::new(self.rotation.to_matrix(), self.translation);
        match self.widened_scale() {
            Some(scale) => out.with_scale(scale),
            None => out,
        }
    }

    /// Stores the rotation with scaling disabled and a unit scale.
    pub fn from_matrix(matrix: &RotationMatrix, translation: Translation) -> Self {
        Self::new(Quat::from_matrix(matrix), translation)
    }
}

/// One decoded keyframe of any layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformVariant {
    Matrix(MatrixKeyframe),
    MatrixByte(ByteMatrixKeyframe),
    QuatByte(QuatKeyframe<i8>),
    Quat(QuatKeyframe<i16>),
    QuatScaleByte(QuatScaleKeyframe<i8>),
    QuatScale(QuatScaleKeyframe<i16>),
}

impl TransformVariant {
    pub fn kind(&self) -> TransformType {
        match self {
            TransformVariant::Matrix(_) => TransformType::Matrix,
            TransformVariant::MatrixByte(_) => TransformType::MatrixByte,
            TransformVariant::QuatByte(_) => TransformType::QuatByte,
            TransformVariant::Quat(_) => TransformType::Quat,
            TransformVariant::QuatScaleByte(_) => TransformType::QuatScaleByte,
            TransformVariant::QuatScale(_) => TransformType::QuatScale,
        }
    }

    pub fn translation(&self) -> Translation {
        match self {
            TransformVariant::Matrix(t) => t.translation,
            TransformVariant::MatrixByte(t) => t.translation,
            TransformVariant::QuatByte(t) => t.translation,
            TransformVariant::Quat(t) => t.translation,
            TransformVariant::QuatScaleByte(t) => t.translation,
            TransformVariant::QuatScale(t) => t.translation,
        }
    }

    /// Evaluates this keyframe on its own.
    pub fn to_matrix(&self) -> MatrixTransform {
        match self {
            TransformVariant::Matrix(t) => t.to_matrix(),
            TransformVariant::MatrixByte(t) => t.to_matrix(),
            TransformVariant::QuatByte(t) => t.to_matrix(),
            TransformVariant::Quat(t) => t.to_matrix(),
            TransformVariant::QuatScaleByte(t) => t.to_matrix(),
            TransformVariant::QuatScale(t) => t.to_matrix(),
        }
    }

    /// Quantizes a matrix and translation into the given layout.
    pub fn from_matrix(
        kind: TransformType,
        matrix: &RotationMatrix,
        translation: Translation,
    ) -> Self {
        match kind {
            TransformType::Matrix => {
                TransformVariant::Matrix(MatrixKeyframe::from_matrix(matrix, translation))
            }
            TransformType::MatrixByte => {
                TransformVariant::MatrixByte(ByteMatrixKeyframe::from_matrix(matrix, translation))
            }
            TransformType::QuatByte => {
                TransformVariant::QuatByte(QuatKeyframe::from_matrix(matrix, translation))
            }
            TransformType::Quat => {
                TransformVariant::Quat(QuatKeyframe::from_matrix(matrix, translation))
            }
            TransformType::QuatScaleByte => {
                TransformVariant::QuatScaleByte(QuatScaleKeyframe::from_matrix(matrix, translation))
            }
            TransformType::QuatScale => {
                TransformVariant::QuatScale(QuatScaleKeyframe::from_matrix(matrix, translation))
            }
        }
    }
}

impl fmt::Display for MatrixKeyframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [tx, ty, tz] = self.translation;
        write!(f, "MR_MAT34{{m={:?},tx={},ty={},tz={}}}", self.matrix.0, tx, ty, tz)
    }
}

impl fmt::Display for ByteMatrixKeyframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [tx, ty, tz] = self.translation;
        write!(f, "MR_MAT34B{{m={:?},tx={},ty={},tz={}}}", self.matrix, tx, ty, tz)
    }
}

impl<T: QuatComponent> fmt::Display for QuatKeyframe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = TransformType::for_precision(T::PRECISION, false).struct_name();
        let [tx, ty, tz] = self.translation;
        write!(f, "{}{{{},tx={},ty={},tz={}}}", name, self.rotation, tx, ty, tz)
    }
}

impl<T: QuatComponent> fmt::Display for QuatScaleKeyframe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = TransformType::for_precision(T::PRECISION, true).struct_name();
        let [tx, ty, tz] = self.translation;
        write!(
            f,
            "{}{{{},tx={},ty={},tz={},flags={},s={:?}}}",
            name, self.rotation, tx, ty, tz, self.flags, self.scale
        )
    }
}

impl fmt::Display for TransformVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformVariant::Matrix(t) => t.fmt(f),
            TransformVariant::MatrixByte(t) => t.fmt(f),
            TransformVariant::QuatByte(t) => t.fmt(f),
            TransformVariant::Quat(t) => t.fmt(f),
            TransformVariant::QuatScaleByte(t) => t.fmt(f),
            TransformVariant::QuatScale(t) => t.fmt(f),
        }
    }
}
