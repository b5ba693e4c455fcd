//! Conversions between fixed point quaternions and rotation matrices.
//!
//! Two precisions exist. `MR_QUAT` stores shorts in 1.3.12 format (4096 = 1.0) and
//! `MR_QUATB` stores bytes in 1.1.6 format (64 = 1.0). Both feed the same matrix formula,
//! only the shift applied to the products differs: byte products are already in matrix scale.

use crate::matrix::{RotationMatrix, FIXED_ONE, FIXED_SHIFT};

use cgmath::Quaternion;
use log::warn;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Byte,
    Short,
}

impl Precision {
    /// The component value that represents 1.0.
    pub fn one(self) -> i32 {
        match self {
            Precision::Byte => 1 << 6,
            Precision::Short => FIXED_ONE,
        }
    }

    /// Shift applied to the quaternion dot product before it is compared against 1.0.
    pub fn dot_shift(self) -> u32 {
        match self {
            Precision::Byte => 0,
            Precision::Short => 12,
        }
    }

    /// Shift applied to the blended components, always landing in 1.3.12.
    pub fn slerp_shift(self) -> u32 {
        match self {
            Precision::Byte => 6,
            Precision::Short => 12,
        }
    }
}

/// A quaternion component type, `i8` for `MR_QUATB` and `i16` for `MR_QUAT`.
pub trait QuatComponent: Copy + Default + Eq + fmt::Debug + fmt::Display + Into<i32> {
    const PRECISION: Precision;
    /// Right shift applied to the products when building a matrix.
    const PRODUCT_SHIFT: u32;
    /// Right shift from the matrix square root to the largest component.
    const ROOT_SHIFT: u32;
    /// Left shift applied to off-diagonal sums before dividing by the root.
    const DIFF_SHIFT: u32;

    /// Truncates to the component width, as a C cast would.
    fn truncate(value: i32) -> Self;
}

impl QuatComponent for i8 {
    const PRECISION: Precision = Precision::Byte;
    const PRODUCT_SHIFT: u32 = 0;
    const ROOT_SHIFT: u32 = 7;
    const DIFF_SHIFT: u32 = 5;

    fn truncate(value: i32) -> Self {
        value as i8
    }
}

impl QuatComponent for i16 {
    const PRECISION: Precision = Precision::Short;
    const PRODUCT_SHIFT: u32 = 12;
    const ROOT_SHIFT: u32 = 1;
    const DIFF_SHIFT: u32 = 11;

    fn truncate(value: i32) -> Self {
        value as i16
    }
}

/// A fixed point quaternion, `c` being the real part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Quat<T> {
    pub c: T,
    pub x: T,
    pub y: T,
    pub z: T,
}

pub type QuatB = Quat<i8>;
pub type QuatS = Quat<i16>;

impl<T: QuatComponent> Quat<T> {
    pub fn new(c: T, x: T, y: T, z: T) -> Self {
        Quat { c, x, y, z }
    }

    pub fn identity() -> Self {
        let one = T::truncate(T::PRECISION.one());
        Quat::new(one, T::default(), T::default(), T::default())
    }

    pub fn precision(&self) -> Precision {
        T::PRECISION
    }

    pub fn components(&self) -> [i32; 4] {
        [self.c.into(), self.x.into(), self.y.into(), self.z.into()]
    }

    pub fn from_components(components: [i32; 4]) -> Self {
        let [c, x, y, z] = components;
        Quat::new(T::truncate(c), T::truncate(x), T::truncate(y), T::truncate(z))
    }

    /// The same quaternion at 1.3.12 precision.
    pub fn widen(&self) -> QuatS {
        let shift = FIXED_SHIFT - T::PRECISION.one().trailing_zeros();
        let [c, x, y, z] = self.components();
        QuatS::from_components([c << shift, x << shift, y << shift, z << shift])
    }

    /// Every component negated. This is the same rotation.
    pub fn negated(&self) -> Self {
        let [c, x, y, z] = self.components();
        Quat::from_components([-c, -x, -y, -z])
    }

    pub fn to_matrix(&self) -> RotationMatrix {
        quat_to_matrix(self)
    }

    pub fn from_matrix(matrix: &RotationMatrix) -> Self {
        matrix_to_quat(matrix)
    }

    pub fn to_cgmath(&self) -> Quaternion<f32> {
        let one = T::PRECISION.one() as f32;
        let [c, x, y, z] = self.components();
        Quaternion::new(c as f32 / one, x as f32 / one, y as f32 / one, z as f32 / one)
    }

    /// Quantizes a floating point quaternion, saturating out of range components.
    pub fn from_cgmath(q: &Quaternion<f32>) -> Self {
        let one = T::PRECISION.one() as f32;
        let (min, max) = match T::PRECISION {
            Precision::Byte => (i8::MIN as f32, i8::MAX as f32),
            Precision::Short => (i16::MIN as f32, i16::MAX as f32),
        };
        let quantize = |v: f32| (v * one).round().max(min).min(max) as i32;
        Quat::from_components([quantize(q.s), quantize(q.v.x), quantize(q.v.y), quantize(q.v.z)])
    }
}

/// Exact integer square root, rounded down. Non-positive input yields 0.
pub fn fixed_sqrt(value: i32) -> i32 {
    if value <= 0 {
        return 0;
    }
    isqrt(value as u64) as i32
}

/// Bitwise square root, rounded down.
pub(crate) fn isqrt(value: u64) -> u64 {
    let mut root = 0u64;
    let mut bit = 1u64 << 62;
    let mut rem = value;
    while bit > value {
        bit >>= 2;
    }
    while bit != 0 {
        if rem >= root + bit {
            rem -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }
    root
}

/// Builds a rotation matrix from a quaternion (`MRQuaternionToMatrix`).
///
/// Arithmetic wraps at 32 bits and cells truncate to 16 bits.
pub fn quat_to_matrix<T: QuatComponent>(q: &Quat<T>) -> RotationMatrix {
    let [c, x, y, z] = q.components();
    let shift = T::PRODUCT_SHIFT;

    let xs = x << 1;
    let ys = y << 1;
    let zs = z << 1;
    let wx = c.wrapping_mul(xs);
    let wy = c.wrapping_mul(ys);
    let wz = c.wrapping_mul(zs);
    let xx = x.wrapping_mul(xs);
    let xy = x.wrapping_mul(ys);
    let xz = x.wrapping_mul(zs);
    let yy = y.wrapping_mul(ys);
    let yz = y.wrapping_mul(zs);
    let zz = z.wrapping_mul(zs);

    let diagonal = |a: i32, b: i32| FIXED_ONE.wrapping_sub(a.wrapping_add(b) >> shift) as i16;
    let cross = |v: i32| (v >> shift) as i16;

    RotationMatrix([
        [
            diagonal(yy, zz),
            cross(xy.wrapping_add(wz)),
            cross(xz.wrapping_sub(wy)),
        ],
        [
            cross(xy.wrapping_sub(wz)),
            diagonal(xx, zz),
            cross(yz.wrapping_add(wx)),
        ],
        [
            cross(xz.wrapping_add(wy)),
            cross(yz.wrapping_sub(wx)),
            diagonal(xx, yy),
        ],
    ])
}

/// Extracts a quaternion from a rotation matrix (`MRMatrixToQuaternion`).
///
/// A degenerate matrix (non-positive root) produces the identity quaternion.
pub fn matrix_to_quat<T: QuatComponent>(matrix: &RotationMatrix) -> Quat<T> {
    let m = |row: usize, column: usize| matrix.cell(row, column);
    let root_shift = T::ROOT_SHIFT;
    let diff_shift = T::DIFF_SHIFT;

    let trace = m(0, 0) + m(1, 1) + m(2, 2);
    if trace > 0 {
        let s = fixed_sqrt((trace + FIXED_ONE) << 12);
        return Quat::from_components([
            s >> root_shift,
            ((m(1, 2) - m(2, 1)) << diff_shift) / s,
            ((m(2, 0) - m(0, 2)) << diff_shift) / s,
            ((m(0, 1) - m(1, 0)) << diff_shift) / s,
        ]);
    }

    let mut i = 0;
    if m(1, 1) > m(0, 0) {
        i = 1;
    }
    if m(2, 2) > m(i, i) {
        i = 2;
    }
    let j = if i == 2 { 0 } else { i + 1 };
    let k = if j == 2 { 0 } else { j + 1 };

    let s = fixed_sqrt(((m(i, i) - (m(j, j) + m(k, k))) + FIXED_ONE) << 12);
    if s <= 0 {
        warn!("degenerate rotation matrix {:?}", matrix.0);
        return Quat::identity();
    }
    let v1 = s >> root_shift;
    let v2 = ((m(i, j) + m(j, i)) << diff_shift) / s;
    let v3 = ((m(i, k) + m(k, i)) << diff_shift) / s;
    let c = ((m(j, k) - m(k, j)) << diff_shift) / s;

    let [x, y, z] = match i {
        0 => [v1, v2, v3],
        1 => [v3, v1, v2],
        _ => [v2, v3, v1],
    };
    Quat::from_components([c, x, y, z])
}

impl<T: QuatComponent> fmt::Display for Quat<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c={},x={},y={},z={}", self.c, self.x, self.y, self.z)
    }
}
