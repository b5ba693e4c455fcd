//! Keyframe interpolation in the engine's fixed point arithmetic.
//!
//! The rotation is blended with a table driven SLERP in integer arithmetic only, so results
//! are identical on every platform. `t` is a 12 fractional bit factor, 0 selecting `prev`
//! and 0x1000 selecting `next`.

use crate::error::{Error, Result};
use crate::kind::TransformType;
use crate::matrix::{MatrixTransform, Translation, FIXED_ONE, FIXED_SHIFT};
use crate::quat::{fixed_sqrt, Precision, Quat, QuatComponent, QuatS};
use crate::transform::{QuatKeyframe, QuatScaleKeyframe, TransformVariant};
use crate::trig;

use log::trace;

/// Below this distance from 1.0 the dot product is treated as parallel and blended linearly.
pub const MR_QUAT_EPSILON: i32 = 16;

/// Bounds for the magnitude a blended byte quaternion is renormalized by.
const RENORMALIZE_SLACK: i32 = 0x100;

fn factor(t: u16) -> i32 {
    i32::from(t).min(FIXED_ONE)
}

fn lerp(prev: i32, next: i32, t: i32) -> i32 {
    prev.wrapping_mul(FIXED_ONE - t).wrapping_add(next.wrapping_mul(t)) >> FIXED_SHIFT
}

/// Spherical interpolation between two quaternions of the same precision.
///
/// The result is always at 1.3.12 precision. Byte quaternions are renormalized after the
/// blend, short ones are not.
///
/// `next` and its negation give the same matrix for byte precision. Short precision floors
/// the dot product before taking its sign, so the two can differ by a few units per cell.
pub fn slerp<T: QuatComponent>(prev: &Quat<T>, next: &Quat<T>, t: u16) -> QuatS {
    if t == 0 {
        return prev.widen();
    }
    let t = factor(t);
    let precision = T::PRECISION;
    let p = prev.components();
    let n = next.components();

    let mut dot = p
        .iter()
        .zip(n.iter())
        .fold(0i32, |acc, (a, b)| acc.wrapping_add(a.wrapping_mul(*b)));
    dot >>= precision.dot_shift();

    let flip = dot < 0;
    if flip {
        dot = dot.wrapping_neg();
    }

    let (start, mut end) = if FIXED_ONE - dot > MR_QUAT_EPSILON {
        let omega = i32::from(trig::acos_raw(dot));
        let sin_omega = i32::from(trig::rsin(omega));
        if sin_omega == 0 {
            trace!("slerp: zero sine at omega {:#x}, blending linearly", omega);
            (FIXED_ONE - t, t)
        } else {
            let to = t.wrapping_mul(omega) >> FIXED_SHIFT;
            let end = (i32::from(trig::rsin(to)) << FIXED_SHIFT) / sin_omega;
            let start = i32::from(trig::rcos(to)) - (dot.wrapping_mul(end) >> FIXED_SHIFT);
            trace!("slerp: dot={} omega={:#x} start={} end={}", dot, omega, start, end);
            (start, end)
        }
    } else {
        trace!("slerp: dot={} is parallel, blending linearly", dot);
        (FIXED_ONE - t, t)
    };
    if flip {
        end = -end;
    }

    let shift = precision.slerp_shift();
    let mut out = [0i32; 4];
    for (o, (a, b)) in out.iter_mut().zip(p.iter().zip(n.iter())) {
        let blended = start.wrapping_mul(*a).wrapping_add(end.wrapping_mul(*b)) >> shift;
        *o = i32::from(blended as i16);
    }

    if precision == Precision::Byte {
        let magnitude = fixed_sqrt(out.iter().fold(0i32, |acc, v| acc.wrapping_add(v * v)))
            .max(FIXED_ONE - RENORMALIZE_SLACK)
            .min(FIXED_ONE + RENORMALIZE_SLACK);
        for v in out.iter_mut() {
            *v = (*v << FIXED_SHIFT) / magnitude;
        }
    }
    QuatS::from_components(out)
}

/// Linear blend of two translations. Exact at both ends.
pub fn blend_translation(prev: Translation, next: Translation, t: u16) -> Translation {
    let t = factor(t);
    let mut out = [0i16; 3];
    for (o, (p, n)) in out.iter_mut().zip(prev.iter().zip(next.iter())) {
        *o = lerp(i32::from(*p), i32::from(*n), t) as i16;
    }
    out
}

/// Blends the widened scales of two keyframes, `None` when neither enables scaling.
///
/// A keyframe without the flag counts as unit scale.
pub fn blend_scale<T: QuatComponent>(
    prev: &QuatScaleKeyframe<T>,
    next: &QuatScaleKeyframe<T>,
    t: u16,
) -> Option<[i32; 3]> {
    if !prev.scaling_enabled() && !next.scaling_enabled() {
        return None;
    }
    let t = factor(t);
    let unit = [FIXED_ONE; 3];
    let p = prev.widened_scale().unwrap_or(unit);
    let n = next.widened_scale().unwrap_or(unit);
    Some([lerp(p[0], n[0], t), lerp(p[1], n[1], t), lerp(p[2], n[2], t)])
}

pub fn interpolate_quat<T: QuatComponent>(
    prev: &QuatKeyframe<T>,
    next: &QuatKeyframe<T>,
    t: u16,
) -> MatrixTransform {
    MatrixTransform::new(
        slerp(&prev.rotation, &next.rotation, t).to_matrix(),
        blend_translation(prev.translation, next.translation, t),
    )
}

pub fn interpolate_quat_scale<T: QuatComponent>(
    prev: &QuatScaleKeyframe<T>,
    next: &QuatScaleKeyframe<T>,
    t: u16,
) -> MatrixTransform {
    let out = MatrixTransform::new(
        slerp(&prev.rotation, &next.rotation, t).to_matrix(),
        blend_translation(prev.translation, next.translation, t),
    );
    match blend_scale(prev, next, t) {
        Some(scale) => out.with_scale(scale),
        None => out,
    }
}

/// Nearest keyframe selection used by `MR_QUATB_SCALE_TRANS`.
///
/// This is not smooth: the rotation and scale jump from `prev` to `next` at `t = 0x800`.
/// Only the translation is blended.
pub fn interpolate_snapped<T: QuatComponent>(
    prev: &QuatScaleKeyframe<T>,
    next: &QuatScaleKeyframe<T>,
    t: u16,
) -> MatrixTransform {
    let nearest = if factor(t) >= FIXED_ONE / 2 { next } else { prev };
    let mut out = nearest.to_matrix();
    out.translation = blend_translation(prev.translation, next.translation, t);
    out
}

/// Interpolates between two keyframes of the same layout.
///
/// Matrix layouts cannot be interpolated and yield [`Error::UnsupportedOperation`];
/// keyframes of different layouts yield [`Error::TypeMismatch`]. Factors above 0x1000 are
/// clamped.
pub fn interpolate(
    prev: &TransformVariant,
    next: &TransformVariant,
    t: u16,
) -> Result<MatrixTransform> {
    use TransformVariant as V;
    match (prev, next) {
        (V::QuatByte(p), V::QuatByte(n)) => Ok(interpolate_quat(p, n, t)),
        (V::Quat(p), V::Quat(n)) => Ok(interpolate_quat(p, n, t)),
        (V::QuatScaleByte(p), V::QuatScaleByte(n)) => Ok(interpolate_snapped(p, n, t)),
        (V::QuatScale(p), V::QuatScale(n)) => Ok(interpolate_quat_scale(p, n, t)),
        (V::Matrix(_), V::Matrix(_)) | (V::MatrixByte(_), V::MatrixByte(_)) => {
            Err(unsupported(prev.kind()))
        }
        _ => Err(Error::TypeMismatch {
            prev: prev.kind(),
            next: next.kind(),
        }),
    }
}

fn unsupported(kind: TransformType) -> Error {
    Error::UnsupportedOperation {
        kind,
        operation: "interpolation",
    }
}

impl TransformVariant {
    /// See [`interpolate`].
    pub fn interpolate(&self, next: &TransformVariant, t: u16) -> Result<MatrixTransform> {
        interpolate(self, next, t)
    }
}
