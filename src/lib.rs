//! Codec and interpolation engine for the compact transforms of animated MOF models.
//!
//! Each keyframe is stored in one of six fixed size layouts, chosen by an opcode byte
//! (`'0'..='5'`). A keyframe decodes into a [`TransformVariant`], evaluates to a
//! [`MatrixTransform`] on its own, and can be interpolated against another keyframe of the
//! same layout.
//!
//! ```
//! use mr_transform::{decode, interpolate, TransformVariant, TransformType};
//! use mr_transform::transform::QuatKeyframe;
//! use mr_transform::quat::QuatS;
//!
//! let a = TransformVariant::Quat(QuatKeyframe::new(QuatS::identity(), [0, 0, 0]));
//! let b = TransformVariant::Quat(QuatKeyframe::new(QuatS::new(2896, 0, 2896, 0), [100, 0, 0]));
//! let bytes = mr_transform::encode(&b).unwrap();
//! let (_, decoded) = decode(TransformType::Quat.opcode(), &bytes).unwrap();
//! assert_eq!(decoded, b);
//! let halfway = interpolate(&a, &b, 0x800).unwrap();
//! assert_eq!(halfway.translation, [50, 0, 0]);
//! ```

pub mod interpolate;
pub mod kind;
pub mod quat;
pub mod read;
pub mod table;
pub mod transform;
pub mod trig;
pub mod write;

mod error;
mod matrix;

pub use error::{Error, Result};
pub use interpolate::{interpolate, interpolate_snapped, slerp, MR_QUAT_EPSILON};
pub use kind::{SignatureMarker, TransformType};
pub use matrix::{MatrixTransform, RotationMatrix, Translation, FIXED_ONE, FIXED_SHIFT};
pub use quat::{Quat, QuatB, QuatS};
pub use read::{decode, DeserializeRecord};
pub use table::TransformTable;
pub use transform::TransformVariant;
pub use write::{encode, SerializeRecord};
