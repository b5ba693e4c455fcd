use nom::combinator::map;
use nom::number::complete::le_u8;
use nom::sequence::tuple;
use nom::IResult;

use log::trace;

use crate::error::{Error, Result};
use crate::kind::TransformType;
use crate::matrix::RotationMatrix;
use crate::transform::*;

mod utilities;

use utilities::*;

/// A fixed size transform record.
pub trait DeserializeRecord: Sized {
    fn kind() -> TransformType;

    /// Parses the record, assuming the caller has checked the length.
    fn parse(i: &[u8]) -> IResult<&[u8], Self>;

    /// Reads one record, returning the unconsumed input.
    ///
    /// Fails with [`Error::ShortRead`] when fewer than `record_size` bytes remain; a partial
    /// record is never produced.
    fn read(i: &[u8]) -> Result<(&[u8], Self)> {
        let kind = Self::kind();
        let short_read = || Error::ShortRead {
            kind,
            needed: kind.record_size(),
            available: i.len(),
        };
        if i.len() < kind.record_size() {
            return Err(short_read());
        }
        Self::parse(i).map_err(|_| short_read())
    }
}

impl DeserializeRecord for MatrixKeyframe {
    fn kind() -> TransformType {
        TransformType::Matrix
    }

    fn parse(i: &[u8]) -> IResult<&[u8], Self> {
        map(tuple((matrix::<i16>, translation)), |(m, translation)| {
            MatrixKeyframe {
                matrix: RotationMatrix(m),
                translation,
            }
        })(i)
    }
}

impl DeserializeRecord for ByteMatrixKeyframe {
    fn kind() -> TransformType {
        TransformType::MatrixByte
    }

    fn parse(i: &[u8]) -> IResult<&[u8], Self> {
        map(
            tuple((matrix::<i8>, le_u8, translation)),
            |(matrix, padding, translation)| ByteMatrixKeyframe {
                matrix,
                padding,
                translation,
            },
        )(i)
    }
}

fn quat_keyframe<T: Component>(i: &[u8]) -> IResult<&[u8], QuatKeyframe<T>> {
    map(tuple((quat::<T>, translation)), |(rotation, translation)| {
        QuatKeyframe {
            rotation,
            translation,
        }
    })(i)
}

fn quat_scale_keyframe<T: Component>(i: &[u8]) -> IResult<&[u8], QuatScaleKeyframe<T>> {
    map(
        tuple((quat::<T>, translation, triple::<i8>, le_u8)),
        |(rotation, translation, scale, flags)| QuatScaleKeyframe {
            rotation,
            translation,
            scale,
            flags,
        },
    )(i)
}

impl DeserializeRecord for QuatKeyframe<i8> {
    fn kind() -> TransformType {
        TransformType::QuatByte
    }

    fn parse(i: &[u8]) -> IResult<&[u8], Self> {
        quat_keyframe(i)
    }
}

impl DeserializeRecord for QuatKeyframe<i16> {
    fn kind() -> TransformType {
        TransformType::Quat
    }

    fn parse(i: &[u8]) -> IResult<&[u8], Self> {
        quat_keyframe(i)
    }
}

impl DeserializeRecord for QuatScaleKeyframe<i8> {
    fn kind() -> TransformType {
        TransformType::QuatScaleByte
    }

    fn parse(i: &[u8]) -> IResult<&[u8], Self> {
        quat_scale_keyframe(i)
    }
}

impl DeserializeRecord for QuatScaleKeyframe<i16> {
    fn kind() -> TransformType {
        TransformType::QuatScale
    }

    fn parse(i: &[u8]) -> IResult<&[u8], Self> {
        quat_scale_keyframe(i)
    }
}

impl TransformType {
    /// Reads one record of this type.
    pub fn read<'a>(self, i: &'a [u8]) -> Result<(&'a [u8], TransformVariant)> {
        use TransformType::*;
        let (i, variant) = match self {
            Matrix => MatrixKeyframe::read(i).map(|(i, t)| (i, TransformVariant::Matrix(t)))?,
            MatrixByte => {
                ByteMatrixKeyframe::read(i).map(|(i, t)| (i, TransformVariant::MatrixByte(t)))?
            }
            QuatByte => {
                QuatKeyframe::<i8>::read(i).map(|(i, t)| (i, TransformVariant::QuatByte(t)))?
            }
            Quat => QuatKeyframe::<i16>::read(i).map(|(i, t)| (i, TransformVariant::Quat(t)))?,
            QuatScaleByte => QuatScaleKeyframe::<i8>::read(i)
                .map(|(i, t)| (i, TransformVariant::QuatScaleByte(t)))?,
            QuatScale => QuatScaleKeyframe::<i16>::read(i)
                .map(|(i, t)| (i, TransformVariant::QuatScale(t)))?,
        };
        trace!("read {}", variant);
        Ok((i, variant))
    }
}

/// Reads one record selected by its opcode.
pub fn decode(opcode: u8, i: &[u8]) -> Result<(&[u8], TransformVariant)> {
    TransformType::from_opcode(opcode)?.read(i)
}
