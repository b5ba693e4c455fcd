use cookie_factory::bytes::{le_i16, le_i8, le_u8};
use cookie_factory::sequence::tuple;
use cookie_factory::{gen_simple, GenResult, SerializeFn, WriteContext};

use crate::error::{Error, Result};
use crate::matrix::Translation;
use crate::quat::{Precision, Quat, QuatComponent};
use crate::transform::*;

use std::io;

fn translation<W: io::Write>(t: Translation) -> impl SerializeFn<W> {
    tuple((le_i16(t[0]), le_i16(t[1]), le_i16(t[2])))
}

fn scale<W: io::Write>(s: [i8; 3]) -> impl SerializeFn<W> {
    tuple((le_i8(s[0]), le_i8(s[1]), le_i8(s[2])))
}

fn matrix<W: io::Write>(m: [[i16; 3]; 3]) -> impl SerializeFn<W> {
    move |mut out: WriteContext<W>| -> GenResult<W> {
        for cell in m.iter().flat_map(|row| row.iter()) {
            out = le_i16(*cell)(out)?;
        }
        Ok(out)
    }
}

fn byte_matrix<W: io::Write>(m: [[i8; 3]; 3]) -> impl SerializeFn<W> {
    move |mut out: WriteContext<W>| -> GenResult<W> {
        for cell in m.iter().flat_map(|row| row.iter()) {
            out = le_i8(*cell)(out)?;
        }
        Ok(out)
    }
}

fn component<W: io::Write>(precision: Precision, value: i32) -> impl SerializeFn<W> {
    move |out: WriteContext<W>| -> GenResult<W> {
        match precision {
            Precision::Byte => le_i8(value as i8)(out),
            Precision::Short => le_i16(value as i16)(out),
        }
    }
}

fn quat<T: QuatComponent, W: io::Write>(q: Quat<T>) -> impl SerializeFn<W> {
    let p = T::PRECISION;
    let [c, x, y, z] = q.components();
    tuple((
        component(p, c),
        component(p, x),
        component(p, y),
        component(p, z),
    ))
}

/// A fixed size transform record that can be written back out.
pub trait SerializeRecord {
    fn serialize<W: io::Write>(&self, out: WriteContext<W>) -> GenResult<W>;

    /// Writes the record into `writer`, returning it.
    fn write_to<W: io::Write>(&self, writer: W) -> Result<W> {
        gen_simple(move |out: WriteContext<W>| self.serialize(out), writer)
            .map_err(|e| Error::Serialize(format!("{:?}", e)))
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        self.write_to(Vec::new())
    }
}

impl SerializeRecord for MatrixKeyframe {
    fn serialize<W: io::Write>(&self, out: WriteContext<W>) -> GenResult<W> {
        tuple((matrix(self.matrix.0), translation(self.translation)))(out)
    }
}

impl SerializeRecord for ByteMatrixKeyframe {
    fn serialize<W: io::Write>(&self, out: WriteContext<W>) -> GenResult<W> {
        tuple((
            byte_matrix(self.matrix),
            le_u8(self.padding),
            translation(self.translation),
        ))(out)
    }
}

impl<T: QuatComponent> SerializeRecord for QuatKeyframe<T> {
    fn serialize<W: io::Write>(&self, out: WriteContext<W>) -> GenResult<W> {
        tuple((quat(self.rotation), translation(self.translation)))(out)
    }
}

impl<T: QuatComponent> SerializeRecord for QuatScaleKeyframe<T> {
    fn serialize<W: io::Write>(&self, out: WriteContext<W>) -> GenResult<W> {
        tuple((
            quat(self.rotation),
            translation(self.translation),
            scale(self.scale),
            le_u8(self.flags),
        ))(out)
    }
}

impl SerializeRecord for TransformVariant {
    fn serialize<W: io::Write>(&self, out: WriteContext<W>) -> GenResult<W> {
        match self {
            TransformVariant::Matrix(t) => t.serialize(out),
            TransformVariant::MatrixByte(t) => t.serialize(out),
            TransformVariant::QuatByte(t) => t.serialize(out),
            TransformVariant::Quat(t) => t.serialize(out),
            TransformVariant::QuatScaleByte(t) => t.serialize(out),
            TransformVariant::QuatScale(t) => t.serialize(out),
        }
    }
}

/// Encodes one record, exactly `record_size` bytes long.
pub fn encode(variant: &TransformVariant) -> Result<Vec<u8>> {
    let bytes = variant.write_to(Vec::with_capacity(variant.kind().record_size()))?;
    debug_assert_eq!(bytes.len(), variant.kind().record_size());
    Ok(bytes)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::quat::{QuatB, QuatS};

    #[test]
    fn quat_scale_layout() {
        let keyframe = QuatScaleKeyframe::new(QuatS::new(4096, -1, 2, -3), [100, -100, 0x1234])
            .with_scale([32, -1, 64]);
        let bytes = encode(&TransformVariant::QuatScale(keyframe)).unwrap();
        assert_eq!(
            bytes,
            [
                0x00, 0x10, 0xFF, 0xFF, 0x02, 0x00, 0xFD, 0xFF, // c x y z
                0x64, 0x00, 0x9C, 0xFF, 0x34, 0x12, // translation
                0x20, 0xFF, 0x40, // scale
                0x01, // flags
            ]
        );
    }

    #[test]
    fn byte_matrix_layout() {
        let keyframe = ByteMatrixKeyframe {
            matrix: [[1, 2, 3], [4, 5, 6], [7, 8, -9]],
            padding: 0xAB,
            translation: [1, 0, -1],
        };
        let bytes = keyframe.to_bytes().unwrap();
        assert_eq!(
            bytes,
            [1, 2, 3, 4, 5, 6, 7, 8, 0xF7, 0xAB, 0x01, 0x00, 0x00, 0x00, 0xFF, 0xFF]
        );
    }

    #[test]
    fn record_sizes() {
        let variants = [
            TransformVariant::Matrix(MatrixKeyframe::default()),
            TransformVariant::MatrixByte(ByteMatrixKeyframe::default()),
            TransformVariant::QuatByte(QuatKeyframe::new(QuatB::identity(), [0; 3])),
            TransformVariant::Quat(QuatKeyframe::new(QuatS::identity(), [0; 3])),
            TransformVariant::QuatScaleByte(QuatScaleKeyframe::new(QuatB::identity(), [0; 3])),
            TransformVariant::QuatScale(QuatScaleKeyframe::new(QuatS::identity(), [0; 3])),
        ];
        for variant in variants.iter() {
            let bytes = encode(variant).unwrap();
            assert_eq!(bytes.len(), variant.kind().record_size(), "{}", variant.kind());
        }
    }

    #[test]
    fn writes_into_existing_buffer() {
        let keyframe = QuatKeyframe::new(QuatB::new(64, 0, 0, 0), [1, 2, 3]);
        let out = keyframe.write_to(vec![0xEE]).unwrap();
        assert_eq!(out, [0xEE, 0x40, 0, 0, 0, 1, 0, 2, 0, 3, 0]);
    }
}
