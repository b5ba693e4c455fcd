use crate::error::{Error, Result};
use crate::quat::Precision;

use std::fmt;

/// The record layout selected by an animated MOF's transform opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransformType {
    Matrix,
    MatrixByte,
    QuatByte,
    Quat,
    QuatScaleByte,
    QuatScale,
}

const ALL: [TransformType; 6] = [
    TransformType::Matrix,
    TransformType::MatrixByte,
    TransformType::QuatByte,
    TransformType::Quat,
    TransformType::QuatScaleByte,
    TransformType::QuatScale,
];

// Indexed by `opcode - 0x30`.
const RECORD_SIZES: [usize; 6] = [24, 16, 10, 14, 15, 19];
const STRUCT_NAMES: [&str; 6] = [
    "MR_MAT34",
    "MR_MAT34B",
    "MR_QUATB_TRANS",
    "MR_QUAT_TRANS",
    "MR_QUATB_SCALE_TRANS",
    "MR_QUAT_SCALE_TRANS",
];

const FIRST_OPCODE: u8 = b'0';
const SIGNATURE_SUFFIX: &[u8; 2] = b"ax";

impl TransformType {
    pub const ALL: [TransformType; 6] = ALL;

    pub fn from_opcode(opcode: u8) -> Result<Self> {
        opcode
            .checked_sub(FIRST_OPCODE)
            .and_then(|i| ALL.get(i as usize))
            .copied()
            .ok_or(Error::UnrecognizedTransformType(opcode))
    }

    fn index(self) -> usize {
        self as usize
    }

    pub fn opcode(self) -> u8 {
        FIRST_OPCODE + self.index() as u8
    }

    /// Size in bytes of one record of this type.
    pub fn record_size(self) -> usize {
        RECORD_SIZES[self.index()]
    }

    pub fn struct_name(self) -> &'static str {
        STRUCT_NAMES[self.index()]
    }

    /// Rotation precision of the quaternion layouts, `None` for the matrix layouts.
    pub fn precision(self) -> Option<Precision> {
        use TransformType::*;
        match self {
            Matrix | MatrixByte => None,
            QuatByte | QuatScaleByte => Some(Precision::Byte),
            Quat | QuatScale => Some(Precision::Short),
        }
    }

    /// The quaternion layout with the given precision, with or without a scale.
    pub fn for_precision(precision: Precision, scaled: bool) -> Self {
        match (precision, scaled) {
            (Precision::Byte, false) => TransformType::QuatByte,
            (Precision::Short, false) => TransformType::Quat,
            (Precision::Byte, true) => TransformType::QuatScaleByte,
            (Precision::Short, true) => TransformType::QuatScale,
        }
    }

    pub fn supports_scale(self) -> bool {
        matches!(self, TransformType::QuatScaleByte | TransformType::QuatScale)
    }

    pub fn supports_interpolation(self) -> bool {
        self.precision().is_some()
    }

    /// Whether interpolation snaps to the nearest keyframe instead of blending rotations.
    pub fn snaps_on_interpolation(self) -> bool {
        self == TransformType::QuatScaleByte
    }

    /// Reads the transform type out of an animated MOF signature such as `"\03ax"`.
    ///
    /// The first byte must be a [`SignatureMarker`].
    pub fn from_signature(signature: &[u8]) -> Result<Self> {
        match signature {
            [marker, opcode, a, x, ..]
                if SignatureMarker::from_byte(*marker).is_some()
                    && [*a, *x] == *SIGNATURE_SUFFIX =>
            {
                Self::from_opcode(*opcode)
            }
            _ => Err(Error::InvalidSignature(signature.iter().take(4).copied().collect())),
        }
    }

    pub fn signature(self, marker: SignatureMarker) -> [u8; 4] {
        [marker.byte(), self.opcode(), SIGNATURE_SUFFIX[0], SIGNATURE_SUFFIX[1]]
    }
}

/// First byte of an animated MOF signature.
///
/// Frogger writes `'0'` when cels do not start at frame zero, MediEvil and Beast Wars write
/// `'\0'`, which is also what builds predating the flag use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureMarker {
    /// `'\0'`
    Unflagged,
    /// `'0'`
    NotAtFrameZero,
    /// `'1'`
    StartAtFrameZero,
}

impl SignatureMarker {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'\0' => Some(SignatureMarker::Unflagged),
            b'0' => Some(SignatureMarker::NotAtFrameZero),
            b'1' => Some(SignatureMarker::StartAtFrameZero),
            _ => None,
        }
    }

    pub fn byte(self) -> u8 {
        match self {
            SignatureMarker::Unflagged => b'\0',
            SignatureMarker::NotAtFrameZero => b'0',
            SignatureMarker::StartAtFrameZero => b'1',
        }
    }

    pub fn starts_at_frame_zero(self) -> bool {
        self == SignatureMarker::StartAtFrameZero
    }
}

impl fmt::Display for TransformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.struct_name())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn opcodes() {
        for (i, kind) in TransformType::ALL.iter().enumerate() {
            assert_eq!(kind.opcode(), 0x30 + i as u8);
            assert_eq!(TransformType::from_opcode(kind.opcode()).unwrap(), *kind);
        }
        assert_eq!(TransformType::from_opcode(0x33).unwrap(), TransformType::Quat);
    }

    #[test]
    fn unknown_opcodes() {
        for opcode in [0x00, 0x2F, 0x36, 0x39, 0xFF].iter() {
            match TransformType::from_opcode(*opcode) {
                Err(Error::UnrecognizedTransformType(b)) => assert_eq!(b, *opcode),
                other => panic!("{:#x} gave {:?}", opcode, other),
            }
        }
    }

    #[test]
    fn capabilities() {
        use TransformType::*;
        assert!(!Matrix.supports_interpolation());
        assert!(!MatrixByte.supports_interpolation());
        assert!(QuatByte.supports_interpolation());
        assert!(QuatScaleByte.snaps_on_interpolation());
        assert!(!QuatScale.snaps_on_interpolation());
        assert!(QuatScale.supports_scale() && !Quat.supports_scale());
        assert_eq!(QuatScaleByte.precision(), Some(Precision::Byte));
        assert_eq!(Quat.precision(), Some(Precision::Short));
        let sizes: Vec<_> = TransformType::ALL.iter().map(|k| k.record_size()).collect();
        assert_eq!(sizes, [24, 16, 10, 14, 15, 19]);
    }

    #[test]
    fn signatures() {
        assert_eq!(TransformType::from_signature(b"\x003ax").unwrap(), TransformType::Quat);
        assert_eq!(TransformType::from_signature(b"12ax").unwrap(), TransformType::QuatByte);
        assert_eq!(TransformType::from_signature(b"05axtra").unwrap(), TransformType::QuatScale);
        assert!(matches!(
            TransformType::from_signature(b"\x009ax"),
            Err(Error::UnrecognizedTransformType(b'9'))
        ));
        assert!(matches!(
            TransformType::from_signature(b"23ax"),
            Err(Error::InvalidSignature(_))
        ));
        assert!(matches!(TransformType::from_signature(b"1"), Err(Error::InvalidSignature(_))));
        let signature = TransformType::QuatScaleByte.signature(SignatureMarker::StartAtFrameZero);
        assert_eq!(&signature, b"14ax");
        assert_eq!(TransformType::from_signature(&signature).unwrap(), TransformType::QuatScaleByte);
    }

    #[test]
    fn signature_markers() {
        assert_eq!(TransformType::Quat.signature(SignatureMarker::NotAtFrameZero), *b"03ax");
        assert_eq!(TransformType::Quat.signature(SignatureMarker::Unflagged), *b"\x003ax");
        for marker in [
            SignatureMarker::Unflagged,
            SignatureMarker::NotAtFrameZero,
            SignatureMarker::StartAtFrameZero,
        ]
        .iter()
        {
            assert_eq!(SignatureMarker::from_byte(marker.byte()), Some(*marker));
            let signature = TransformType::MatrixByte.signature(*marker);
            assert_eq!(TransformType::from_signature(&signature).unwrap(), TransformType::MatrixByte);
        }
        assert!(SignatureMarker::StartAtFrameZero.starts_at_frame_zero());
        assert!(!SignatureMarker::NotAtFrameZero.starts_at_frame_zero());
        assert_eq!(SignatureMarker::from_byte(b'2'), None);
    }
}
