use crate::kind::TransformType;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unrecognized transform type opcode {0:#04x}")]
    UnrecognizedTransformType(u8),
    #[error("short read for {kind}: needed {needed} byte(s), {available} available")]
    ShortRead {
        kind: TransformType,
        needed: usize,
        available: usize,
    },
    #[error("{operation} is unsupported for {kind}")]
    UnsupportedOperation {
        kind: TransformType,
        operation: &'static str,
    },
    #[error("cannot interpolate between {prev} and {next}")]
    TypeMismatch {
        prev: TransformType,
        next: TransformType,
    },
    #[error("invalid animated MOF signature {0:?}")]
    InvalidSignature(Vec<u8>),
    #[error("no transform with id {0}")]
    MissingTransform(usize),
    #[error("failed to serialize transform: {0}")]
    Serialize(String),
}
