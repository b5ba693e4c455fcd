//! The packed transform array of an animated MOF.
//!
//! All keyframes of a file share one layout and are stored back to back. Animation cels refer
//! to them by index.

use cookie_factory::multi::all;
use cookie_factory::{gen_simple, WriteContext};
use log::debug;

use crate::error::{Error, Result};
use crate::interpolate::interpolate;
use crate::kind::TransformType;
use crate::matrix::MatrixTransform;
use crate::transform::TransformVariant;
use crate::write::SerializeRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformTable {
    pub kind: TransformType,
    pub transforms: Vec<TransformVariant>,
}

impl TransformTable {
    pub fn new(kind: TransformType) -> Self {
        Self {
            kind,
            transforms: vec![],
        }
    }

    /// Decodes `count` consecutive records, returning the unconsumed input.
    ///
    /// Fails with [`Error::ShortRead`] as soon as a record is truncated.
    pub fn parse(i: &[u8], kind: TransformType, count: usize) -> Result<(&[u8], Self)> {
        // Never reserve more than the input can hold.
        let mut transforms = Vec::with_capacity(count.min(i.len() / kind.record_size()));
        let mut i = i;
        for _ in 0..count {
            let (rest, transform) = kind.read(i)?;
            transforms.push(transform);
            i = rest;
        }
        debug!("read {} {} transform(s)", transforms.len(), kind);
        Ok((i, Self { kind, transforms }))
    }

    /// Appends a keyframe. Keyframes of another layout are rejected.
    pub fn push(&mut self, transform: TransformVariant) -> Result<usize> {
        if transform.kind() != self.kind {
            return Err(Error::TypeMismatch {
                prev: self.kind,
                next: transform.kind(),
            });
        }
        self.transforms.push(transform);
        Ok(self.transforms.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&TransformVariant> {
        self.transforms.get(id)
    }

    /// Re-encodes every record in order.
    pub fn write(&self) -> Result<Vec<u8>> {
        let capacity = self.kind.record_size() * self.transforms.len();
        let records = all(
            self.transforms
                .iter()
                .map(|t| move |out: WriteContext<Vec<u8>>| t.serialize(out)),
        );
        gen_simple(records, Vec::with_capacity(capacity))
            .map_err(|e| Error::Serialize(format!("{:?}", e)))
    }

    /// The matrix of transform `id` on its own.
    pub fn matrix(&self, id: usize) -> Option<MatrixTransform> {
        self.get(id).map(TransformVariant::to_matrix)
    }

    pub fn interpolate(&self, prev_id: usize, next_id: usize, t: u16) -> Result<MatrixTransform> {
        let prev = self.get(prev_id).ok_or(Error::MissingTransform(prev_id))?;
        let next = self.get(next_id).ok_or(Error::MissingTransform(next_id))?;
        interpolate(prev, next, t)
    }
}
