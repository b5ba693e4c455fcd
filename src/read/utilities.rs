use crate::matrix::Translation;
use crate::quat::Quat;

use nom::combinator::map;
use nom::number::complete::{le_i16, le_i8};
use nom::sequence::tuple;
use nom::IResult;

/// A little-endian integer a record is built out of.
pub(crate) trait Component: Sized {
    fn parse(i: &[u8]) -> IResult<&[u8], Self>;
}

impl Component for i8 {
    fn parse(i: &[u8]) -> IResult<&[u8], Self> {
        le_i8(i)
    }
}

impl Component for i16 {
    fn parse(i: &[u8]) -> IResult<&[u8], Self> {
        le_i16(i)
    }
}

pub(crate) fn triple<T: Component>(i: &[u8]) -> IResult<&[u8], [T; 3]> {
    map(tuple((T::parse, T::parse, T::parse)), |(x, y, z)| [x, y, z])(i)
}

pub(crate) fn translation(i: &[u8]) -> IResult<&[u8], Translation> {
    triple::<i16>(i)
}

/// Three rows of three cells.
pub(crate) fn matrix<T: Component>(i: &[u8]) -> IResult<&[u8], [[T; 3]; 3]> {
    map(
        tuple((triple::<T>, triple::<T>, triple::<T>)),
        |(a, b, c)| [a, b, c],
    )(i)
}

/// Components in `c, x, y, z` order.
pub(crate) fn quat<T: Component>(i: &[u8]) -> IResult<&[u8], Quat<T>> {
    map(
        tuple((T::parse, T::parse, T::parse, T::parse)),
        |(c, x, y, z)| Quat { c, x, y, z },
    )(i)
}
