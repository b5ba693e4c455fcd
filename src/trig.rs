//! Fixed point trigonometry backed by the `rcossin_tbl` lookup table.
//!
//! Angles are 4096ths of a full turn. Only the low 12 bits of an angle select a table
//! entry, so any integer is a valid angle. Results use 12 fractional bits (4096 = 1.0).

use lazy_static::lazy_static;
use log::{debug, error};
use nom::multi::count;
use nom::number::complete::le_i16;
use nom::sequence::tuple;
use nom::IResult;

/// A 16-bit fixed point angle, 0x1000 is one full turn.
pub type FixedAngle = i16;

/// Number of entries in the table, one per angle step.
pub const ANGLE_STEPS: usize = 0x1000;
pub const ANGLE_MASK: i32 = 0xFFF;
/// Half a turn, the largest angle `acos_raw` can return.
pub const HALF_TURN: i32 = 0x800;

const RCOSSIN_TBL: &[u8; ANGLE_STEPS * 4] = include_bytes!("../assets/rcossin_tbl.bin");

pub struct TrigTable {
    sin: Vec<i16>,
    cos: Vec<i16>,
}

impl TrigTable {
    /// Parses `ANGLE_STEPS` interleaved `(sin, cos)` pairs.
    fn parse(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, pairs) = count(tuple((le_i16, le_i16)), ANGLE_STEPS)(i)?;
        let (sin, cos) = pairs.into_iter().unzip();
        Ok((i, Self { sin, cos }))
    }

    fn embedded() -> Self {
        match Self::parse(&RCOSSIN_TBL[..]) {
            Ok((_, table)) => {
                debug!("loaded rcossin_tbl with {} entries", table.sin.len());
                table
            }
            Err(_) => {
                error!("rcossin_tbl is truncated, every angle evaluates to zero");
                Self {
                    sin: vec![0; ANGLE_STEPS],
                    cos: vec![0; ANGLE_STEPS],
                }
            }
        }
    }

    pub fn rsin(&self, angle: i32) -> i16 {
        self.sin[(angle & ANGLE_MASK) as usize]
    }

    pub fn rcos(&self, angle: i32) -> i16 {
        self.cos[(angle & ANGLE_MASK) as usize]
    }

    /// Finds the angle in `[0, 0x800]` whose cosine is closest to `cos`.
    ///
    /// The cosine column decreases monotonically over the first half turn, so a binary
    /// search finds the first angle at or below the target and its predecessor is the
    /// only other candidate. Ties go to the smaller angle.
    pub fn acos_raw(&self, cos: i32) -> FixedAngle {
        let cos = cos.max(-0x1000).min(0x1000);
        let (mut lo, mut hi) = (0, HALF_TURN);
        while lo < hi {
            let mid = (lo + hi) / 2;
            if i32::from(self.rcos(mid)) <= cos {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }

        let distance = |angle: i32| (i32::from(self.rcos(angle)) - cos).abs();
        if lo > 0 && distance(lo - 1) <= distance(lo) {
            (lo - 1) as FixedAngle
        } else {
            lo as FixedAngle
        }
    }
}

lazy_static! {
    static ref TABLE: TrigTable = TrigTable::embedded();
}

/// The process wide table, decoded on first use.
pub fn table() -> &'static TrigTable {
    &TABLE
}

pub fn rsin(angle: i32) -> i16 {
    TABLE.rsin(angle)
}

pub fn rcos(angle: i32) -> i16 {
    TABLE.rcos(angle)
}

pub fn acos_raw(cos: i32) -> FixedAngle {
    TABLE.acos_raw(cos)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_embedded_table() {
        let (rest, table) = TrigTable::parse(&RCOSSIN_TBL[..]).unwrap();
        assert!(rest.is_empty());
        assert_eq!(table.sin.len(), ANGLE_STEPS);
        assert_eq!(table.rcos(0x400), rcos(0x400));
        assert!(TrigTable::parse(&RCOSSIN_TBL[..ANGLE_STEPS * 4 - 1]).is_err());
    }

    #[test]
    fn cardinal_angles() {
        assert_eq!(rcos(0), 0x1000);
        assert_eq!(rsin(0), 0);
        assert_eq!(rsin(0x400), 0x1000);
        assert_eq!(rcos(0x400), 0);
        assert_eq!(rcos(0x800), -0x1000);
        assert_eq!(rsin(0xC00), -0x1000);
    }

    #[test]
    fn angles_wrap() {
        assert_eq!(rcos(0x1000 + 0x123), rcos(0x123));
        assert_eq!(rsin(-0x400), rsin(0xC00));
        assert_eq!(rsin(0x7FFF_F400), rsin(0x400));
    }

    #[test]
    fn pythagorean_identity() {
        for angle in 0..ANGLE_STEPS as i32 {
            let s = i32::from(rsin(angle));
            let c = i32::from(rcos(angle));
            let error = (s * s + c * c - 0x1000 * 0x1000).abs();
            assert!(error <= 0x2000, "angle {:#x} is off by {}", angle, error);
        }
    }

    #[test]
    fn acos_inverts_cosine() {
        for angle in 0..=HALF_TURN {
            let cos = i32::from(rcos(angle));
            let found = i32::from(acos_raw(cos));
            assert_eq!(i32::from(rcos(found)), cos, "angle {:#x}", angle);
            assert!(found <= angle);
        }
    }

    #[test]
    fn acos_endpoints() {
        assert_eq!(acos_raw(0x1000), 0);
        assert_eq!(acos_raw(0), 0x400);
        assert_eq!(acos_raw(0x7FFF), 0);
        // The table rounds the last few steps before the half turn to -1.0 as well.
        let back = acos_raw(-0x1000);
        assert_eq!(rcos(i32::from(back)), -0x1000);
        assert!(back > 0x7E0 && back <= 0x800);
        assert_eq!(acos_raw(-0x7FFF), back);
    }

    #[test]
    fn acos_picks_closest_entry() {
        let cos = 3000;
        let found = i32::from(acos_raw(cos));
        let best = (0..=HALF_TURN)
            .map(|angle| (i32::from(rcos(angle)) - cos).abs())
            .min()
            .unwrap();
        assert_eq!((i32::from(rcos(found)) - cos).abs(), best);
    }

    #[test]
    fn concurrent_first_use() {
        let handles: Vec<_> = (0..8)
            .map(|i| std::thread::spawn(move || rcos(i * 0x100)))
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), rcos(i as i32 * 0x100));
        }
    }
}
