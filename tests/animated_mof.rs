use anyhow::{Context, Result};
use mr_transform::transform::QuatScaleKeyframe;
use mr_transform::*;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A signature followed by a packed transform array, as an animated MOF lays them out.
fn animated_mof(kind: TransformType, records: &[TransformVariant]) -> Result<Vec<u8>> {
    let mut out = kind.signature(SignatureMarker::StartAtFrameZero).to_vec();
    for record in records {
        out.extend(encode(record)?);
    }
    Ok(out)
}

#[test]
fn scaled_animation_end_to_end() -> Result<()> {
    init();
    let frames = vec![
        TransformVariant::QuatScale(QuatScaleKeyframe::new(QuatS::identity(), [0, 0, 0])),
        TransformVariant::QuatScale(
            QuatScaleKeyframe::new(QuatS::new(2896, 0, 2896, 0), [100, 0, -40])
                .with_scale([64, 32, 32]),
        ),
    ];
    let file = animated_mof(TransformType::QuatScale, &frames)?;

    let kind = TransformType::from_signature(&file)?;
    assert_eq!(kind, TransformType::QuatScale);
    let (rest, table) = TransformTable::parse(&file[4..], kind, 2).context("table")?;
    assert!(rest.is_empty());
    assert_eq!(table.transforms, frames);
    assert_eq!(table.write()?, &file[4..]);

    let halfway = table.interpolate(0, 1, 0x800)?;
    assert_eq!(halfway.translation, [50, 0, -20]);
    assert_eq!(halfway.scale, Some([0x1800, 0x1000, 0x1000]));
    // The rotation is the halfway quaternion with the x column scaled by 1.5.
    let unscaled = slerp(&QuatS::identity(), &QuatS::new(2896, 0, 2896, 0), 0x800).to_matrix();
    assert_eq!(halfway.rotation, unscaled.scaled([0x1800, 0x1000, 0x1000]));

    let end = table.interpolate(0, 1, 0x1000)?;
    assert_eq!(end.scale, table.matrix(1).context("frame 1")?.scale);
    Ok(())
}

#[test]
fn every_layout_evaluates_identity() -> Result<()> {
    init();
    for kind in TransformType::ALL.iter() {
        let record = TransformVariant::from_matrix(*kind, &RotationMatrix::IDENTITY, [1, 2, 3]);
        let (_, decoded) = kind.read(&encode(&record)?)?;
        let m = decoded.to_matrix();
        assert_eq!(m.translation, [1, 2, 3]);
        // MR_MAT34B cannot represent 1.0, its largest cell is 127 << 5.
        let tolerance = if *kind == TransformType::MatrixByte { 32 } else { 0 };
        assert!(
            m.rotation.max_difference(&RotationMatrix::IDENTITY) <= tolerance,
            "{}:\n{}",
            kind,
            m.rotation
        );
        if kind.supports_interpolation() {
            assert_eq!(interpolate(&decoded, &decoded, 0x400)?.translation, [1, 2, 3]);
        } else {
            assert!(matches!(
                interpolate(&decoded, &decoded, 0x400),
                Err(Error::UnsupportedOperation { .. })
            ));
        }
    }
    Ok(())
}

#[test]
fn byte_scale_animation_snaps() -> Result<()> {
    init();
    let frames = [
        TransformVariant::from_matrix(TransformType::QuatScaleByte, &RotationMatrix::IDENTITY, [0; 3]),
        TransformVariant::from_matrix(
            TransformType::QuatScaleByte,
            &RotationMatrix([[0, 0, -0x1000], [0, 0x1000, 0], [0x1000, 0, 0]]),
            [64, 64, 64],
        ),
    ];
    let file = animated_mof(TransformType::QuatScaleByte, &frames)?;
    let (_, table) = TransformTable::parse(&file[4..], TransformType::from_signature(&file)?, 2)?;

    let before = table.interpolate(0, 1, 0x7FF)?;
    let after = table.interpolate(0, 1, 0x800)?;
    assert_eq!(before.rotation, frames[0].to_matrix().rotation);
    assert_eq!(after.rotation, frames[1].to_matrix().rotation);
    assert_eq!(before.translation, [31, 31, 31]);
    assert_eq!(after.translation, [32, 32, 32]);
    Ok(())
}

#[test]
fn cgmath_interop() -> Result<()> {
    use cgmath::{Deg, Quaternion, Rotation3};

    let q = QuatS::from_cgmath(&Quaternion::from_angle_z(Deg(90.0f32)));
    let record = TransformVariant::from_matrix(TransformType::Quat, &q.to_matrix(), [5, 0, 0]);
    let m = record.to_matrix().to_homogeneous();
    assert!((m.w.x - 5.0).abs() < f32::EPSILON);
    // Every column of a rotation stays unit length.
    for column in 0..3 {
        let c = m[column].truncate();
        let length = (c.x * c.x + c.y * c.y + c.z * c.z).sqrt();
        assert!((length - 1.0).abs() < 1e-2, "column {} has length {}", column, length);
    }
    Ok(())
}
