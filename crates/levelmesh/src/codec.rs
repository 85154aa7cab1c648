//! Binary encoding of points and polygon outlines
//!
//! Fixed little-endian layout used for persistence and as the round-trip
//! oracle in tests. A point is `[x:f32][y:f32]`, 8 bytes, no header. A
//! ring is a single version byte, a `u32` point count, then that many
//! point encodings. Decoding never reads past the buffer: a ring that is
//! truncated mid-stream yields the points that were fully present.

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use glam::Vec2;

use levelmesh_common::{Error, Result, Ring};

/// Current ring encoding version, written as the leading byte.
pub const RING_CODEC_VERSION: u8 = 1;

/// Encodes a point as two little-endian `f32`s.
pub fn encode_point<W: Write>(point: Vec2, writer: &mut W) -> Result<()> {
    writer.write_f32::<LittleEndian>(point.x)?;
    writer.write_f32::<LittleEndian>(point.y)?;
    Ok(())
}

/// Decodes a point from the front of `bytes`.
pub fn decode_point(bytes: &[u8]) -> Result<Vec2> {
    let mut cursor = std::io::Cursor::new(bytes);
    let x = cursor.read_f32::<LittleEndian>()?;
    let y = cursor.read_f32::<LittleEndian>()?;
    Ok(Vec2::new(x, y))
}

/// Encodes a ring as `[version:u8][count:u32][count * point]`.
pub fn encode_ring<W: Write>(ring: &Ring, writer: &mut W) -> Result<()> {
    writer.write_u8(RING_CODEC_VERSION)?;
    writer.write_u32::<LittleEndian>(ring.len() as u32)?;
    for &point in ring.points() {
        encode_point(point, writer)?;
    }
    Ok(())
}

/// Decodes a ring, returning however many whole points the buffer holds
/// when it is shorter than its declared count.
///
/// An unknown version byte is rejected outright.
pub fn decode_ring(bytes: &[u8]) -> Result<Ring> {
    let mut cursor = std::io::Cursor::new(bytes);

    let version = cursor.read_u8()?;
    if version != RING_CODEC_VERSION {
        return Err(Error::InvalidGeometry(format!(
            "unsupported ring encoding version {version}"
        )));
    }

    let declared = cursor.read_u32::<LittleEndian>()? as usize;
    // Cap the allocation by what the buffer can actually hold
    let available = bytes.len().saturating_sub(5) / 8;
    let mut points = Vec::with_capacity(declared.min(available));

    for _ in 0..declared {
        let Ok(x) = cursor.read_f32::<LittleEndian>() else {
            break;
        };
        let Ok(y) = cursor.read_f32::<LittleEndian>() else {
            break;
        };
        points.push(Vec2::new(x, y));
    }

    if points.len() < declared {
        log::debug!(
            "ring buffer truncated: {} of {} declared points decoded",
            points.len(),
            declared
        );
    }

    Ok(Ring::new(points))
}

/// Decodes consecutive rings from a buffer until it is exhausted.
///
/// A ring cut short by the end of the buffer yields the points that were
/// present and ends the stream; bytes after a short ring are never
/// interpreted as a new header. An unknown version byte anywhere fails
/// the whole decode.
pub fn decode_ring_stream(bytes: &[u8]) -> Result<Vec<Ring>> {
    let mut rings = Vec::new();
    let mut offset = 0;

    while offset < bytes.len() {
        if offset + 5 > bytes.len() {
            log::debug!(
                "{} trailing bytes after the last whole ring",
                bytes.len() - offset
            );
            break;
        }
        let declared = LittleEndian::read_u32(&bytes[offset + 1..offset + 5]) as usize;
        let ring = decode_ring(&bytes[offset..])?;
        let short = ring.len() < declared;
        offset += 5 + ring.len() * 8;
        rings.push(ring);
        if short {
            break;
        }
    }

    Ok(rings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f32, f32)]) -> Ring {
        Ring::new(points.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
    }

    #[test]
    fn test_point_layout_is_two_le_floats() {
        let mut buf = Vec::new();
        encode_point(Vec2::new(1.5, -2.25), &mut buf).unwrap();
        assert_eq!(buf.len(), 8);
        assert_eq!(&buf[..4], &1.5f32.to_le_bytes());
        assert_eq!(&buf[4..], &(-2.25f32).to_le_bytes());
    }

    #[test]
    fn test_point_round_trip_is_exact() {
        for p in [
            Vec2::new(0.0, 0.0),
            Vec2::new(-123.456, 789.0625),
            Vec2::new(f32::MAX, f32::MIN_POSITIVE),
        ] {
            let mut buf = Vec::new();
            encode_point(p, &mut buf).unwrap();
            assert_eq!(decode_point(&buf).unwrap(), p);
        }
    }

    #[test]
    fn test_ring_round_trip_is_exact() {
        let original = ring(&[(0.0, 0.0), (10.5, 0.25), (10.0, 10.0), (-0.125, 9.75)]);
        let mut buf = Vec::new();
        encode_ring(&original, &mut buf).unwrap();
        assert_eq!(buf.len(), 1 + 4 + 4 * 8);
        assert_eq!(decode_ring(&buf).unwrap(), original);
    }

    #[test]
    fn test_empty_ring_round_trip() {
        let empty = ring(&[]);
        let mut buf = Vec::new();
        encode_ring(&empty, &mut buf).unwrap();
        assert_eq!(buf.len(), 5);
        assert_eq!(decode_ring(&buf).unwrap(), empty);
    }

    #[test]
    fn test_points_extracted_from_ring_round_trip() {
        let original = ring(&[(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)]);
        let mut buf = Vec::new();
        encode_ring(&original, &mut buf).unwrap();

        // Each point's 8 bytes decode independently of the ring header
        for (i, &p) in original.points().iter().enumerate() {
            let start = 5 + i * 8;
            assert_eq!(decode_point(&buf[start..start + 8]).unwrap(), p);
        }
    }

    #[test]
    fn test_truncated_ring_decodes_partially() {
        let original = ring(&[(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)]);
        let mut buf = Vec::new();
        encode_ring(&original, &mut buf).unwrap();

        // Cut mid-way through the third point
        buf.truncate(5 + 2 * 8 + 3);
        let partial = decode_ring(&buf).unwrap();
        assert_eq!(partial.len(), 2);
        assert_eq!(partial.points()[0], Vec2::new(1.0, 2.0));
        assert_eq!(partial.points()[1], Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let original = ring(&[(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)]);
        let mut buf = Vec::new();
        encode_ring(&original, &mut buf).unwrap();
        buf[0] = 7;
        assert!(decode_ring(&buf).is_err());
    }

    #[test]
    fn test_short_point_buffer_fails() {
        assert!(decode_point(&[0u8; 7]).is_err());
    }

    #[test]
    fn test_ring_stream_round_trip() {
        let a = ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
        let b = ring(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)]);
        let mut buf = Vec::new();
        encode_ring(&a, &mut buf).unwrap();
        encode_ring(&b, &mut buf).unwrap();
        assert_eq!(decode_ring_stream(&buf).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_ring_stream_truncated_ring_ends_stream() {
        // A short final ring must not leave the cursor mid-point where
        // the next iteration would misread a header
        let a = ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
        let b = ring(&[(1.0, 1.0), (2.0, 1.0)]);
        let mut buf = Vec::new();
        encode_ring(&a, &mut buf).unwrap();
        encode_ring(&b, &mut buf).unwrap();

        // Cut into the second ring's last point
        buf.truncate(buf.len() - 4);
        let rings = decode_ring_stream(&buf).unwrap();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0], a);
        assert_eq!(rings[1].len(), 1);
        assert_eq!(rings[1].points()[0], Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_ring_stream_bad_version_mid_stream_fails() {
        let a = ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
        let mut buf = Vec::new();
        encode_ring(&a, &mut buf).unwrap();
        let second_header = buf.len();
        encode_ring(&a, &mut buf).unwrap();
        buf[second_header] = 9;
        assert!(decode_ring_stream(&buf).is_err());
    }
}
