//! Codec for compact ASCII route geometries.
//!
//! Implements the standard polyline algorithm: coordinates are scaled to
//! five decimal places, delta-encoded against the previous point, zig-zag
//! mapped to unsigned, and emitted as base-32 chunks offset into printable
//! ASCII. Decoding is strict: malformed input yields a [`PolylineError`],
//! never a panic and never a silently dropped point.

use thiserror::Error;

use crate::geo::GeoPoint;

/// Fixed-point scale giving five decimal places (~1.1 m of precision).
const SCALE: f64 = 100_000.0;

/// Offset added to every emitted chunk to land in printable ASCII.
const CHUNK_OFFSET: u8 = 63;

/// Highest byte value a chunk can encode to (`63 + 0x3f`).
const MAX_ENCODED_BYTE: u8 = 126;

/// Chunk bit signalling that more chunks follow for the current value.
const CONTINUATION_BIT: i64 = 0x20;

/// Shift cap: seven 5-bit chunks cover any in-range coordinate delta.
const MAX_VALUE_SHIFT: u32 = 35;

/// Decoding failure, positioned at the offending byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("invalid polyline byte {byte:#04x} at offset {position}")]
    InvalidByte { byte: u8, position: usize },
    #[error("polyline truncated at offset {position}")]
    Truncated { position: usize },
    #[error("polyline value overflow at offset {position}")]
    Overflow { position: usize },
}

/// Decodes an encoded geometry into its coordinate sequence.
///
/// The empty string decodes to an empty sequence. Points are emitted in
/// encounter order, one per (latitude, longitude) delta pair.
pub fn decode(encoded: &str) -> Result<Vec<GeoPoint>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        let (delta, next) = decode_value(bytes, index)?;
        lat += delta;
        let (delta, next) = decode_value(bytes, next)?;
        lng += delta;
        index = next;

        points.push(GeoPoint::new(lat as f64 / SCALE, lng as f64 / SCALE));
    }

    Ok(points)
}

/// Encodes a coordinate sequence into the compact geometry string.
///
/// Inverse of [`decode`] for coordinates with at most five decimal places;
/// the first point is delta-encoded against (0, 0).
pub fn encode(points: &[GeoPoint]) -> String {
    let mut output = String::new();
    let mut previous = (0_i64, 0_i64);

    for point in points {
        let current = (scale(point.latitude), scale(point.longitude));
        encode_value(current.0 - previous.0, &mut output);
        encode_value(current.1 - previous.1, &mut output);
        previous = current;
    }

    output
}

/// Reads one varint-encoded delta starting at `start`, returning the delta
/// and the offset of the next unread byte.
fn decode_value(bytes: &[u8], start: usize) -> Result<(i64, usize), PolylineError> {
    let mut value: i64 = 0;
    let mut shift: u32 = 0;
    let mut index = start;

    loop {
        let Some(&byte) = bytes.get(index) else {
            return Err(PolylineError::Truncated { position: index });
        };
        if !(CHUNK_OFFSET..=MAX_ENCODED_BYTE).contains(&byte) {
            return Err(PolylineError::InvalidByte {
                byte,
                position: index,
            });
        }
        if shift >= MAX_VALUE_SHIFT {
            return Err(PolylineError::Overflow { position: index });
        }

        let chunk = i64::from(byte - CHUNK_OFFSET);
        value |= (chunk & 0x1f) << shift;
        shift += 5;
        index += 1;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    // Zig-zag: odd values are negated one's complements.
    let delta = if value & 1 != 0 {
        !(value >> 1)
    } else {
        value >> 1
    };

    Ok((delta, index))
}

fn scale(degrees: f64) -> i64 {
    (degrees * SCALE).round() as i64
}

fn encode_value(delta: i64, output: &mut String) {
    let mut value = delta << 1;
    if delta < 0 {
        value = !value;
    }

    while value >= CONTINUATION_BIT {
        let chunk = (CONTINUATION_BIT | (value & 0x1f)) + i64::from(CHUNK_OFFSET);
        output.push(chunk as u8 as char);
        value >>= 5;
    }
    output.push((value + i64::from(CHUNK_OFFSET)) as u8 as char);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Canonical public test vector for the polyline algorithm.
    const CANONICAL: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn canonical_points() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(38.5, -120.2),
            GeoPoint::new(40.7, -120.95),
            GeoPoint::new(43.252, -126.453),
        ]
    }

    #[test]
    fn test_decode_canonical_vector() {
        let points = decode(CANONICAL).unwrap();
        let expected = canonical_points();

        assert_eq!(points.len(), expected.len());
        for (point, expected) in points.iter().zip(&expected) {
            assert!((point.latitude - expected.latitude).abs() < 1e-9);
            assert!((point.longitude - expected.longitude).abs() < 1e-9);
        }
    }

    #[test]
    fn test_encode_canonical_vector() {
        assert_eq!(encode(&canonical_points()), CANONICAL);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_single_point() {
        let points = decode("_p~iF~ps|U").unwrap();
        assert_eq!(points.len(), 1);
        assert!((points[0].latitude - 38.5).abs() < 1e-9);
        assert!((points[0].longitude + 120.2).abs() < 1e-9);
    }

    #[test]
    fn test_decode_deterministic() {
        assert_eq!(decode(CANONICAL).unwrap(), decode(CANONICAL).unwrap());
    }

    #[test]
    fn test_round_trip() {
        let points = vec![
            GeoPoint::new(41.06554, 28.99837),
            GeoPoint::new(41.06601, 28.99805),
            GeoPoint::new(41.06555, 28.99681),
            GeoPoint::new(-33.86882, 151.20930),
            GeoPoint::new(0.0, 0.0),
        ];
        assert_eq!(decode(&encode(&points)).unwrap(), points);
    }

    #[test]
    fn test_round_trip_negative_deltas() {
        let points = vec![
            GeoPoint::new(-0.00001, 0.00001),
            GeoPoint::new(-0.00002, -0.00003),
        ];
        assert_eq!(decode(&encode(&points)).unwrap(), points);
    }

    #[test]
    fn test_truncated_mid_value() {
        // '~' keeps the continuation bit set, so the value never terminates.
        let err = decode("_p~").unwrap_err();
        assert_eq!(err, PolylineError::Truncated { position: 3 });
    }

    #[test]
    fn test_missing_longitude() {
        // A complete latitude with nothing after it.
        let err = decode("_p~iF").unwrap_err();
        assert_eq!(err, PolylineError::Truncated { position: 5 });
    }

    #[test]
    fn test_invalid_byte() {
        let err = decode("_p~iF!").unwrap_err();
        assert_eq!(
            err,
            PolylineError::InvalidByte {
                byte: b'!',
                position: 5
            }
        );
    }

    #[test]
    fn test_value_overflow() {
        // Eight continuation chunks exceed any in-range coordinate delta.
        let err = decode("~~~~~~~~A").unwrap_err();
        assert_eq!(err, PolylineError::Overflow { position: 7 });
    }

    #[test]
    fn test_error_display_carries_offset() {
        let message = PolylineError::Truncated { position: 12 }.to_string();
        assert!(message.contains("12"));
    }
}
