//! Signed polyline codec.
//!
//! Each coordinate is stored as a latitude delta followed by a longitude
//! delta against the previous coordinate, in units of 1e-5 degrees. A delta is
//! zig-zag encoded and split into 5-bit chunks (least significant first); every
//! chunk but the last carries the 0x20 continuation bit, and each chunk is
//! offset by 63 to land in printable ASCII.

use thiserror::Error;

use crate::Coordinate;

const PRECISION: f64 = 1e-5;
const FACTOR: f64 = 1e5;
const OFFSET: u8 = 63;
const MAX_CHUNK: u8 = OFFSET + 63;
const CONTINUATION: u64 = 0x20;
const CHUNK_MASK: u64 = 0x1f;
/// 12 chunks carry 60 bits, which keeps the zig-zag magnitude inside `i64`.
const MAX_GROUP_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("truncated encoding: group starting at byte {offset} has no terminating character")]
    Truncated { offset: usize },
    #[error("invalid byte 0x{byte:02x} at offset {offset}")]
    InvalidByte { offset: usize, byte: u8 },
    #[error("value starting at byte {offset} does not fit in 64 bits")]
    Overflow { offset: usize },
}

/// Decode an encoded path into coordinates, in encoding order.
///
/// Deltas are cumulative over the whole input, so two encodings glued
/// together decode relative to the running total of the first one.
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut path = Vec::with_capacity(bytes.len() / 4);
    let mut cursor = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while cursor < bytes.len() {
        let start = cursor;
        let dlat = read_delta(bytes, &mut cursor)?;
        lat = lat
            .checked_add(dlat)
            .ok_or(PolylineError::Overflow { offset: start })?;

        let start = cursor;
        let dlng = read_delta(bytes, &mut cursor)?;
        lng = lng
            .checked_add(dlng)
            .ok_or(PolylineError::Overflow { offset: start })?;

        path.push(Coordinate {
            lat: lat as f64 * PRECISION,
            lng: lng as f64 * PRECISION,
        });
    }

    Ok(path)
}

/// Encode coordinates, rounding each value to the nearest 1e-5 degree.
///
/// Coordinates are expected to be finite.
pub fn encode(path: &[Coordinate]) -> String {
    let mut out = String::with_capacity(path.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for coord in path {
        let lat = to_fixed(coord.lat);
        let lng = to_fixed(coord.lng);
        write_delta(&mut out, lat.wrapping_sub(prev_lat));
        write_delta(&mut out, lng.wrapping_sub(prev_lng));
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

/// Reads one group starting at `cursor` and leaves `cursor` on the byte after
/// its terminating chunk.
fn read_delta(bytes: &[u8], cursor: &mut usize) -> Result<i64, PolylineError> {
    let start = *cursor;
    let mut result: u64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*cursor) else {
            return Err(PolylineError::Truncated { offset: start });
        };
        if !(OFFSET..=MAX_CHUNK).contains(&byte) {
            return Err(PolylineError::InvalidByte {
                offset: *cursor,
                byte,
            });
        }
        if *cursor - start == MAX_GROUP_LEN {
            return Err(PolylineError::Overflow { offset: start });
        }

        let chunk = u64::from(byte - OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;
        *cursor += 1;

        if chunk < CONTINUATION {
            break;
        }
    }

    let magnitude = (result >> 1) as i64;
    Ok(if result & 1 == 1 { !magnitude } else { magnitude })
}

fn write_delta(out: &mut String, delta: i64) {
    let mut value = ((delta << 1) ^ (delta >> 63)) as u64;
    while value >= CONTINUATION {
        out.push(char::from((CONTINUATION | (value & CHUNK_MASK)) as u8 + OFFSET));
        value >>= 5;
    }
    out.push(char::from(value as u8 + OFFSET));
}

fn to_fixed(value: f64) -> i64 {
    (value * FACTOR).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn assert_close(actual: &[Coordinate], expected: &[(f64, f64)]) {
        assert_eq!(actual.len(), expected.len(), "path length: {actual:?}");
        for (coord, &(lat, lng)) in actual.iter().zip(expected) {
            assert!((coord.lat - lat).abs() < 1e-9, "lat {} != {lat}", coord.lat);
            assert!((coord.lng - lng).abs() < 1e-9, "lng {} != {lng}", coord.lng);
        }
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode(""), Ok(Vec::new()));
    }

    #[test]
    fn test_decode_reference_two_points() {
        let path = decode("_p~iF~ps|U_ulLnnqC").unwrap();
        assert_close(&path, &[(38.5, -120.2), (40.7, -120.95)]);
    }

    #[test]
    fn test_decode_reference_full() {
        let path = decode(REFERENCE).unwrap();
        assert_close(
            &path,
            &[(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)],
        );
    }

    #[test]
    fn test_decode_origin() {
        assert_eq!(decode("??"), Ok(vec![Coordinate { lat: 0.0, lng: 0.0 }]));
    }

    #[test]
    fn test_decode_is_deterministic() {
        assert_eq!(decode(REFERENCE), decode(REFERENCE));
    }

    #[test]
    fn test_decode_concatenation_is_cumulative() {
        let path = decode("_p~iF~ps|U_p~iF~ps|U").unwrap();
        assert_close(&path, &[(38.5, -120.2), (77.0, -240.4)]);
    }

    #[test]
    fn test_decode_single_incomplete_group() {
        assert_eq!(decode("_"), Err(PolylineError::Truncated { offset: 0 }));
        assert_eq!(decode("_p~i"), Err(PolylineError::Truncated { offset: 0 }));
    }

    #[test]
    fn test_decode_latitude_without_longitude() {
        assert_eq!(decode("_p~iF"), Err(PolylineError::Truncated { offset: 5 }));
    }

    #[test]
    fn test_decode_truncated_second_coordinate() {
        assert_eq!(
            decode("_p~iF~ps|U_ulL"),
            Err(PolylineError::Truncated { offset: 14 })
        );
    }

    #[test]
    fn test_decode_rejects_bytes_below_alphabet() {
        assert_eq!(
            decode("_p~iF ps|U"),
            Err(PolylineError::InvalidByte {
                offset: 5,
                byte: b' '
            })
        );
    }

    #[test]
    fn test_decode_rejects_non_ascii() {
        let err = decode("é?").unwrap_err();
        assert!(matches!(err, PolylineError::InvalidByte { offset: 0, .. }));
    }

    #[test]
    fn test_decode_rejects_overlong_group() {
        let input = "~".repeat(13) + "?";
        assert_eq!(decode(&input), Err(PolylineError::Overflow { offset: 0 }));
    }

    #[test]
    fn test_encode_reference() {
        let path = [
            Coordinate { lat: 38.5, lng: -120.2 },
            Coordinate { lat: 40.7, lng: -120.95 },
            Coordinate { lat: 43.252, lng: -126.453 },
        ];
        assert_eq!(encode(&path), REFERENCE);
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&[]), "");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn fixed_coord() -> impl Strategy<Value = Coordinate> {
            (-9_000_000i64..=9_000_000, -18_000_000i64..=18_000_000).prop_map(|(lat, lng)| {
                Coordinate {
                    lat: lat as f64 * PRECISION,
                    lng: lng as f64 * PRECISION,
                }
            })
        }

        proptest! {
            #[test]
            fn prop_round_trip_within_precision(
                path in prop::collection::vec(fixed_coord(), 0..20)
            ) {
                let decoded = decode(&encode(&path)).unwrap();
                prop_assert_eq!(decoded.len(), path.len());
                for (a, b) in decoded.iter().zip(&path) {
                    prop_assert!((a.lat - b.lat).abs() < PRECISION / 2.0);
                    prop_assert!((a.lng - b.lng).abs() < PRECISION / 2.0);
                }
            }

            #[test]
            fn prop_encoding_stays_in_alphabet(
                path in prop::collection::vec(fixed_coord(), 0..20)
            ) {
                let encoded = encode(&path);
                prop_assert!(encoded.bytes().all(|b| (OFFSET..=MAX_CHUNK).contains(&b)));
            }

            #[test]
            fn prop_decode_never_panics(input in "[ -~]{0,40}") {
                let _ = decode(&input);
            }
        }
    }
}
