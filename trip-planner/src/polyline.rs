//! Encoded polyline codec.
//!
//! Route geometry arrives as a compact ASCII string: each coordinate is
//! stored as a latitude delta then a longitude delta from the previous
//! point, in units of 1e-5 degrees. Every delta is zig-zag encoded and
//! split into 5-bit groups, low bits first; each group is offset by 63 to
//! make it printable, and `0x20` marks that another group follows.

use crate::domain::LatLng;

/// Fixed-point scale of encoded coordinates.
const PRECISION: f64 = 1e5;

/// Offset added to every 6-bit group to make it printable.
const CHAR_OFFSET: u8 = 63;

/// Continuation flag within a 6-bit group.
const CONTINUATION: i64 = 0x20;

/// Payload bits within a 6-bit group.
const PAYLOAD_MASK: i64 = 0x1f;

/// Largest shift at which a group may start. Seven groups carry 35 bits,
/// enough for any 32-bit delta.
const MAX_SHIFT: u32 = 30;

/// Error from decoding a malformed polyline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Input ended in the middle of a value or between a latitude and
    /// its longitude
    #[error("polyline truncated at byte {offset}")]
    Truncated { offset: usize },

    /// Byte outside the printable range used by the encoding
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte { offset: usize, byte: u8 },

    /// A value continued past the width of a 32-bit delta
    #[error("polyline value starting at byte {offset} overflows")]
    Overflow { offset: usize },
}

/// Decode an encoded polyline into coordinates.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::LatLng;
/// use trip_planner::polyline::decode;
///
/// let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
/// assert_eq!(
///     points,
///     vec![
///         LatLng::new(38.5, -120.2),
///         LatLng::new(40.7, -120.95),
///         LatLng::new(43.252, -126.453),
///     ]
/// );
/// ```
pub fn decode(encoded: &str) -> Result<Vec<LatLng>, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        lat += next_delta(bytes, &mut index)?;

        if index >= bytes.len() {
            return Err(DecodeError::Truncated { offset: index });
        }
        lng += next_delta(bytes, &mut index)?;

        points.push(LatLng::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    Ok(points)
}

/// Read one zig-zag encoded delta starting at `index`, advancing past it.
fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64, DecodeError> {
    let start = *index;
    let mut value: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(DecodeError::Truncated { offset: *index });
        };

        if !(CHAR_OFFSET..=b'~').contains(&byte) {
            return Err(DecodeError::InvalidByte {
                offset: *index,
                byte,
            });
        }

        if shift > MAX_SHIFT {
            return Err(DecodeError::Overflow { offset: start });
        }

        let group = i64::from(byte - CHAR_OFFSET);
        value |= (group & PAYLOAD_MASK) << shift;
        shift += 5;
        *index += 1;

        if group & CONTINUATION == 0 {
            break;
        }
    }

    Ok(if value & 1 != 0 {
        !(value >> 1)
    } else {
        value >> 1
    })
}

/// Encode coordinates as a polyline, rounding to 1e-5 degrees.
///
/// Inverse of [`decode`] for coordinates already at that precision.
pub fn encode(points: &[LatLng]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = (point.lat * PRECISION).round() as i64;
        let lng = (point.lng * PRECISION).round() as i64;

        push_delta(lat - prev_lat, &mut out);
        push_delta(lng - prev_lng, &mut out);

        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn push_delta(delta: i64, out: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };

    while value >= CONTINUATION {
        let group = (CONTINUATION | (value & PAYLOAD_MASK)) as u8;
        out.push(char::from(group + CHAR_OFFSET));
        value >>= 5;
    }
    out.push(char::from(value as u8 + CHAR_OFFSET));
}
