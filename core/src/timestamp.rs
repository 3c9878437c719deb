//! Creation timestamps as the service emits them.
//!
//! # Design
//! The service stores timestamps as 64-bit integers, but some of its
//! serialization paths emit them as a big-number object split into two
//! 32-bit halves, `{"low": -188638304, "high": 402}`. Both shapes show up
//! across endpoints and across calls to the same endpoint, so the decoding
//! lives on the value type: any struct with a `UnixTimestamp` field accepts
//! either shape without per-field attributes.

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A server timestamp normalized to a signed 64-bit integer.
///
/// Always serialized as a plain JSON integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnixTimestamp(i64);

impl UnixTimestamp {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    /// Rebuild a value from its split halves: `high` supplies the upper 32
    /// bits and the two's-complement bit pattern of `low` the lower 32.
    pub const fn from_halves(low: i64, high: i64) -> Self {
        Self((high << 32) | (low & 0xFFFF_FFFF))
    }
}

impl From<i64> for UnixTimestamp {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<UnixTimestamp> for i64 {
    fn from(ts: UnixTimestamp) -> Self {
        ts.0
    }
}

impl fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for UnixTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for UnixTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = UnixTimestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer timestamp or a {\"low\", \"high\"} object")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(UnixTimestamp(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(UnixTimestamp)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut low = None;
        let mut high = None;
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "low" => {
                    if low.is_some() {
                        return Err(de::Error::duplicate_field("low"));
                    }
                    low = Some(map.next_value::<i64>()?);
                }
                "high" => {
                    if high.is_some() {
                        return Err(de::Error::duplicate_field("high"));
                    }
                    high = Some(map.next_value::<i64>()?);
                }
                // Big-number objects also carry an `unsigned` flag.
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        // A missing half is a zero word, but an object with neither is not a timestamp.
        if low.is_none() && high.is_none() {
            return Err(de::Error::missing_field("low"));
        }
        Ok(UnixTimestamp::from_halves(low.unwrap_or(0), high.unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> Result<UnixTimestamp, serde_json::Error> {
        serde_json::from_str(raw)
    }

    #[test]
    fn plain_integer_decodes_unchanged() {
        for value in [0, 1, -1, 1_234_567_890, 1_730_683_181_984, i64::MIN, i64::MAX] {
            let raw = serde_json::to_string(&value).unwrap();
            assert_eq!(decode(&raw).unwrap().value(), value, "{raw}");
        }
    }

    #[test]
    fn split_form_with_negative_low_word() {
        let ts = decode(r#"{"low":-188638304,"high":402}"#).unwrap();
        assert_eq!(ts.value(), 1_730_683_181_984);
    }

    #[test]
    fn split_form_ignores_unsigned_flag() {
        let ts = decode(r#"{"low":5,"high":1,"unsigned":false}"#).unwrap();
        assert_eq!(ts.value(), (1i64 << 32) | 5);
    }

    #[test]
    fn split_form_reproduces_bit_pattern() {
        let value: i64 = 0x0000_0193_F4C2_8A00;
        let low = (value as u32) as i32 as i64;
        let high = value >> 32;
        assert!(low < 0);
        assert_eq!(UnixTimestamp::from_halves(low, high).value(), value);
    }

    #[test]
    fn string_is_rejected_and_named() {
        let err = decode(r#""invalid""#).unwrap_err();
        assert!(err.to_string().contains("invalid"), "{err}");
    }

    #[test]
    fn numeric_string_is_not_coerced() {
        assert!(decode(r#""1730683181984""#).is_err());
    }

    #[test]
    fn fractional_number_is_rejected() {
        assert!(decode("1.5").is_err());
    }

    #[test]
    fn split_form_missing_half_is_zero() {
        assert_eq!(decode(r#"{"low":5}"#).unwrap().value(), 5);
        assert_eq!(decode(r#"{"high":1}"#).unwrap().value(), 1 << 32);
        assert_eq!(decode(r#"{"low":-1,"unsigned":false}"#).unwrap().value(), 0xFFFF_FFFF);
    }

    #[test]
    fn object_without_either_half_is_rejected() {
        for raw in ["{}", r#"{"unsigned":false}"#] {
            let err = decode(raw).unwrap_err();
            assert!(err.to_string().contains("low"), "{raw}: {err}");
        }
    }

    #[test]
    fn u64_beyond_i64_is_rejected() {
        assert!(decode("18446744073709551615").is_err());
    }

    #[test]
    fn serializes_as_plain_integer() {
        let json = serde_json::to_string(&UnixTimestamp::new(1_730_683_181_984)).unwrap();
        assert_eq!(json, "1730683181984");
    }

    #[derive(Debug, Deserialize)]
    struct Embedded {
        created_at: UnixTimestamp,
    }

    #[test]
    fn embedding_struct_gets_both_shapes() {
        let plain: Embedded = serde_json::from_str(r#"{"created_at":1234567890}"#).unwrap();
        let split: Embedded =
            serde_json::from_str(r#"{"created_at":{"low":-188638304,"high":402}}"#).unwrap();
        assert_eq!(plain.created_at.value(), 1_234_567_890);
        assert_eq!(split.created_at.value(), 1_730_683_181_984);
    }
}
