//! Codec Module
//!
//! Converts cached values to the textual payload stored remotely and back.
//!
//! # Payload states
//! - `"__null__"` - an explicitly cached null
//! - no payload - false, zero and the empty string are written without a body
//! - JSON text - everything else; date-times are revived on decode

mod dates;
mod value;

pub use dates::{looks_like_datetime, revive_dates};
pub use value::{format_datetime, Value};

use crate::error::{CacheError, Result};

/// Reserved payload marking an explicitly cached null.
pub const NULL_SENTINEL: &str = "__null__";

// == Encode ==
/// Encodes a value for storage.
///
/// Returns `None` for falsy non-null values (false, 0, ""), which are
/// stored as an empty payload and read back as null.
pub fn encode(value: &Value) -> Result<Option<String>> {
    if value.is_null() {
        return Ok(Some(NULL_SENTINEL.to_string()));
    }
    if value.is_falsy() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(value)?))
}

// == Decode ==
/// Decodes a stored payload, reviving date-time fields.
pub fn decode(payload: &str) -> Result<Value> {
    decode_at("<payload>", payload)
}

/// Like [`decode`], naming the cache key in parse errors.
pub fn decode_at(key: &str, payload: &str) -> Result<Value> {
    if payload == NULL_SENTINEL {
        return Ok(Value::Null);
    }
    let parsed: serde_json::Value =
        serde_json::from_str(payload).map_err(|source| CacheError::Decode {
            key: key.to_string(),
            source,
        })?;
    Ok(revive_dates(parsed.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    #[test]
    fn test_null_uses_sentinel() {
        let encoded = encode(&Value::Null).unwrap();
        assert_eq!(encoded.as_deref(), Some(NULL_SENTINEL));
        assert_eq!(decode(NULL_SENTINEL).unwrap(), Value::Null);
    }

    #[test]
    fn test_sentinel_differs_from_encoded_string() {
        // a string that happens to read "__null__" is JSON-quoted
        let encoded = encode(&Value::from(NULL_SENTINEL)).unwrap().unwrap();
        assert_ne!(encoded, NULL_SENTINEL);
        assert_eq!(decode(&encoded).unwrap(), Value::from(NULL_SENTINEL));
    }

    #[test]
    fn test_falsy_values_have_no_payload() {
        assert_eq!(encode(&Value::from(0i64)).unwrap(), None);
        assert_eq!(encode(&Value::Bool(false)).unwrap(), None);
        assert_eq!(encode(&Value::from("")).unwrap(), None);
    }

    #[test]
    fn test_round_trip_object() {
        let value = Value::from(json!({
            "id": 42,
            "name": "ada",
            "admin": true,
            "score": 1.5,
            "tags": ["a", "b"],
            "nested": {"empty": [], "none": null}
        }));
        let encoded = encode(&value).unwrap().unwrap();
        assert_eq!(decode(&encoded).unwrap(), value);
    }

    #[test]
    fn test_date_reconstruction() {
        let dt = DateTime::parse_from_rfc3339("2024-06-01T09:15:30.125Z").unwrap();
        let value = Value::from(json!({"user": {"last_login": "2024-06-01T09:15:30.125Z"}}));

        let decoded = decode(&encode(&value).unwrap().unwrap()).unwrap();
        let revived = decoded
            .get("user")
            .and_then(|u| u.get("last_login"))
            .and_then(Value::as_datetime)
            .copied();
        assert_eq!(revived, Some(dt));
    }

    #[test]
    fn test_datetime_value_survives_round_trip() {
        let dt = DateTime::parse_from_rfc3339("2021-11-11T11:11:11.000+05:00").unwrap();
        let mut fields = std::collections::BTreeMap::new();
        fields.insert("at".to_string(), Value::DateTime(dt));
        let value = Value::Object(fields);

        let decoded = decode(&encode(&value).unwrap().unwrap()).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_malformed_payload_is_error() {
        let err = decode_at("user/1", "{not json").unwrap_err();
        assert!(matches!(err, CacheError::Decode { ref key, .. } if key == "user/1"));
    }
}
