//! Helpers for turning free-form profile mappings into validated,
//! strategy-specific configs. Every failure names the offending field.

use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::profile::Profile;

use crate::error::ScaleError;

/// Read an integer profile field, coercing numeric strings the way the
/// profiles in the wild spell them. Missing or null means `default`.
pub(crate) fn int_field(profile: &Profile, key: &str, default: i64) -> Result<i64, ScaleError> {
    match profile.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(number)) => number
            .as_i64()
            .ok_or_else(|| ScaleError::config(format!("'{key}' must be an integer"))),
        Some(Value::String(raw)) => raw
            .trim()
            .parse()
            .map_err(|_| ScaleError::config(format!("'{key}' must be an integer, got '{raw}'"))),
        Some(_) => Err(ScaleError::config(format!("'{key}' must be an integer"))),
    }
}

/// Read a string profile field. Missing or null means `default`.
pub(crate) fn str_field(profile: &Profile, key: &str, default: &str) -> Result<String, ScaleError> {
    match profile.get(key) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(raw)) => Ok(raw.clone()),
        Some(_) => Err(ScaleError::config(format!("'{key}' must be a string"))),
    }
}

/// Range-check an integer field, narrowing it for storage.
pub(crate) fn require_min(key: &str, value: i64, min: i64) -> Result<u32, ScaleError> {
    if value < min {
        return Err(ScaleError::config(format!(
            "'{key}' must be >= {min}, got {value}"
        )));
    }
    u32::try_from(value).map_err(|_| ScaleError::config(format!("'{key}' is out of range: {value}")))
}

/// Deserialize a nested profile section into a typed struct, tolerating a
/// missing section. Unknown keys inside the section are ignored by serde.
pub(crate) fn section<T>(profile: &Profile, key: &str) -> Result<T, ScaleError>
where
    T: DeserializeOwned + Default,
{
    match profile.get(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| ScaleError::config(format!("invalid '{key}' section: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(value: Value) -> Profile {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_int_field_defaults_and_coercion() {
        let profile = profile(serde_json::json!({"count": "7", "containers": 3}));
        assert_eq!(int_field(&profile, "count", 1).unwrap(), 7);
        assert_eq!(int_field(&profile, "containers", 0).unwrap(), 3);
        assert_eq!(int_field(&profile, "missing", 42).unwrap(), 42);
    }

    #[test]
    fn test_int_field_rejects_non_integers() {
        let profile = profile(serde_json::json!({"count": [1]}));
        assert!(int_field(&profile, "count", 1).is_err());
    }

    #[test]
    fn test_require_min_names_the_field() {
        let err = require_min("count", 0, 1).unwrap_err();
        assert!(err.to_string().contains("'count'"));
        assert_eq!(require_min("count", 5, 1).unwrap(), 5);
    }
}
