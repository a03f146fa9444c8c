//! Tolerant deserializers for fields the backend types loosely.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// Deserialize an optional field that the backend may send as a string, a
/// number or null, keeping its textual form.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        Scalar::Str(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

/// Like [`lenient_string`], with null or absent read as an empty string.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// A whole number sent as a number or a numeric string. Anything else reads
/// as 0.
pub fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Scalar::Int(n)) => n,
        Some(Scalar::Float(f)) => f as i64,
        Some(Scalar::Str(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        Some(Scalar::Bool(b)) => i64::from(b),
        None => 0,
    })
}

/// A flag sent as a bool, `0`/`1`, or a string such as `"true"`.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Scalar::Bool(b)) => b,
        Some(Scalar::Int(n)) => n != 0,
        Some(Scalar::Float(f)) => f != 0.0,
        Some(Scalar::Str(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
        None => false,
    })
}

/// Treat an explicit `null` like a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "lenient_string")]
        effort: Option<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        attendees: Vec<String>,
    }

    #[test]
    fn lenient_string_accepts_numbers_and_null() {
        let h: Holder = serde_json::from_str(r#"{"effort": 3.5}"#).unwrap();
        assert_eq!(h.effort.as_deref(), Some("3.5"));
        let h: Holder = serde_json::from_str(r#"{"effort": 4}"#).unwrap();
        assert_eq!(h.effort.as_deref(), Some("4"));
        let h: Holder = serde_json::from_str(r#"{"effort": null}"#).unwrap();
        assert_eq!(h.effort, None);
        let h: Holder = serde_json::from_str("{}").unwrap();
        assert_eq!(h.effort, None);
    }

    #[derive(Deserialize)]
    struct Scored {
        #[serde(default, deserialize_with = "lenient_text")]
        title: String,
        #[serde(default, deserialize_with = "lenient_int")]
        probability: i64,
        #[serde(default, deserialize_with = "lenient_bool")]
        deliverable: bool,
    }

    #[test]
    fn loose_scalars_read_as_typed_values() {
        let s: Scored = serde_json::from_str(
            r#"{"title": null, "probability": "2", "deliverable": 1}"#,
        )
        .unwrap();
        assert_eq!(s.title, "");
        assert_eq!(s.probability, 2);
        assert!(s.deliverable);

        let s: Scored = serde_json::from_str(
            r#"{"title": 42, "probability": 3.0, "deliverable": "false"}"#,
        )
        .unwrap();
        assert_eq!(s.title, "42");
        assert_eq!(s.probability, 3);
        assert!(!s.deliverable);

        let s: Scored = serde_json::from_str(r#"{"probability": "high", "deliverable": 0}"#).unwrap();
        assert_eq!(s.title, "");
        assert_eq!(s.probability, 0);
        assert!(!s.deliverable);
    }

    #[test]
    fn null_sequence_becomes_empty() {
        let h: Holder = serde_json::from_str(r#"{"attendees": null}"#).unwrap();
        assert!(h.attendees.is_empty());
        let h: Holder = serde_json::from_str(r#"{"attendees": ["Ann"]}"#).unwrap();
        assert_eq!(h.attendees, vec!["Ann"]);
    }
}
