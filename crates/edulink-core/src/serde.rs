use serde::{Deserialize, Deserializer};

/// Treats a missing, `null`, empty or whitespace-only string as `None`.
pub fn deserialize_blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Accepts a JSON string or number and keeps its text. Row IDs and decimals arrive as either,
/// depending on the backend.
pub fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Integer(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}

/// Like [`deserialize_string_or_number`], with `null` and blanks as `None`.
pub fn deserialize_optional_string_or_number<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_string_or_number")] String);

    let opt: Option<Wrapper> = Option::deserialize(deserializer)?;
    Ok(opt.map(|w| w.0).filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "deserialize_blank_as_none")]
        value: Option<String>,
    }

    #[test]
    fn test_blank_values_become_none() {
        let r: Record = serde_json::from_str(r#"{"value": "  "}"#).unwrap();
        assert!(r.value.is_none());

        let r: Record = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert!(r.value.is_none());

        let r: Record = serde_json::from_str(r#"{}"#).unwrap();
        assert!(r.value.is_none());

        let r: Record = serde_json::from_str(r#"{"value": "Ada"}"#).unwrap();
        assert_eq!(r.value.as_deref(), Some("Ada"));
    }

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "deserialize_string_or_number")]
        id: String,
        #[serde(default, deserialize_with = "deserialize_optional_string_or_number")]
        gpa: Option<String>,
    }

    #[test]
    fn test_ids_accept_strings_and_numbers() {
        let r: Row = serde_json::from_str(r#"{"id": 42, "gpa": "3.50"}"#).unwrap();
        assert_eq!(r.id, "42");
        assert_eq!(r.gpa.as_deref(), Some("3.50"));

        let r: Row = serde_json::from_str(r#"{"id": "s-1", "gpa": 3.5}"#).unwrap();
        assert_eq!(r.id, "s-1");
        assert_eq!(r.gpa.as_deref(), Some("3.5"));

        let r: Row = serde_json::from_str(r#"{"id": 7, "gpa": null}"#).unwrap();
        assert!(r.gpa.is_none());

        assert!(serde_json::from_str::<Row>(r#"{"id": true}"#).is_err());
    }
}
