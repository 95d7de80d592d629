//! Lenient decoders for the PHP backend, which is loose about JSON types:
//! integers arrive as numbers or numeric strings, and text columns may be
//! `null`.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

fn scalar_to_int<E: de::Error>(value: Scalar) -> Result<i64, E> {
    match value {
        Scalar::Int(v) => Ok(v),
        Scalar::Float(v) if v.fract() == 0.0 => Ok(v as i64),
        Scalar::Float(v) => Err(E::custom(format!("expected integer, found {v}"))),
        Scalar::Bool(v) => Ok(i64::from(v)),
        Scalar::Text(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(0);
            }
            raw.parse::<i64>()
                .map_err(|_| E::custom(format!("expected integer, found {raw:?}")))
        }
    }
}

/// Integer that may be sent as a number or a numeric string. Blank and
/// `null` decode as zero.
pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        Some(value) => scalar_to_int(value),
        None => Ok(0),
    }
}

/// Text column that may be `null` or a bare number.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => String::new(),
        Some(Scalar::Text(v)) => v,
        Some(Scalar::Int(v)) => v.to_string(),
        Some(Scalar::Float(v)) => v.to_string(),
        Some(Scalar::Bool(v)) => v.to_string(),
    })
}

/// Like [`text`] but keeps the distinction between absent/blank and present.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = text(deserializer)?;
    Ok((!value.is_empty()).then_some(value))
}

/// Boolean flag that PHP may render as `true`, `1` or `"1"`.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => false,
        Some(Scalar::Bool(v)) => v,
        Some(Scalar::Int(v)) => v != 0,
        Some(Scalar::Float(v)) => v != 0.0,
        Some(Scalar::Text(v)) => matches!(v.trim(), "1" | "true" | "TRUE" | "True"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(deserialize_with = "int")]
        id: i64,
        #[serde(default, deserialize_with = "text")]
        note: String,
        #[serde(default, deserialize_with = "opt_text")]
        extra: Option<String>,
        #[serde(default, deserialize_with = "flag")]
        done: bool,
    }

    #[test]
    fn accepts_numeric_strings_and_nulls() {
        let row: Row =
            serde_json::from_str(r#"{"id":"42","note":null,"extra":"","done":"1"}"#).expect("row");
        assert_eq!(row.id, 42);
        assert_eq!(row.note, "");
        assert_eq!(row.extra, None);
        assert!(row.done);
    }

    #[test]
    fn accepts_plain_numbers_for_text() {
        let row: Row = serde_json::from_str(r#"{"id":7,"note":3,"done":true}"#).expect("row");
        assert_eq!(row.id, 7);
        assert_eq!(row.note, "3");
        assert!(row.done);
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let err = serde_json::from_str::<Row>(r#"{"id":"abc"}"#).expect_err("must fail");
        assert!(err.to_string().contains("expected integer"));
    }
}
