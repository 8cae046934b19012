use std::collections::BTreeMap;

use crate::error::RegistryError;

/// A loosely-typed payload tree, shaped like the registry data sent at login.
///
/// Accessors come in two flavours: `as_*` returns `None` on a type mismatch,
/// `expect_*` returns a [`RegistryError`] naming the offending key.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    List(Vec<Tag>),
    Compound(BTreeMap<String, Tag>),
}

impl Tag {
    /// Build a compound from `(key, value)` pairs.
    pub fn compound<K: Into<String>>(entries: impl IntoIterator<Item = (K, Tag)>) -> Self {
        Tag::Compound(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn list(items: impl IntoIterator<Item = Tag>) -> Self {
        Tag::List(items.into_iter().collect())
    }

    /// Name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Tag::Byte(_) => "byte",
            Tag::Short(_) => "short",
            Tag::Int(_) => "int",
            Tag::Long(_) => "long",
            Tag::Float(_) => "float",
            Tag::Double(_) => "double",
            Tag::String(_) => "string",
            Tag::List(_) => "list",
            Tag::Compound(_) => "compound",
        }
    }

    /// Child of a compound. `None` for missing keys and for non-compounds.
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.as_compound().and_then(|c| c.get(key))
    }

    pub fn as_compound(&self) -> Option<&BTreeMap<String, Tag>> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Tag]> {
        match self {
            Tag::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    /// Any integer variant, widened.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Tag::Byte(v) => Some(v as i64),
            Tag::Short(v) => Some(v as i64),
            Tag::Int(v) => Some(v as i64),
            Tag::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Any numeric variant, widened.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Tag::Float(v) => Some(v as f64),
            Tag::Double(v) => Some(v),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    /// Integers encode booleans; anything non-zero is true.
    pub fn as_bool(&self) -> Option<bool> {
        self.as_i64().map(|v| v != 0)
    }

    /// Required child of a compound.
    pub fn expect_key(&self, key: &str) -> Result<&Tag, RegistryError> {
        let compound = self.as_compound().ok_or_else(|| RegistryError::NotACompound {
            child: key.to_string(),
            found: self.kind(),
        })?;
        compound
            .get(key)
            .ok_or_else(|| RegistryError::MissingKey(key.to_string()))
    }

    pub fn expect_compound(&self, key: &str) -> Result<&BTreeMap<String, Tag>, RegistryError> {
        self.as_compound().ok_or_else(|| self.wrong_type(key, "compound"))
    }

    pub fn expect_list(&self, key: &str) -> Result<&[Tag], RegistryError> {
        self.as_list().ok_or_else(|| self.wrong_type(key, "list"))
    }

    pub fn expect_str(&self, key: &str) -> Result<&str, RegistryError> {
        self.as_str().ok_or_else(|| self.wrong_type(key, "string"))
    }

    pub fn expect_i64(&self, key: &str) -> Result<i64, RegistryError> {
        self.as_i64().ok_or_else(|| self.wrong_type(key, "integer"))
    }

    /// Integer that must fit in an `i32`.
    pub fn expect_i32(&self, key: &str) -> Result<i32, RegistryError> {
        let value = self.expect_i64(key)?;
        i32::try_from(value).map_err(|_| RegistryError::OutOfRange {
            key: key.to_string(),
            value,
        })
    }

    pub fn expect_f64(&self, key: &str) -> Result<f64, RegistryError> {
        self.as_f64().ok_or_else(|| self.wrong_type(key, "number"))
    }

    pub fn expect_bool(&self, key: &str) -> Result<bool, RegistryError> {
        self.as_bool().ok_or_else(|| self.wrong_type(key, "boolean"))
    }

    fn wrong_type(&self, key: &str, expected: &'static str) -> RegistryError {
        RegistryError::WrongType {
            key: key.to_string(),
            expected,
            found: self.kind(),
        }
    }

    /// Convert a JSON document into a payload tree.
    ///
    /// Integers become `Int` when they fit, `Long` otherwise; other numbers
    /// become `Double`; booleans become `Byte`. `null` has no counterpart and
    /// is rejected.
    pub fn from_json(value: serde_json::Value) -> Result<Self, RegistryError> {
        from_json_at(value, "$")
    }

    pub fn from_json_str(text: &str) -> Result<Self, RegistryError> {
        Self::from_json(serde_json::from_str(text)?)
    }
}

fn from_json_at(value: serde_json::Value, path: &str) -> Result<Tag, RegistryError> {
    use serde_json::Value;

    Ok(match value {
        Value::Null => return Err(RegistryError::UnsupportedValue(path.to_string())),
        Value::Bool(b) => Tag::Byte(b as i8),
        Value::Number(n) => match n.as_i64() {
            Some(v) => match i32::try_from(v) {
                Ok(small) => Tag::Int(small),
                Err(_) => Tag::Long(v),
            },
            None => match n.as_f64() {
                Some(v) => Tag::Double(v),
                None => return Err(RegistryError::UnsupportedValue(path.to_string())),
            },
        },
        Value::String(s) => Tag::String(s),
        Value::Array(items) => Tag::List(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| from_json_at(v, &format!("{path}[{i}]")))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => Tag::Compound(
            map.into_iter()
                .map(|(k, v)| {
                    let child = from_json_at(v, &format!("{path}.{k}"))?;
                    Ok((k, child))
                })
                .collect::<Result<_, RegistryError>>()?,
        ),
    })
}

impl From<i8> for Tag {
    fn from(v: i8) -> Self {
        Tag::Byte(v)
    }
}

impl From<i32> for Tag {
    fn from(v: i32) -> Self {
        Tag::Int(v)
    }
}

impl From<i64> for Tag {
    fn from(v: i64) -> Self {
        Tag::Long(v)
    }
}

impl From<f32> for Tag {
    fn from(v: f32) -> Self {
        Tag::Float(v)
    }
}

impl From<f64> for Tag {
    fn from(v: f64) -> Self {
        Tag::Double(v)
    }
}

impl From<&str> for Tag {
    fn from(v: &str) -> Self {
        Tag::String(v.to_string())
    }
}

impl From<String> for Tag {
    fn from(v: String) -> Self {
        Tag::String(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_accessors_widen() {
        assert_eq!(Tag::Byte(1).as_i64(), Some(1));
        assert_eq!(Tag::Short(-3).as_f64(), Some(-3.0));
        assert_eq!(Tag::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(Tag::Double(1.5).as_i64(), None);
        assert_eq!(Tag::Int(0).as_bool(), Some(false));
        assert_eq!(Tag::Long(7).as_bool(), Some(true));
    }

    #[test]
    fn expect_key_reports_missing() {
        let tag = Tag::compound([("a", Tag::Int(1))]);
        assert!(tag.expect_key("a").is_ok());
        match tag.expect_key("b") {
            Err(RegistryError::MissingKey(k)) => assert_eq!(k, "b"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn expect_key_on_non_compound_names_the_parent_shape() {
        match Tag::list([Tag::Int(1)]).expect_key("value") {
            Err(RegistryError::NotACompound { child, found }) => {
                assert_eq!(child, "value");
                assert_eq!(found, "list");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn expect_i32_rejects_wide_values() {
        assert_eq!(Tag::Long(-64).expect_i32("min_y").unwrap(), -64);
        match Tag::Long(5_000_000_000).expect_i32("height") {
            Err(RegistryError::OutOfRange { key, value }) => {
                assert_eq!(key, "height");
                assert_eq!(value, 5_000_000_000);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn expect_reports_wrong_type() {
        let tag = Tag::from("text");
        match tag.expect_i64("height") {
            Err(RegistryError::WrongType {
                key,
                expected,
                found,
            }) => {
                assert_eq!(key, "height");
                assert_eq!(expected, "integer");
                assert_eq!(found, "string");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn json_conversion_maps_variants() {
        let tag = Tag::from_json_str(
            r#"{"a": 1, "b": 5000000000, "c": 0.25, "d": true, "e": "x", "f": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(tag.get("a"), Some(&Tag::Int(1)));
        assert_eq!(tag.get("b"), Some(&Tag::Long(5_000_000_000)));
        assert_eq!(tag.get("c"), Some(&Tag::Double(0.25)));
        assert_eq!(tag.get("d"), Some(&Tag::Byte(1)));
        assert_eq!(tag.get("e").and_then(Tag::as_str), Some("x"));
        assert_eq!(tag.get("f").and_then(Tag::as_list).map(|l| l.len()), Some(2));
    }

    #[test]
    fn json_null_is_rejected_with_path() {
        match Tag::from_json_str(r#"{"a": [1, null]}"#) {
            Err(RegistryError::UnsupportedValue(path)) => assert_eq!(path, "$.a[1]"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
