use serde::{Deserialize, Serialize};

/// Key–value pair used for environment variables.
///
/// Both fields are plain UTF-8 strings; no validation is applied here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValue {
    key: String,
    value: String,
}

impl KeyValue {
    /// Create a new key–value pair.
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Get the key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<(String, String)> for KeyValue {
    fn from((key, value): (String, String)) -> Self {
        Self { key, value }
    }
}

impl From<(&str, &str)> for KeyValue {
    fn from((key, value): (&str, &str)) -> Self {
        Self::new(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::KeyValue;

    #[test]
    fn new_sets_key_and_value() {
        let kv = KeyValue::new("WEB3_PROVIDER_URL", "https://rpc.example");
        assert_eq!(kv.key(), "WEB3_PROVIDER_URL");
        assert_eq!(kv.value(), "https://rpc.example");
    }

    #[test]
    fn tuple_conversions_create_keyvalue() {
        let a: KeyValue = ("FOO", "bar").into();
        let b: KeyValue = (String::from("FOO"), String::from("bar")).into();
        assert_eq!(a, b);
    }

    #[test]
    fn serde_uses_camel_case_fields() {
        let kv = KeyValue::new("FOO", "bar");
        let json = serde_json::to_string(&kv).unwrap();
        assert!(json.contains("\"key\":\"FOO\""));
        assert!(json.contains("\"value\":\"bar\""));

        let back: KeyValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kv);
    }
}
