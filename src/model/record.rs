use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Returns true for the values the service uses to say "nothing here":
/// `null`, `[]` and `{}`.
pub fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

macro_rules! opaque_record {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Value);

        impl $name {
            pub fn from_value(value: Value) -> Self {
                Self(value)
            }

            pub fn as_value(&self) -> &Value {
                &self.0
            }

            pub fn into_value(self) -> Value {
                self.0
            }

            /// Looks up a top-level field of the record.
            pub fn get(&self, field: &str) -> Option<&Value> {
                self.0.get(field)
            }

            pub fn str_field(&self, field: &str) -> Option<&str> {
                self.get(field).and_then(Value::as_str)
            }
        }

        impl From<Value> for $name {
            fn from(value: Value) -> Self {
                Self(value)
            }
        }
    };
}

opaque_record!(
    /// A package matched by an artifact search.
    ArtifactResult
);

opaque_record!(
    /// Platform metadata for one (part, vendor, product).
    CpeDetail
);

opaque_record!(
    /// A CVE record: score, impact, affected CPEs with version ranges, references.
    CveDetail
);

opaque_record!(
    /// Source-control metadata for one repository.
    ScmDetail
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_absent() {
        assert!(is_absent(&Value::Null));
        assert!(is_absent(&json!([])));
        assert!(is_absent(&json!({})));
        assert!(!is_absent(&json!([{}])));
        assert!(!is_absent(&json!({"id": 1})));
        assert!(!is_absent(&json!(0)));
    }

    #[test]
    fn test_record_is_transparent() {
        let raw = json!({"id": 8396068, "name": "lodash", "scm_id": 1});
        let record: ArtifactResult = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.str_field("name"), Some("lodash"));
        assert_eq!(record.get("scm_id"), Some(&json!(1)));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
        assert_eq!(record.into_value(), raw);
    }
}
