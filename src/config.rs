use std::collections::BTreeMap;

/// GraphQL builtin scalars and the host types they map to.
///
/// GraphQL guarantees `Int` fits in 32 bits.
pub const BUILTIN_TYPES: [(&str, &str); 5] = [
    ("Int", "i32"),
    ("Float", "f64"),
    ("String", "String"),
    ("Boolean", "bool"),
    ("ID", "String"),
];

pub fn builtin_type(graphql_name: &str) -> Option<&'static str> {
    BUILTIN_TYPES
        .iter()
        .find(|(name, _)| *name == graphql_name)
        .map(|(_, host)| *host)
}

/// Settings for a whole generation run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Host type references for schema scalars, e.g. `DateTime: chrono::DateTime<chrono::Utc>`.
    /// A binding also takes precedence over the builtin mapping.
    pub scalars: BTreeMap<String, String>,
    /// Enables subscriptions, interfaces and unions, whose support is still experimental.
    pub allow_broken_features: bool,
}

impl Config {
    pub fn with_scalar(mut self, graphql_name: &str, host_type: &str) -> Config {
        self.scalars
            .insert(graphql_name.to_string(), host_type.to_string());
        self
    }

    pub fn allowing_broken_features(mut self) -> Config {
        self.allow_broken_features = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json;

    #[test]
    fn builtin_mapping() {
        assert_eq!(builtin_type("Int"), Some("i32"));
        assert_eq!(builtin_type("ID"), Some("String"));
        assert_eq!(builtin_type("DateTime"), None);
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: Config = serde_json::from_str(r#"{ "scalars": { "DateTime": "String" } }"#)
            .unwrap();
        assert_eq!(config, Config::default().with_scalar("DateTime", "String"));
        assert!(!config.allow_broken_features);
    }

    #[test]
    fn rejects_unknown_settings() {
        let config = serde_json::from_str::<Config>(r#"{ "allow_broken": true }"#);
        assert!(config.is_err());
    }
}
