use serde::{Deserialize, Serialize};

use crate::definition::EnumDefinition;
use crate::error::{DefinitionError, DefinitionResult};
use crate::naming::default_label_scope;

/// Declarative configuration of one enum attribute.
///
/// Transition hooks are code and cannot be configured here; this covers the
/// token list and label scope.
///
/// ```toml
/// attribute = "state"
/// tokens = ["draft", "review", "published"]
/// label_scope = "post.state"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeConfig {
    /// Attribute name on the host type.
    pub attribute: String,
    /// Declared tokens, in declaration order.
    pub tokens: Vec<String>,
    /// Label scope override. Derived from the host type when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_scope: Option<String>,
}

impl AttributeConfig {
    /// Config with no label scope override.
    pub fn new<I, S>(attribute: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attribute: attribute.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
            label_scope: None,
        }
    }

    /// Parse a single attribute configuration from TOML.
    pub fn from_toml(input: &str) -> DefinitionResult<Self> {
        toml::from_str(input).map_err(|e| DefinitionError::Config(e.to_string()))
    }

    /// Validate and convert into an [`EnumDefinition`].
    pub fn definition(&self) -> DefinitionResult<EnumDefinition> {
        EnumDefinition::new(self.attribute.clone(), self.tokens.iter().cloned())
    }

    /// The configured label scope, or the default derived from `host_type`.
    pub fn label_scope_for(&self, host_type: &str) -> String {
        self.label_scope
            .clone()
            .unwrap_or_else(|| default_label_scope(host_type, &self.attribute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_from_toml() {
        let config = AttributeConfig::from_toml(
            r#"
            attribute = "state"
            tokens = ["draft", "review", "published"]
            "#,
        )
        .unwrap();
        assert_eq!(config.attribute, "state");
        assert_eq!(config.tokens.len(), 3);
        assert!(config.label_scope.is_none());
        assert_eq!(config.label_scope_for("BlogPost"), "blog_post.state");

        let def = config.definition().unwrap();
        assert_eq!(def.position("published"), Some(2));
    }

    #[test]
    fn explicit_label_scope_wins() {
        let mut config = AttributeConfig::new("state", ["a", "b"]);
        config.label_scope = Some("custom.scope".into());
        assert_eq!(config.label_scope_for("Post"), "custom.scope");
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = AttributeConfig::from_toml("attribute = ").unwrap_err();
        assert!(matches!(err, DefinitionError::Config(_)));
    }

    #[test]
    fn duplicate_tokens_surface_on_conversion() {
        let config = AttributeConfig::new("state", ["a", "a"]);
        assert!(matches!(
            config.definition(),
            Err(DefinitionError::DuplicateToken { .. })
        ));
    }
}
