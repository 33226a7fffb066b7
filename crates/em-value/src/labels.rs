//! Label resolution for value objects.
//!
//! A [`LabelResolver`] maps `(scope, raw value)` to a human-readable label.
//! Resolution is pure; when a resolver has no entry the value object falls
//! back to its raw value.

use std::collections::HashMap;

use crate::error::{LabelError, LabelResult};

/// Pure `(scope, raw) -> label` lookup.
pub trait LabelResolver: Send + Sync {
    /// Resolve a label, or `None` when no translation exists.
    fn resolve(&self, scope: &str, raw: &str) -> Option<String>;
}

impl<F> LabelResolver for F
where
    F: Fn(&str, &str) -> Option<String> + Send + Sync,
{
    fn resolve(&self, scope: &str, raw: &str) -> Option<String> {
        self(scope, raw)
    }
}

/// Lookup key for a label: `"<scope>.<raw>"`.
pub fn label_key(scope: &str, raw: &str) -> String {
    format!("{scope}.{raw}")
}

/// Resolver without any translations; every label is the raw value.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawLabels;

impl LabelResolver for RawLabels {
    fn resolve(&self, _scope: &str, _raw: &str) -> Option<String> {
        None
    }
}

/// In-memory label catalog keyed by `"<scope>.<raw>"`.
#[derive(Clone, Debug, Default)]
pub struct StaticLabels {
    entries: HashMap<String, String>,
}

impl StaticLabels {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label, returning the catalog for chaining.
    pub fn with(mut self, scope: &str, raw: &str, label: impl Into<String>) -> Self {
        self.insert(scope, raw, label);
        self
    }

    /// Add or replace the label for `raw` under `scope`.
    pub fn insert(&mut self, scope: &str, raw: &str, label: impl Into<String>) {
        self.entries.insert(label_key(scope, raw), label.into());
    }

    /// Number of labels in the catalog.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a catalog from a nested TOML document.
    ///
    /// ```
    /// use em_value::{LabelResolver, StaticLabels};
    ///
    /// let labels = StaticLabels::from_toml(r#"
    ///     [blog_post.state]
    ///     draft = "Draft"
    ///     published = "Live"
    /// "#).unwrap();
    /// assert_eq!(labels.resolve("blog_post.state", "published").as_deref(), Some("Live"));
    /// ```
    pub fn from_toml(input: &str) -> LabelResult<Self> {
        let table: toml::Table = input
            .parse()
            .map_err(|e: toml::de::Error| LabelError::Parse(e.to_string()))?;
        let mut labels = Self::new();
        flatten("", &table, &mut labels.entries)?;
        Ok(labels)
    }
}

impl LabelResolver for StaticLabels {
    fn resolve(&self, scope: &str, raw: &str) -> Option<String> {
        self.entries.get(&label_key(scope, raw)).cloned()
    }
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut HashMap<String, String>) -> LabelResult<()> {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::String(label) => {
                out.insert(path, label.clone());
            }
            toml::Value::Table(nested) => flatten(&path, nested, out)?,
            other => {
                return Err(LabelError::InvalidEntry {
                    key: path,
                    found: other.type_str().to_string(),
                })
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_labels_never_resolve() {
        assert_eq!(RawLabels.resolve("post.state", "draft"), None);
    }

    #[test]
    fn static_labels_resolve_by_scope() {
        let labels = StaticLabels::new()
            .with("post.state", "draft", "Draft")
            .with("order.state", "draft", "Cart");
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.resolve("post.state", "draft").as_deref(), Some("Draft"));
        assert_eq!(labels.resolve("order.state", "draft").as_deref(), Some("Cart"));
        assert_eq!(labels.resolve("post.state", "archived"), None);
    }

    #[test]
    fn closures_are_resolvers() {
        let upper = |_scope: &str, raw: &str| Some(raw.to_uppercase());
        assert_eq!(upper.resolve("any", "draft").as_deref(), Some("DRAFT"));
    }

    #[test]
    fn from_toml_flattens_nested_tables() {
        let labels = StaticLabels::from_toml(
            r#"
            [post.state]
            draft = "Draft"
            review = "In review"

            [post.kind]
            article = "Article"
            "#,
        )
        .unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.resolve("post.state", "review").as_deref(), Some("In review"));
        assert_eq!(labels.resolve("post.kind", "article").as_deref(), Some("Article"));
    }

    #[test]
    fn from_toml_rejects_non_string_leaves() {
        let err = StaticLabels::from_toml("[post.state]\ndraft = 3\n").unwrap_err();
        assert_eq!(
            err,
            LabelError::InvalidEntry {
                key: "post.state.draft".into(),
                found: "integer".into(),
            }
        );
    }

    #[test]
    fn from_toml_reports_parse_errors() {
        assert!(matches!(
            StaticLabels::from_toml("[unterminated"),
            Err(LabelError::Parse(_))
        ));
    }
}
