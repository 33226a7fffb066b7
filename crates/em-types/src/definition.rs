use std::fmt;

use serde::Serialize;

use crate::error::{DefinitionError, DefinitionResult};
use crate::set::TokenSet;

/// The ordered, unique set of tokens declared for one enum attribute.
///
/// Declaration order is preserved and visible through [`Self::tokens`] and
/// [`Self::position`]; it plays no part in transition matching.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnumDefinition {
    attribute: String,
    tokens: Vec<String>,
}

impl EnumDefinition {
    /// Build a definition, rejecting empty, blank and duplicate tokens.
    ///
    /// ```
    /// use em_types::EnumDefinition;
    ///
    /// let def = EnumDefinition::new("state", ["draft", "published"]).unwrap();
    /// assert_eq!(def.position("published"), Some(1));
    /// assert!(EnumDefinition::new("state", ["draft", "draft"]).is_err());
    /// ```
    pub fn new<I, S>(attribute: impl Into<String>, tokens: I) -> DefinitionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attribute = attribute.into();
        if attribute.trim().is_empty() {
            return Err(DefinitionError::EmptyAttribute);
        }

        let mut declared: Vec<String> = Vec::new();
        for token in tokens {
            let token = token.into();
            if token.trim().is_empty() {
                return Err(DefinitionError::BlankToken { attribute });
            }
            if declared.contains(&token) {
                return Err(DefinitionError::DuplicateToken { attribute, token });
            }
            declared.push(token);
        }

        if declared.is_empty() {
            return Err(DefinitionError::EmptyDefinition { attribute });
        }

        Ok(Self {
            attribute,
            tokens: declared,
        })
    }

    /// Name of the attribute this definition belongs to.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Declared tokens in declaration order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Declared tokens as string slices.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Number of declared tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always `false` for a successfully built definition.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.position(raw).is_some()
    }

    /// Declaration index of `raw`, or `None` when it is not declared.
    pub fn position(&self, raw: &str) -> Option<usize> {
        self.tokens.iter().position(|t| t == raw)
    }

    /// Check that an explicitly enumerated token set only names declared
    /// tokens and can match something. `TokenSet::Any` always passes.
    pub fn validate_set(&self, set: &TokenSet) -> DefinitionResult<()> {
        if set.is_empty() {
            return Err(DefinitionError::EmptyTokenSet {
                attribute: self.attribute.clone(),
            });
        }
        for token in set.tokens() {
            if !self.contains(token) {
                return Err(DefinitionError::UndeclaredToken {
                    attribute: self.attribute.clone(),
                    token: token.clone(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for EnumDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.attribute, self.tokens.join(", "))
    }
}
