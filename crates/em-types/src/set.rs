use std::fmt;

use serde::{Deserialize, Serialize};

/// The `from` or `to` side of a transition rule.
///
/// `Any` matches every value, including an absent one. `Only` matches the
/// listed tokens, plus the absent value when `absent` is set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenSet {
    #[default]
    Any,
    Only { tokens: Vec<String>, absent: bool },
}

impl TokenSet {
    /// Wildcard matching every value.
    pub fn any() -> Self {
        Self::Any
    }

    /// Explicit set of tokens.
    pub fn only<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collected: Vec<String> = Vec::new();
        for token in tokens {
            let token = token.into();
            if !collected.contains(&token) {
                collected.push(token);
            }
        }
        Self::Only {
            tokens: collected,
            absent: false,
        }
    }

    /// Matches only the absent value (an attribute with nothing set).
    pub fn absent() -> Self {
        Self::Only {
            tokens: Vec::new(),
            absent: true,
        }
    }

    /// Extend an explicit set so it also matches the absent value.
    pub fn or_absent(self) -> Self {
        match self {
            Self::Any => Self::Any,
            Self::Only { tokens, .. } => Self::Only {
                tokens,
                absent: true,
            },
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// True for an explicit set that lists no tokens and excludes absent.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Only { tokens, absent: false } if tokens.is_empty())
    }

    /// Explicitly listed tokens. Empty for `Any`.
    pub fn tokens(&self) -> &[String] {
        match self {
            Self::Any => &[],
            Self::Only { tokens, .. } => tokens,
        }
    }

    /// Whether `value` falls in this set.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (Self::Any, _) => true,
            (Self::Only { absent, .. }, None) => *absent,
            (Self::Only { tokens, .. }, Some(raw)) => tokens.iter().any(|t| t == raw),
        }
    }
}

impl From<&str> for TokenSet {
    fn from(token: &str) -> Self {
        Self::only([token])
    }
}

impl From<String> for TokenSet {
    fn from(token: String) -> Self {
        Self::only([token])
    }
}

impl<const N: usize> From<[&str; N]> for TokenSet {
    fn from(tokens: [&str; N]) -> Self {
        Self::only(tokens)
    }
}

impl From<Vec<&str>> for TokenSet {
    fn from(tokens: Vec<&str>) -> Self {
        Self::only(tokens)
    }
}

impl From<Vec<String>> for TokenSet {
    fn from(tokens: Vec<String>) -> Self {
        Self::only(tokens)
    }
}

impl fmt::Display for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Only { tokens, absent } => {
                let mut parts: Vec<&str> = tokens.iter().map(String::as_str).collect();
                if *absent {
                    parts.push("<absent>");
                }
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}
