use thiserror::Error;

/// Errors raised while declaring enum attributes and their transition rules.
///
/// Every variant is a setup-time failure: none of them can surface while
/// reading values or dispatching hooks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("attribute name must not be empty")]
    EmptyAttribute,

    #[error("enum attribute '{attribute}' declares no tokens")]
    EmptyDefinition { attribute: String },

    #[error("enum attribute '{attribute}' declares a blank token")]
    BlankToken { attribute: String },

    #[error("enum attribute '{attribute}' declares token '{token}' more than once")]
    DuplicateToken { attribute: String, token: String },

    #[error("transition on '{attribute}' references undeclared token '{token}'")]
    UndeclaredToken { attribute: String, token: String },

    #[error("transition on '{attribute}' uses a token set that matches nothing")]
    EmptyTokenSet { attribute: String },

    #[error("attribute '{attribute}' is already registered on {host}")]
    DuplicateAttribute { host: String, attribute: String },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias for definition operations.
pub type DefinitionResult<T> = Result<T, DefinitionError>;
