use std::sync::Arc;

/// Base representation a value object is layered onto.
///
/// The base is built once from the raw token and exposed through `Deref` on
/// [`ValueObject`](crate::ValueObject), so domain methods defined on a custom
/// base are callable directly on the value object.
///
/// ```
/// use em_value::BaseValue;
///
/// #[derive(Clone)]
/// struct Severity(String);
///
/// impl Severity {
///     fn pages_on_call(&self) -> bool {
///         self.0 == "critical"
///     }
/// }
///
/// impl BaseValue for Severity {
///     fn from_raw(raw: &str) -> Self {
///         Severity(raw.to_owned())
///     }
/// }
///
/// assert!(Severity::from_raw("critical").pages_on_call());
/// ```
pub trait BaseValue: Clone + Send + Sync + 'static {
    fn from_raw(raw: &str) -> Self;
}

impl BaseValue for String {
    fn from_raw(raw: &str) -> Self {
        raw.to_owned()
    }
}

impl BaseValue for Arc<str> {
    fn from_raw(raw: &str) -> Self {
        Arc::from(raw)
    }
}
