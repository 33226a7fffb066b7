use std::fmt;
use std::sync::Arc;

use em_types::{ChangeEvent, Phase, TokenSet};

/// Error type hooks return. Any error can be boxed into it with `?`.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

pub type HookResult = Result<(), HookError>;

/// A transition hook: receives the host plus the old and new raw values.
pub type Hook<H> = Arc<dyn Fn(&mut H, Option<&str>, Option<&str>) -> HookResult + Send + Sync>;

/// One registered `(phase, from, to, hook)` entry.
pub struct TransitionRule<H> {
    phase: Phase,
    from: TokenSet,
    to: TokenSet,
    hook: Hook<H>,
}

impl<H> TransitionRule<H> {
    /// Rule for an explicit phase.
    pub fn new<F>(phase: Phase, from: impl Into<TokenSet>, to: impl Into<TokenSet>, hook: F) -> Self
    where
        F: Fn(&mut H, Option<&str>, Option<&str>) -> HookResult + Send + Sync + 'static,
    {
        Self {
            phase,
            from: from.into(),
            to: to.into(),
            hook: Arc::new(hook),
        }
    }

    /// Rule fired before the commit point.
    pub fn before<F>(from: impl Into<TokenSet>, to: impl Into<TokenSet>, hook: F) -> Self
    where
        F: Fn(&mut H, Option<&str>, Option<&str>) -> HookResult + Send + Sync + 'static,
    {
        Self::new(Phase::Before, from, to, hook)
    }

    /// Rule fired after the commit point.
    pub fn after<F>(from: impl Into<TokenSet>, to: impl Into<TokenSet>, hook: F) -> Self
    where
        F: Fn(&mut H, Option<&str>, Option<&str>) -> HookResult + Send + Sync + 'static,
    {
        Self::new(Phase::After, from, to, hook)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Values the attribute may change from.
    pub fn from_set(&self) -> &TokenSet {
        &self.from
    }

    /// Values the attribute may change to.
    pub fn to_set(&self) -> &TokenSet {
        &self.to
    }

    /// Same phase, and both ends of the change fall inside the rule's sets.
    pub fn matches(&self, phase: Phase, event: &ChangeEvent) -> bool {
        self.phase == phase
            && self.from.matches(event.old_value())
            && self.to.matches(event.new_value())
    }

    /// Run the hook with the event's old and new values.
    pub fn invoke(&self, host: &mut H, event: &ChangeEvent) -> HookResult {
        (self.hook)(host, event.old_value(), event.new_value())
    }
}

impl<H> Clone for TransitionRule<H> {
    fn clone(&self) -> Self {
        Self {
            phase: self.phase,
            from: self.from.clone(),
            to: self.to.clone(),
            hook: Arc::clone(&self.hook),
        }
    }
}

impl<H> fmt::Debug for TransitionRule<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionRule")
            .field("phase", &self.phase)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}
