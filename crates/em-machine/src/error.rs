use em_types::{ChangeEvent, Phase};

use crate::rule::HookError;

/// Errors raised while dispatching transition hooks.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    /// A before-transition hook failed; the save must not commit.
    #[error("before-transition hook failed on {event}: {source}")]
    BeforeHook {
        event: ChangeEvent,
        #[source]
        source: HookError,
    },

    /// An after-transition hook failed; the change is already committed.
    #[error("after-transition hook failed on {event}: {source}")]
    AfterHook {
        event: ChangeEvent,
        #[source]
        source: HookError,
    },
}

impl TransitionError {
    pub(crate) fn hook_failed(phase: Phase, event: &ChangeEvent, source: HookError) -> Self {
        let event = event.clone();
        match phase {
            Phase::Before => Self::BeforeHook { event, source },
            Phase::After => Self::AfterHook { event, source },
        }
    }

    /// Phase the failing hook was registered for.
    pub fn phase(&self) -> Phase {
        match self {
            Self::BeforeHook { .. } => Phase::Before,
            Self::AfterHook { .. } => Phase::After,
        }
    }

    /// The change that was being dispatched.
    pub fn event(&self) -> &ChangeEvent {
        match self {
            Self::BeforeHook { event, .. } | Self::AfterHook { event, .. } => event,
        }
    }

    /// Attribute whose hook failed.
    pub fn attribute(&self) -> &str {
        &self.event().attribute
    }

    /// Whether the failure happened after the commit point.
    pub fn is_post_commit(&self) -> bool {
        matches!(self, Self::AfterHook { .. })
    }
}
