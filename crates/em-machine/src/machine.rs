use std::sync::Arc;

use em_types::{ChangeEvent, DefinitionResult, EnumDefinition, Phase};
use tracing::{debug, trace, warn};

use crate::error::TransitionError;
use crate::record::Record;
use crate::rule::TransitionRule;

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// Ordered rule table for one enum attribute of host type `H`.
///
/// Rules fire in registration order. The machine never rejects a transition;
/// it only reacts to changes the persistence adapter reports.
pub struct Machine<H> {
    definition: Arc<EnumDefinition>,
    rules: Vec<TransitionRule<H>>,
}

impl<H> Machine<H> {
    /// Create an empty rule table for `definition`.
    pub fn new(definition: Arc<EnumDefinition>) -> Self {
        Self {
            definition,
            rules: Vec::new(),
        }
    }

    /// Name of the attribute the rules belong to.
    pub fn attribute(&self) -> &str {
        self.definition.attribute()
    }

    /// Declared tokens the rules are checked against.
    pub fn definition(&self) -> &EnumDefinition {
        &self.definition
    }

    /// Append a rule. Explicit token sets must only name declared tokens
    /// and must match at least one value.
    pub fn register(&mut self, rule: TransitionRule<H>) -> DefinitionResult<()> {
        self.definition.validate_set(rule.from_set())?;
        self.definition.validate_set(rule.to_set())?;
        self.rules.push(rule);
        Ok(())
    }

    /// Registered rules in dispatch order.
    pub fn rules(&self) -> &[TransitionRule<H>] {
        &self.rules
    }

    /// Whether any rule is registered. Attributes without rules never need
    /// save-time dispatch.
    pub fn has_transitions(&self) -> bool {
        !self.rules.is_empty()
    }

    /// Rules that would fire for `event` in `phase`, in dispatch order.
    pub fn matching<'a>(
        &'a self,
        phase: Phase,
        event: &'a ChangeEvent,
    ) -> impl Iterator<Item = &'a TransitionRule<H>> + 'a {
        self.rules.iter().filter(move |rule| rule.matches(phase, event))
    }
}

impl<H: Record> Machine<H> {
    /// Run every rule matching `event` in `phase` against `host`.
    ///
    /// Returns the number of hooks that ran. Stops at the first failing hook.
    /// While a before-hook runs, the attribute reads as the event's old value
    /// when there is one; a change from absent installs no override.
    pub fn dispatch(
        &self,
        phase: Phase,
        host: &mut H,
        event: &ChangeEvent,
    ) -> Result<usize, TransitionError> {
        let attribute = self.attribute();
        if event.attribute != attribute {
            warn!(
                attribute,
                event_attribute = %event.attribute,
                "change event routed to the wrong machine"
            );
            return Ok(0);
        }
        if host.record_state().is_skipping(attribute) {
            debug!(attribute, %phase, "transitions skipped");
            return Ok(0);
        }

        let mut fired = 0;
        for rule in self.matching(phase, event) {
            trace!(attribute, %phase, from = ?event.old, to = ?event.new, "running transition hook");
            let outcome = match phase {
                Phase::Before => {
                    let _forced = event
                        .old_value()
                        .map(|old| host.record_state().force_value(attribute, old));
                    rule.invoke(host, event)
                }
                Phase::After => rule.invoke(host, event),
            };
            if let Err(source) = outcome {
                warn!(attribute, %phase, error = %source, "transition hook failed");
                return Err(TransitionError::hook_failed(phase, event, source));
            }
            fired += 1;
        }

        if fired > 0 {
            debug!(attribute, %phase, fired, "transition hooks dispatched");
        }
        Ok(fired)
    }
}

impl<H> std::fmt::Debug for Machine<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("attribute", &self.attribute())
            .field("rules", &self.rules)
            .finish()
    }
}
