use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use em_types::naming::{default_label_scope, short_type_name};
use em_types::{AttributeConfig, ChangeEvent, DefinitionResult, EnumDefinition, Phase, TokenSet};
use em_value::{BaseValue, LabelResolver, RawLabels, ValueClass, ValueObject, ValueRegistry};
use tracing::{debug, trace};

use crate::error::TransitionError;
use crate::machine::Machine;
use crate::record::Record;
use crate::rule::{HookResult, TransitionRule};

type RawGetter<H> = Box<dyn for<'a> Fn(&'a H) -> Option<&'a str> + Send + Sync>;

// ---------------------------------------------------------------------------
// EnumAttribute
// ---------------------------------------------------------------------------

/// One enum attribute of host type `H`, declared once and shared by every
/// instance of `H`.
///
/// Reads go through [`read`](Self::read), which wraps the host's raw field in
/// a memoized [`ValueObject`] linked back to the instance. Save-time changes
/// go through [`dispatch`](Self::dispatch).
pub struct EnumAttribute<H, V: BaseValue = String> {
    registry: ValueRegistry<V>,
    machine: Machine<H>,
    getter: RawGetter<H>,
}

impl<H: Record + 'static, V: BaseValue> EnumAttribute<H, V> {
    /// Start declaring `attribute` with `tokens`, reading the host's raw
    /// value through `getter`.
    pub fn builder<I, S, G>(attribute: impl Into<String>, tokens: I, getter: G) -> EnumAttributeBuilder<H, V>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        G: for<'a> Fn(&'a H) -> Option<&'a str> + Send + Sync + 'static,
    {
        EnumAttributeBuilder {
            attribute: attribute.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
            getter: Box::new(getter),
            label_scope: None,
            labels: Arc::new(RawLabels),
            rules: Vec::new(),
            _base: PhantomData,
        }
    }

    /// Start declaring an attribute from its configuration.
    pub fn from_config<G>(config: &AttributeConfig, getter: G) -> EnumAttributeBuilder<H, V>
    where
        G: for<'a> Fn(&'a H) -> Option<&'a str> + Send + Sync + 'static,
    {
        let mut builder = Self::builder(config.attribute.clone(), config.tokens.iter().cloned(), getter);
        builder.label_scope = config.label_scope.clone();
        builder
    }

    /// Attribute name.
    pub fn name(&self) -> &str {
        self.machine.attribute()
    }

    /// Declared tokens.
    pub fn definition(&self) -> &EnumDefinition {
        self.machine.definition()
    }

    /// Canonical value objects for this attribute.
    pub fn registry(&self) -> &ValueRegistry<V> {
        &self.registry
    }

    /// Rule table backing `dispatch`.
    pub fn machine(&self) -> &Machine<H> {
        &self.machine
    }

    /// Registered rules in dispatch order.
    pub fn rules(&self) -> &[TransitionRule<H>] {
        self.machine.rules()
    }

    /// Canonical, parentless value object for `raw`.
    pub fn value(&self, raw: &str) -> Arc<ValueObject<V>> {
        self.registry.get(raw)
    }

    /// The host's underlying raw value, ignoring any forced value.
    pub fn raw<'a>(&self, host: &'a H) -> Option<&'a str> {
        (self.getter)(host)
    }

    /// The attribute as seen through its value object.
    ///
    /// Returns `None` when nothing is set. Repeated reads without an
    /// intervening change return the same `Arc`. Inside a before-hook for a
    /// change from a value, that pre-transition value is reported instead of
    /// the raw field.
    pub fn read(&self, host: &H) -> Option<Arc<ValueObject<V>>> {
        let state = host.record_state();
        let attribute = self.name();
        let raw = match state.forced_value(attribute) {
            Some(forced) => forced,
            None => self.raw(host)?.to_owned(),
        };

        if let Some(cached) = state.cached::<ValueObject<V>>(attribute) {
            if cached.raw() == raw {
                return Some(cached);
            }
        }

        let fresh = Arc::new(self.registry.get(&raw).attach(state.id()));
        trace!(attribute, raw = %raw, instance = %state.id(), "value object recomputed");
        state.store_cached(attribute, Arc::clone(&fresh));
        Some(fresh)
    }

    /// Run `scope` with transition dispatch for this attribute suppressed on
    /// `host`. Dispatch resumes when `scope` returns or unwinds.
    pub fn skip_transitions<R>(&self, host: &mut H, scope: impl FnOnce(&mut H) -> R) -> R {
        let _skip = host.record_state().skip_transitions(self.name());
        scope(host)
    }

    /// Whether any before or after rule is registered.
    pub fn has_transitions(&self) -> bool {
        self.machine.has_transitions()
    }

    /// Dispatch hooks for `event` in `phase`. See [`Machine::dispatch`].
    pub fn dispatch(&self, phase: Phase, host: &mut H, event: &ChangeEvent) -> Result<usize, TransitionError> {
        self.machine.dispatch(phase, host, event)
    }
}

impl<H, V: BaseValue> fmt::Debug for EnumAttribute<H, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumAttribute")
            .field("registry", &self.registry)
            .field("machine", &self.machine)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// EnumAttributeBuilder
// ---------------------------------------------------------------------------

/// Declaration of an [`EnumAttribute`]. Validation happens in
/// [`build`](Self::build).
pub struct EnumAttributeBuilder<H, V: BaseValue = String> {
    attribute: String,
    tokens: Vec<String>,
    getter: RawGetter<H>,
    label_scope: Option<String>,
    labels: Arc<dyn LabelResolver>,
    rules: Vec<TransitionRule<H>>,
    _base: PhantomData<fn() -> V>,
}

impl<H: Record + 'static, V: BaseValue> EnumAttributeBuilder<H, V> {
    /// Override the label scope. Defaults to `<snake_case host type>.<attribute>`.
    pub fn label_scope(mut self, scope: impl Into<String>) -> Self {
        self.label_scope = Some(scope.into());
        self
    }

    /// Resolve labels through `labels` instead of raw values.
    pub fn labels(mut self, labels: Arc<dyn LabelResolver>) -> Self {
        self.labels = labels;
        self
    }

    /// Register a hook that runs before the change is committed.
    pub fn before_transition<F>(mut self, from: impl Into<TokenSet>, to: impl Into<TokenSet>, hook: F) -> Self
    where
        F: Fn(&mut H, Option<&str>, Option<&str>) -> HookResult + Send + Sync + 'static,
    {
        self.rules.push(TransitionRule::before(from, to, hook));
        self
    }

    /// Register a hook that runs once the change is committed.
    pub fn after_transition<F>(mut self, from: impl Into<TokenSet>, to: impl Into<TokenSet>, hook: F) -> Self
    where
        F: Fn(&mut H, Option<&str>, Option<&str>) -> HookResult + Send + Sync + 'static,
    {
        self.rules.push(TransitionRule::after(from, to, hook));
        self
    }

    /// Validate the tokens and every rule, then assemble the attribute.
    pub fn build(self) -> DefinitionResult<EnumAttribute<H, V>> {
        let definition = Arc::new(EnumDefinition::new(self.attribute, self.tokens)?);
        let label_scope = self
            .label_scope
            .unwrap_or_else(|| default_label_scope(short_type_name::<H>(), definition.attribute()));

        let mut machine = Machine::new(Arc::clone(&definition));
        for rule in self.rules {
            machine.register(rule)?;
        }

        debug!(
            host = short_type_name::<H>(),
            attribute = definition.attribute(),
            tokens = definition.len(),
            rules = machine.rules().len(),
            label_scope = %label_scope,
            "enum attribute declared"
        );

        let class = ValueClass::new(definition, label_scope, self.labels);
        Ok(EnumAttribute {
            registry: ValueRegistry::new(class),
            machine,
            getter: self.getter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RecordState;
    use em_types::DefinitionError;
    use em_value::StaticLabels;
    use std::sync::LazyLock;

    #[derive(Clone, Default)]
    struct BlogPost {
        state: Option<String>,
        seen: Vec<Option<String>>,
        meta: RecordState,
    }

    impl Record for BlogPost {
        fn record_state(&self) -> &RecordState {
            &self.meta
        }
    }

    fn post(state: &str) -> BlogPost {
        BlogPost {
            state: Some(state.to_owned()),
            ..BlogPost::default()
        }
    }

    fn state_attribute() -> EnumAttribute<BlogPost> {
        EnumAttribute::builder("state", ["draft", "review", "published"], |p: &BlogPost| {
            p.state.as_deref()
        })
        .build()
        .unwrap()
    }

    #[test]
    fn repeated_reads_return_the_same_object() {
        let attr = state_attribute();
        let post = post("draft");
        let first = attr.read(&post).unwrap();
        let second = attr.read(&post).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.is("draft"));
    }

    #[test]
    fn change_produces_a_new_attached_object() {
        let attr = state_attribute();
        let mut post = post("draft");
        let before = attr.read(&post).unwrap();

        post.state = Some("review".into());
        let after = attr.read(&post).unwrap();
        let canonical = attr.value("review");

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(*after, *canonical);
        assert!(!Arc::ptr_eq(&after, &canonical));
        assert_eq!(after.parent(), Some(post.instance_id()));
        assert_eq!(canonical.parent(), None);
    }

    #[test]
    fn absent_raw_value_reads_as_none() {
        let attr = state_attribute();
        let post = BlogPost::default();
        assert!(attr.read(&post).is_none());
    }

    #[test]
    fn undeclared_raw_value_is_wrapped() {
        let attr = state_attribute();
        let post = post("legacy");
        let value = attr.read(&post).unwrap();
        assert!(!value.is_declared());
        assert_eq!(value.raw(), "legacy");
        assert!(value.predicates().all(|(_, truth)| !truth));
    }

    #[test]
    fn clone_gets_its_own_value_object() {
        let attr = state_attribute();
        let original = post("draft");
        let from_original = attr.read(&original).unwrap();

        let copy = original.clone();
        let from_copy = attr.read(&copy).unwrap();

        assert_ne!(copy.instance_id(), original.instance_id());
        assert!(!Arc::ptr_eq(&from_original, &from_copy));
        assert_eq!(from_copy.parent(), Some(copy.instance_id()));
        assert_eq!(from_original.parent(), Some(original.instance_id()));
        assert_eq!(*from_original, *from_copy);
    }

    static STATE: LazyLock<EnumAttribute<BlogPost>> = LazyLock::new(|| {
        EnumAttribute::builder("state", ["draft", "review"], |p: &BlogPost| p.state.as_deref())
            .before_transition("draft", "review", |post: &mut BlogPost, _, _| {
                let seen = STATE.read(post).map(|v| v.raw().to_owned());
                post.seen.push(seen);
                Ok(())
            })
            .before_transition(TokenSet::absent(), "draft", |post: &mut BlogPost, _, _| {
                let seen = STATE.read(post).map(|v| v.raw().to_owned());
                post.seen.push(seen);
                Ok(())
            })
            .build()
            .unwrap()
    });

    #[test]
    fn before_hook_reads_the_old_value() {
        let mut post = post("review");
        let event = ChangeEvent::new("state", Some("draft"), Some("review"));

        assert_eq!(STATE.dispatch(Phase::Before, &mut post, &event).unwrap(), 1);
        assert_eq!(post.seen, vec![Some("draft".to_string())]);
        assert_eq!(STATE.read(&post).unwrap().raw(), "review");
    }

    #[test]
    fn first_save_hook_reads_the_current_value() {
        let mut post = post("draft");
        let event = ChangeEvent::new("state", None, Some("draft"));

        assert_eq!(STATE.dispatch(Phase::Before, &mut post, &event).unwrap(), 1);
        assert_eq!(post.seen, vec![Some("draft".to_string())]);
        assert_eq!(post.meta.forced_value("state"), None);
    }

    #[test]
    fn forced_value_overrides_the_raw_field() {
        let attr = state_attribute();
        let post = post("review");
        let before = attr.read(&post).unwrap();
        {
            let _guard = post.meta.force_value("state", "draft");
            assert_eq!(attr.read(&post).unwrap().raw(), "draft");
        }
        let after = attr.read(&post).unwrap();
        assert_eq!(after.raw(), "review");
        assert_eq!(*before, *after);
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn skip_transitions_wraps_the_scope() {
        let attr: EnumAttribute<BlogPost> = EnumAttribute::builder("state", ["draft", "review"], |p: &BlogPost| {
            p.state.as_deref()
        })
        .after_transition(TokenSet::any(), TokenSet::any(), |post: &mut BlogPost, _, new| {
            post.seen.push(new.map(str::to_owned));
            Ok(())
        })
        .build()
        .unwrap();

        let mut post = post("draft");
        let event = ChangeEvent::new("state", Some("draft"), Some("review"));
        let fired = attr.skip_transitions(&mut post, |post| {
            post.state = Some("review".into());
            attr.dispatch(Phase::After, post, &event).unwrap()
        });
        assert_eq!(fired, 0);
        assert!(post.seen.is_empty());
        assert!(!post.meta.is_skipping("state"));

        assert_eq!(attr.dispatch(Phase::After, &mut post, &event).unwrap(), 1);
    }

    #[test]
    fn default_label_scope_follows_host_type() {
        let attr = state_attribute();
        assert_eq!(attr.registry().class().label_scope(), "blog_post.state");

        let labels = StaticLabels::new().with("blog_post.state", "draft", "Draft");
        let labelled: EnumAttribute<BlogPost> =
            EnumAttribute::builder("state", ["draft"], |p: &BlogPost| p.state.as_deref())
                .labels(Arc::new(labels))
                .build()
                .unwrap();
        assert_eq!(labelled.read(&post("draft")).unwrap().label(), "Draft");
    }

    #[test]
    fn from_config_uses_configured_scope() {
        let config = AttributeConfig::from_toml(
            r#"
            attribute = "state"
            tokens = ["draft", "published"]
            label_scope = "articles.status"
            "#,
        )
        .unwrap();
        let attr: EnumAttribute<BlogPost> =
            EnumAttribute::from_config(&config, |p: &BlogPost| p.state.as_deref())
                .build()
                .unwrap();
        assert_eq!(attr.registry().class().label_scope(), "articles.status");
        assert_eq!(attr.definition().tokens(), ["draft", "published"]);
    }

    #[test]
    fn build_rejects_bad_declarations() {
        let duplicate = EnumAttribute::<BlogPost>::builder("state", ["draft", "draft"], |p: &BlogPost| {
            p.state.as_deref()
        })
        .build()
        .unwrap_err();
        assert!(matches!(duplicate, DefinitionError::DuplicateToken { .. }));

        let undeclared = EnumAttribute::<BlogPost>::builder("state", ["draft"], |p: &BlogPost| {
            p.state.as_deref()
        })
        .after_transition("draft", "archived", |_: &mut BlogPost, _, _| Ok(()))
        .build()
        .unwrap_err();
        assert!(matches!(undeclared, DefinitionError::UndeclaredToken { .. }));
    }
}
