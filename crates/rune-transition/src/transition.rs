//! Declarative transition rules.
//!
//! - `KeyTarget`: which transition keys a rule applies to
//! - `PropertyTarget`: which properties of those keys it animates
//! - `TransitionAnimator`: factory turning a property change into a binding
//! - `TransitionSpec`: one rule (keys × properties → animator)
//! - `TransitionSet`: rules composed in parallel or in sequence
//!
//! # Example
//!
//! ```ignore
//! use rune_transition::{AnimatedProperty, TransitionSet, TransitionSpec};
//!
//! let transitions = TransitionSet::parallel([
//!     TransitionSpec::create("header").animate(AnimatedProperty::Y),
//!     TransitionSpec::create(["a", "b"]).animate(AnimatedProperty::ALL),
//! ]);
//! ```

use std::fmt;
use std::rc::Rc;

use rune_config::{DefaultAnimator, SpringConfig, TimingConfig, TransitionConfig};

use super::binding::AnimationBinding;
use super::easing::Interpolator;
use super::layout::LayoutSnapshot;
use super::property::AnimatedProperty;
use super::spring::SpringTransition;
use super::timing::TimingTransition;
use super::types::{PropertyAnimation, TransitionKey};

/// Selects the transition keys a spec applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyTarget {
    /// Explicit keys. Keys missing from the next frame are ignored.
    Keys(Vec<TransitionKey>),
    /// Every key present in the next frame.
    All,
}

impl From<&str> for KeyTarget {
    fn from(key: &str) -> Self {
        Self::Keys(vec![key.into()])
    }
}

impl From<String> for KeyTarget {
    fn from(key: String) -> Self {
        Self::Keys(vec![key.into()])
    }
}

impl From<TransitionKey> for KeyTarget {
    fn from(key: TransitionKey) -> Self {
        Self::Keys(vec![key])
    }
}

impl<K: Into<TransitionKey>> From<Vec<K>> for KeyTarget {
    fn from(keys: Vec<K>) -> Self {
        Self::Keys(keys.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<TransitionKey>, const N: usize> From<[K; N]> for KeyTarget {
    fn from(keys: [K; N]) -> Self {
        Self::Keys(keys.into_iter().map(Into::into).collect())
    }
}

/// Selects the properties a spec animates.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyTarget {
    Properties(Vec<AnimatedProperty>),
    /// Every property in [`AnimatedProperty::ALL`].
    All,
}

impl From<AnimatedProperty> for PropertyTarget {
    fn from(property: AnimatedProperty) -> Self {
        Self::Properties(vec![property])
    }
}

impl From<Vec<AnimatedProperty>> for PropertyTarget {
    fn from(properties: Vec<AnimatedProperty>) -> Self {
        Self::Properties(properties)
    }
}

impl<const N: usize> From<[AnimatedProperty; N]> for PropertyTarget {
    fn from(properties: [AnimatedProperty; N]) -> Self {
        Self::Properties(properties.to_vec())
    }
}

/// Creates the binding that animates one property change.
pub trait TransitionAnimator {
    fn create_animation(&self, animation: PropertyAnimation) -> Box<dyn AnimationBinding>;
}

impl<F> TransitionAnimator for F
where
    F: Fn(PropertyAnimation) -> Box<dyn AnimationBinding>,
{
    fn create_animation(&self, animation: PropertyAnimation) -> Box<dyn AnimationBinding> {
        self(animation)
    }
}

/// Animator producing [`SpringTransition`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpringAnimator {
    pub config: SpringConfig,
}

impl SpringAnimator {
    pub fn new(config: SpringConfig) -> Self {
        Self { config }
    }
}

impl TransitionAnimator for SpringAnimator {
    fn create_animation(&self, animation: PropertyAnimation) -> Box<dyn AnimationBinding> {
        Box::new(SpringTransition::with_config(animation, &self.config))
    }
}

/// Animator producing [`TimingTransition`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimingAnimator {
    pub config: TimingConfig,
    pub interpolator: Interpolator,
}

impl TimingAnimator {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            config: TimingConfig { duration_ms },
            interpolator: Interpolator::default(),
        }
    }

    pub fn from_config(config: TimingConfig) -> Self {
        Self {
            config,
            interpolator: Interpolator::default(),
        }
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = interpolator;
        self
    }
}

impl TransitionAnimator for TimingAnimator {
    fn create_animation(&self, animation: PropertyAnimation) -> Box<dyn AnimationBinding> {
        Box::new(
            TimingTransition::with_config(animation, &self.config)
                .with_interpolator(self.interpolator),
        )
    }
}

/// The animator used for rules that do not name one, as selected by the
/// `[transitions]` configuration section.
pub fn default_animator(config: &TransitionConfig) -> Rc<dyn TransitionAnimator> {
    match config.animator {
        DefaultAnimator::Spring => Rc::new(SpringAnimator::new(config.spring)),
        DefaultAnimator::Timing => Rc::new(TimingAnimator::from_config(config.timing)),
    }
}

/// A single transition rule: animate `properties` of `keys` with `animator`.
#[derive(Clone)]
pub struct TransitionSpec {
    keys: KeyTarget,
    properties: PropertyTarget,
    /// `None` defers to the manager's configured default animator.
    animator: Option<Rc<dyn TransitionAnimator>>,
}

impl TransitionSpec {
    /// Start a rule for the given keys. Until [`animate`](Self::animate) is
    /// called the rule animates nothing; until [`animator`](Self::animator)
    /// is called it uses the manager's default animator.
    pub fn create(keys: impl Into<KeyTarget>) -> Self {
        Self {
            keys: keys.into(),
            properties: PropertyTarget::Properties(Vec::new()),
            animator: None,
        }
    }

    /// Selector matching every key of the next frame.
    pub fn all_keys() -> KeyTarget {
        KeyTarget::All
    }

    /// Selector matching every known property.
    pub fn all_properties() -> PropertyTarget {
        PropertyTarget::All
    }

    pub fn animate(mut self, properties: impl Into<PropertyTarget>) -> Self {
        self.properties = properties.into();
        self
    }

    pub fn animator(mut self, animator: impl TransitionAnimator + 'static) -> Self {
        self.animator = Some(Rc::new(animator));
        self
    }

    /// Use an animator that is shared with other specs.
    pub fn shared_animator(mut self, animator: Rc<dyn TransitionAnimator>) -> Self {
        self.animator = Some(animator);
        self
    }

    pub fn keys(&self) -> &KeyTarget {
        &self.keys
    }

    pub fn properties(&self) -> &PropertyTarget {
        &self.properties
    }

    pub(crate) fn animator_ref(&self) -> Option<&Rc<dyn TransitionAnimator>> {
        self.animator.as_ref()
    }

    /// Resolve this spec's key selector against the next frame.
    ///
    /// Explicit keys keep declaration order, duplicates removed, and keys
    /// absent from `next` are dropped. "All keys" yields `next`'s keys in
    /// insertion order.
    pub fn resolve_keys(&self, next: &LayoutSnapshot) -> Vec<TransitionKey> {
        match &self.keys {
            KeyTarget::All => next.keys().cloned().collect(),
            KeyTarget::Keys(keys) => {
                let mut resolved: Vec<TransitionKey> = Vec::with_capacity(keys.len());
                for key in keys {
                    if next.contains_key(key.as_str()) && !resolved.contains(key) {
                        resolved.push(key.clone());
                    }
                }
                resolved
            }
        }
    }

    /// Resolve this spec's property selector.
    pub fn resolve_properties(&self) -> Vec<AnimatedProperty> {
        match &self.properties {
            PropertyTarget::All => AnimatedProperty::ALL.to_vec(),
            PropertyTarget::Properties(properties) => {
                let mut resolved: Vec<AnimatedProperty> = Vec::with_capacity(properties.len());
                for property in properties {
                    if !resolved.contains(property) {
                        resolved.push(*property);
                    }
                }
                resolved
            }
        }
    }
}

impl fmt::Debug for TransitionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionSpec")
            .field("keys", &self.keys)
            .field("properties", &self.properties)
            .field("default_animator", &self.animator.is_none())
            .finish_non_exhaustive()
    }
}

/// A tree of transition rules.
///
/// Composition order is declaration order: when two specs name the same
/// (key, property) pair, the one reached first by [`flatten`](Self::flatten)
/// wins.
#[derive(Debug, Clone)]
pub enum TransitionSet {
    Single(TransitionSpec),
    /// Children run together.
    Parallel(Vec<TransitionSet>),
    /// Children are declared in order.
    Sequential(Vec<TransitionSet>),
}

impl Default for TransitionSet {
    /// An empty parallel set: no transitions.
    fn default() -> Self {
        Self::Parallel(Vec::new())
    }
}

impl From<TransitionSpec> for TransitionSet {
    fn from(spec: TransitionSpec) -> Self {
        Self::Single(spec)
    }
}

impl TransitionSet {
    pub fn parallel<I, T>(children: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TransitionSet>,
    {
        Self::Parallel(children.into_iter().map(Into::into).collect())
    }

    pub fn sequential<I, T>(children: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TransitionSet>,
    {
        Self::Sequential(children.into_iter().map(Into::into).collect())
    }

    /// Leaf specs in depth-first declaration order.
    pub fn flatten(&self) -> Vec<&TransitionSpec> {
        let mut specs = Vec::new();
        self.collect_specs(&mut specs);
        specs
    }

    fn collect_specs<'a>(&'a self, out: &mut Vec<&'a TransitionSpec>) {
        match self {
            Self::Single(spec) => out.push(spec),
            Self::Parallel(children) | Self::Sequential(children) => {
                for child in children {
                    child.collect_specs(out);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::Parallel(children) | Self::Sequential(children) => {
                children.iter().all(TransitionSet::is_empty)
            }
        }
    }
}
