//! The ordered fragments that make up one style definition.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::component::ComponentStyle;
use crate::keyframes::Keyframes;

/// A function fragment, evaluated against the current execution context.
pub type StyleFn = Arc<dyn Fn(&ExecutionContext) -> Interpolation + Send + Sync>;

/// The props/theme bag that function fragments are evaluated against.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecutionContext {
    pub props: Map<String, Value>,
    pub theme: Value,
}

impl ExecutionContext {
    /// An empty context: no props, `null` theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a JSON object of props.
    ///
    /// Non-object values yield an empty props map.
    pub fn from_props(props: Value) -> Self {
        let props = match props {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            props,
            theme: Value::Null,
        }
    }

    /// Builder method: set one prop and return self.
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Builder method: set the theme and return self.
    pub fn with_theme(mut self, theme: Value) -> Self {
        self.theme = theme;
        self
    }

    #[inline]
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// String prop, `None` when absent or not a string.
    #[inline]
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// Look up a dot-separated path in the theme (`"colors.primary"`).
    pub fn theme_value(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.theme, |node, segment| node.get(segment))
    }
}

/// An ordered CSS object: property → value, nested objects become blocks.
pub type CssObject = Vec<(String, Interpolation)>;

/// One fragment of a rule set.
#[derive(Clone)]
pub enum Interpolation {
    Null,
    Bool(bool),
    Number(f64),
    Str(Cow<'static, str>),
    /// A nested rule set, flattened in place.
    Rules(RuleSet),
    /// Object-style CSS (`{ borderWidth: 0 }`).
    Object(CssObject),
    /// Reference to another style definition, resolves to its selector.
    Component(Arc<ComponentStyle>),
    /// Reference to a keyframes definition, resolves to its animation name.
    Keyframes(Arc<Keyframes>),
    Func(StyleFn),
}

impl Interpolation {
    /// Wrap a closure as a function fragment.
    pub fn func<F, R>(f: F) -> Self
    where
        F: Fn(&ExecutionContext) -> R + Send + Sync + 'static,
        R: Into<Interpolation>,
    {
        Self::Func(Arc::new(move |ctx| f(ctx).into()))
    }

    /// Values that are dropped during flattening.
    ///
    /// `0` is not falsish.
    pub fn is_falsish(&self) -> bool {
        match self {
            Self::Null | Self::Bool(false) => true,
            Self::Str(s) => s.is_empty(),
            _ => false,
        }
    }

    /// True when the fragment contains no function, directly or nested.
    ///
    /// Keyframes references count as dynamic: they queue their own rule on
    /// every generation pass, which the static cache would skip.
    pub fn is_static(&self) -> bool {
        match self {
            Self::Func(_) | Self::Keyframes(_) => false,
            Self::Rules(rules) => rules.is_static(),
            Self::Object(obj) => obj.iter().all(|(_, v)| v.is_static()),
            _ => true,
        }
    }
}

impl fmt::Debug for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Rules(r) => f.debug_tuple("Rules").field(r).finish(),
            Self::Object(o) => f.debug_tuple("Object").field(o).finish(),
            Self::Component(c) => f.debug_tuple("Component").field(&c.component_id()).finish(),
            Self::Keyframes(k) => f.debug_tuple("Keyframes").field(&k.id()).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl From<&'static str> for Interpolation {
    fn from(s: &'static str) -> Self {
        Self::Str(Cow::Borrowed(s))
    }
}

impl From<String> for Interpolation {
    fn from(s: String) -> Self {
        Self::Str(Cow::Owned(s))
    }
}

impl From<&String> for Interpolation {
    fn from(s: &String) -> Self {
        Self::Str(Cow::Owned(s.clone()))
    }
}

impl From<bool> for Interpolation {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Interpolation {
                fn from(n: $ty) -> Self {
                    Self::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(i32, i64, u32, u64, usize, f32, f64);

impl<T: Into<Interpolation>> From<Option<T>> for Interpolation {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<RuleSet> for Interpolation {
    fn from(rules: RuleSet) -> Self {
        Self::Rules(rules)
    }
}

impl From<Arc<ComponentStyle>> for Interpolation {
    fn from(style: Arc<ComponentStyle>) -> Self {
        Self::Component(style)
    }
}

impl From<&Arc<ComponentStyle>> for Interpolation {
    fn from(style: &Arc<ComponentStyle>) -> Self {
        Self::Component(Arc::clone(style))
    }
}

impl From<Arc<Keyframes>> for Interpolation {
    fn from(keyframes: Arc<Keyframes>) -> Self {
        Self::Keyframes(keyframes)
    }
}

impl From<&Arc<Keyframes>> for Interpolation {
    fn from(keyframes: &Arc<Keyframes>) -> Self {
        Self::Keyframes(Arc::clone(keyframes))
    }
}

impl From<Value> for Interpolation {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::Str(Cow::Owned(s)),
            Value::Array(items) => Self::Rules(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&Value> for Interpolation {
    fn from(value: &Value) -> Self {
        Self::from(value.clone())
    }
}

/// Ordered sequence of fragments defining one style.
///
/// Cheap to clone; the fragments are shared.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    parts: Arc<[Interpolation]>,
}

impl RuleSet {
    /// Build a rule set, dropping empty literal strings.
    pub fn new(parts: Vec<Interpolation>) -> Self {
        let parts: Vec<Interpolation> = parts
            .into_iter()
            .filter(|p| !matches!(p, Interpolation::Str(s) if s.is_empty()))
            .collect();
        Self {
            parts: parts.into(),
        }
    }

    /// A rule set holding a single literal CSS fragment.
    pub fn literal(css: impl Into<String>) -> Self {
        Self::new(vec![Interpolation::from(css.into())])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Interpolation> {
        self.parts.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interpolation> + '_ {
        self.parts.iter()
    }

    /// True when no fragment is evaluable, i.e. the CSS is the same for every
    /// execution context.
    pub fn is_static(&self) -> bool {
        self.parts.iter().all(Interpolation::is_static)
    }
}

impl FromIterator<Interpolation> for RuleSet {
    fn from_iter<T: IntoIterator<Item = Interpolation>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Interpolation;
    type IntoIter = std::slice::Iter<'a, Interpolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.iter()
    }
}
