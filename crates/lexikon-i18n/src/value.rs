//! Substitution values passed to translate calls
//!
//! A [`Value`] is either a primitive [`Scalar`] (usable by the ICU evaluator and
//! the `{var}` pass) or a [`TagHandler`] that turns the content of a
//! `<name>…</name>` span into a [`Part`].

use crate::Locale;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A primitive substitution value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Text; also accepted by plural arguments when it parses as a number
    Str(String),
    /// Integer number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Boolean; never substituted by the `{var}` pass
    Bool(bool),
    /// Point in time for `date` and `time` arguments
    Date(DateTime<Utc>),
}

impl Scalar {
    /// Numeric view used by plural and number arguments
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Str(s) => s.trim().parse().ok(),
            Self::Bool(_) | Self::Date(_) => None,
        }
    }

    /// Whether the plain `{var}` pass may substitute this value
    pub fn is_text_or_number(&self) -> bool {
        matches!(self, Self::Str(_) | Self::Int(_) | Self::Float(_))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{}", d.to_rfc3339()),
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => |$v:ident| $body:expr),+ $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from($v: $ty) -> Self {
                    $body
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Scalar(Scalar::from(v))
                }
            }
        )+
    };
}

scalar_from! {
    &str => |v| Scalar::Str(v.to_string()),
    String => |v| Scalar::Str(v),
    &String => |v| Scalar::Str(v.clone()),
    i32 => |v| Scalar::Int(i64::from(v)),
    i64 => |v| Scalar::Int(v),
    u32 => |v| Scalar::Int(i64::from(v)),
    usize => |v| Scalar::Int(i64::try_from(v).unwrap_or(i64::MAX)),
    f32 => |v| Scalar::Float(f64::from(v)),
    f64 => |v| Scalar::Float(v),
    bool => |v| Scalar::Bool(v),
    DateTime<Utc> => |v| Scalar::Date(v),
}

/// Something a tag handler produced that is not plain text
///
/// Any `Display + Debug + Send + Sync + 'static` type qualifies; `Display` is
/// used when a rendered sequence is flattened back into a string.
pub trait Renderable: fmt::Display + fmt::Debug + Send + Sync {
    /// Access the concrete type for downcasting
    fn as_any(&self) -> &dyn Any;
}

impl<T> Renderable for T
where
    T: fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Shared handle to a rendered node
pub type Node = Arc<dyn Renderable>;

/// One piece of a rendered translation
#[derive(Debug, Clone)]
pub enum Part {
    /// Literal text
    Text(String),
    /// Opaque value produced by a tag handler
    Node(Node),
}

impl Part {
    /// Wrap any renderable value as a node
    pub fn node<T: Renderable + 'static>(value: T) -> Self {
        Self::Node(Arc::new(value))
    }

    /// The text of a `Text` part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Node(_) => None,
        }
    }

    /// Downcast a `Node` part to its concrete type
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            Self::Node(node) => {
                // Go through the trait object, not the blanket impl on `Arc`
                let inner: &dyn Renderable = &**node;
                inner.as_any().downcast_ref()
            }
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Node(node) => write!(f, "{node}"),
        }
    }
}

impl From<&str> for Part {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Part {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

type TagFn = dyn Fn(Part, &Locale) -> Part + Send + Sync;

/// Callback rendering the content of a `<tag>…</tag>` span
#[derive(Clone)]
pub struct TagHandler(Arc<TagFn>);

impl TagHandler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Part, &Locale) -> Part + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, content: Part, locale: &Locale) -> Part {
        (self.0)(content, locale)
    }
}

impl fmt::Debug for TagHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TagHandler(..)")
    }
}

/// A substitution value
#[derive(Debug, Clone)]
pub enum Value {
    /// Primitive seen by the ICU evaluator and the `{var}` pass
    Scalar(Scalar),
    /// Inline handler for `<name>…</name>` spans
    Tag(TagHandler),
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<TagHandler> for Value {
    fn from(h: TagHandler) -> Self {
        Self::Tag(h)
    }
}

/// Named substitution values for one translate call
///
/// Keys are kept ordered so that the `{var}` pass is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Values {
    entries: BTreeMap<String, Value>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Add an inline tag handler, builder style
    pub fn with_tag<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Part, &Locale) -> Part + Send + Sync + 'static,
    {
        self.set(name, TagHandler::new(handler));
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// The scalar stored under `name`, if any
    pub fn scalar(&self, name: &str) -> Option<&Scalar> {
        match self.entries.get(name) {
            Some(Value::Scalar(s)) => Some(s),
            _ => None,
        }
    }

    /// The inline tag handler stored under `name`, if any
    pub fn tag(&self, name: &str) -> Option<&TagHandler> {
        match self.entries.get(name) {
            Some(Value::Tag(h)) => Some(h),
            _ => None,
        }
    }

    /// Primitive values only; this is what the ICU evaluator sees
    pub fn scalars(&self) -> HashMap<&str, &Scalar> {
        self.entries
            .iter()
            .filter_map(|(k, v)| match v {
                Value::Scalar(s) => Some((k.as_str(), s)),
                Value::Tag(_) => None,
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (k, v) in iter {
            values.set(k, v);
        }
        values
    }
}

/// Build [`Values`] from `name => value` pairs
///
/// ```rust
/// use lexikon_i18n::values;
///
/// let values = values!["name" => "Alice", "count" => 3];
/// assert_eq!(values.len(), 2);
/// ```
#[macro_export]
macro_rules! values {
    () => {
        $crate::Values::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut values = $crate::Values::new();
        $(
            values.set($key, $value);
        )+
        values
    }};
}
