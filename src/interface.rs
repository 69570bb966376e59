use std::collections::BTreeMap;
use std::fmt;

use crate::TempleResult;

/// A scalar produced by the expression evaluator or supplied as a template
/// variable.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A name that could not be resolved.
    #[default]
    Undefined,
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::Undefined => false,
        }
    }

    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write_float(f, *x),
            Self::Str(s) => f.write_str(s),
            Self::Undefined => Ok(()),
        }
    }
}

/// Writes a float the way Python's `repr` does: whole values keep `.0`,
/// exponents carry a sign and at least two digits, and non-finite values are
/// `nan`, `inf` and `-inf`.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("nan");
    }
    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "inf" } else { "-inf" });
    }

    // Debug switches to exponent form outside 1e-4..1e16, as Python does.
    let text = format!("{:?}", x);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => f.write_str(&text),
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Variables available to expressions while rendering a template.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Context {
    data: BTreeMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<N: AsRef<str>, V: Into<Value>>(&mut self, name: N, value: V) -> &mut Self {
        self.data.insert(name.as_ref().to_string(), value.into());
        self
    }

    pub fn get<N: AsRef<str>>(&self, name: N) -> Option<&Value> {
        self.data.get(name.as_ref())
    }

    pub fn contains<N: AsRef<str>>(&self, name: N) -> bool {
        self.data.contains_key(name.as_ref())
    }
}

impl<N: AsRef<str>, V: Into<Value>> FromIterator<(N, V)> for Context {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut context = Self::new();
        for (name, value) in iter {
            context.insert(name, value);
        }
        context
    }
}

/// Named output regions assembled by one traversal. `"root"` holds the
/// document itself; every other key is an insertion point.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputBuffers {
    regions: BTreeMap<String, String>,
}

impl OutputBuffers {
    pub const ROOT: &'static str = "root";

    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rendered document, or an empty string if nothing was
    /// traversed.
    pub fn root(&self) -> &str {
        self.get(Self::ROOT).unwrap_or_default()
    }

    pub fn get<N: AsRef<str>>(&self, name: N) -> Option<&str> {
        self.regions.get(name.as_ref()).map(String::as_str)
    }

    pub fn contains<N: AsRef<str>>(&self, name: N) -> bool {
        self.regions.contains_key(name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.regions.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Makes sure a region exists, leaving existing content untouched.
    pub(crate) fn ensure(&mut self, name: &str) -> &mut String {
        self.regions.entry(name.to_string()).or_default()
    }

    pub(crate) fn append(&mut self, name: &str, text: &str) {
        self.ensure(name).push_str(text);
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.regions
    }
}

impl<N: Into<String>, T: Into<String>> FromIterator<(N, T)> for OutputBuffers {
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        Self {
            regions: iter
                .into_iter()
                .map(|(name, text)| (name.into(), text.into()))
                .collect(),
        }
    }
}

/// `Loader` locates template sources for the engine.
///
/// Ids returned by `resolve` must be stable: the engine compares them to
/// detect inheritance cycles.
pub trait Loader {
    /// Resolves `reference` to a template id. `from` is the id of the
    /// template containing the reference, or `None` for the entry template.
    ///
    /// # Errors
    /// - If no template matches the reference.
    fn resolve(&self, from: Option<&str>, reference: &str) -> TempleResult<String>;

    /// Returns the source text of a resolved template.
    ///
    /// # Errors
    /// - If the template cannot be read.
    fn load(&self, id: &str) -> TempleResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ntest::timeout(100)]
    fn test_value_display() {
        assert_eq!(Value::Int(-4).to_string(), "-4");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(0.5).to_string(), "0.5");
        assert_eq!(Value::Float(1e16).to_string(), "1e+16");
        assert_eq!(Value::Float(1.5e300).to_string(), "1.5e+300");
        assert_eq!(Value::Float(1e-5).to_string(), "1e-05");
        assert_eq!(Value::Float(123456.25).to_string(), "123456.25");
        assert_eq!(Value::Float(f64::NAN).to_string(), "nan");
        assert_eq!(Value::Float(f64::NEG_INFINITY).to_string(), "-inf");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::Undefined.to_string(), "");
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_truthiness() {
        assert!(Value::Int(3).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(!Value::Undefined.is_truthy());
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_context_builder() {
        let context = Context::new()
            .insert("name", "World")
            .insert("age", 21)
            .to_owned();
        assert_eq!(context.get("name"), Some(&Value::from("World")));
        assert_eq!(context.get("age"), Some(&Value::Int(21)));
        assert!(!context.contains("missing"));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_buffers_root_defaults_to_empty() {
        let mut buffers = OutputBuffers::new();
        assert_eq!(buffers.root(), "");
        buffers.append("root", "a");
        buffers.append("root", "b");
        buffers.ensure("title");
        assert_eq!(buffers.root(), "ab");
        assert_eq!(buffers.get("title"), Some(""));
        assert_eq!(buffers.len(), 2);
    }
}
