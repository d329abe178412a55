//! Parameter structures handed to the encoders.
//!
//! A [`Parameters`] value is an ordered mapping from keys to
//! [`ParameterValue`]s. Values are built explicitly by the caller, either
//! through `From` conversions, the [`params!`](crate::params) macro, or the
//! [`ToParameters`] / [`ToParameterValue`] traits (derivable with
//! `#[derive(Parameters)]`).
//!
//! # Example
//!
//! ```
//! use parcel_core::{ParameterValue, Parameters, params};
//!
//! let parameters = params! {
//!     "q" => "rust",
//!     "page" => 2,
//!     "filter" => params! { "tags" => vec!["http", "encoding"] },
//! };
//!
//! assert_eq!(parameters.len(), 3);
//! assert_eq!(parameters.get("page"), Some(&ParameterValue::from(2)));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::Part;

// ============================================================================
// Scalar
// ============================================================================

/// A leaf value: string, number or boolean.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Text.
    String(String),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
}

/// Canonical, locale-independent text form used by the flattener.
///
/// Integers never carry a fractional part, whole floats print without `.0`,
/// and booleans print as `true`/`false`.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{value}"),
            Self::UInt(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(value) => serializer.serialize_str(value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::UInt(value) => serializer.serialize_u64(*value),
            Self::Float(value) if !value.is_finite() => Err(S::Error::custom(format!(
                "non-finite number {value} cannot be serialized"
            ))),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::Bool(value) => serializer.serialize_bool(*value),
        }
    }
}

// ============================================================================
// ParameterValue
// ============================================================================

/// One node of a parameter structure.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    /// A leaf value.
    Scalar(Scalar),
    /// Nested mapping, flattened as `key[sub]`.
    Mapping(Parameters),
    /// Ordered sequence, flattened as repeated `key[]`.
    Sequence(Vec<ParameterValue>),
    /// Binary payload; only multipart encoding accepts it.
    Attachment(Part),
}

impl ParameterValue {
    /// Returns the scalar if this is a leaf value.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Returns `true` if this value or anything nested in it is an attachment.
    #[must_use]
    pub fn contains_attachment(&self) -> bool {
        match self {
            Self::Scalar(_) => false,
            Self::Mapping(parameters) => parameters.values().any(Self::contains_attachment),
            Self::Sequence(items) => items.iter().any(Self::contains_attachment),
            Self::Attachment(_) => true,
        }
    }
}

impl Serialize for ParameterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(scalar) => scalar.serialize(serializer),
            Self::Mapping(parameters) => parameters.serialize(serializer),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Attachment(part) => Err(S::Error::custom(format!(
                "attachment '{}' cannot be serialized",
                part.name()
            ))),
        }
    }
}

macro_rules! impl_from_scalar {
    ($variant:ident: $($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }

            impl From<$ty> for ParameterValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Scalar::from(value))
                }
            }

            impl ToParameterValue for $ty {
                fn to_parameter_value(&self) -> ParameterValue {
                    ParameterValue::from(*self)
                }
            }
        )+
    };
}

impl_from_scalar!(Int: i8, i16, i32, i64);
impl_from_scalar!(UInt: u8, u16, u32, u64);
impl_from_scalar!(Float: f32, f64);
impl_from_scalar!(Bool: bool);

impl From<usize> for Scalar {
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<usize> for ParameterValue {
    fn from(value: usize) -> Self {
        Self::Scalar(Scalar::from(value))
    }
}

impl ToParameterValue for usize {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::from(*self)
    }
}

impl From<isize> for Scalar {
    fn from(value: isize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<isize> for ParameterValue {
    fn from(value: isize) -> Self {
        Self::Scalar(Scalar::from(value))
    }
}

impl ToParameterValue for isize {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::from(*self)
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<char> for Scalar {
    fn from(value: char) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Scalar> for ParameterValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::String(value))
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::from(value))
    }
}

impl From<char> for ParameterValue {
    fn from(value: char) -> Self {
        Self::Scalar(Scalar::from(value))
    }
}

impl From<Parameters> for ParameterValue {
    fn from(value: Parameters) -> Self {
        Self::Mapping(value)
    }
}

impl From<Part> for ParameterValue {
    fn from(value: Part) -> Self {
        Self::Attachment(value)
    }
}

impl<T: Into<ParameterValue>> From<Vec<T>> for ParameterValue {
    fn from(values: Vec<T>) -> Self {
        Self::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParameterValue>, const N: usize> From<[T; N]> for ParameterValue {
    fn from(values: [T; N]) -> Self {
        Self::Sequence(values.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// An insertion-ordered mapping from keys to parameter values.
///
/// Inserting an existing key replaces its value in place, so the position
/// of the first insertion is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    entries: Vec<(String, ParameterValue)>,
}

impl Parameters {
    /// Create an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a value, returning the previous value for that key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Option<ParameterValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<ParameterValue> {
        let index = self.entries.iter().position(|(existing, _)| existing == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &ParameterValue> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Append every entry of `other`, replacing values of keys present in both.
    pub fn merge(&mut self, other: Self) {
        for (key, value) in other {
            self.insert(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<ParameterValue>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut parameters = Self::new();
        parameters.extend(iter);
        parameters
    }
}

impl<K: Into<String>, V: Into<ParameterValue>> Extend<(K, V)> for Parameters {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Parameters {
    type Item = (String, ParameterValue);
    type IntoIter = std::vec::IntoIter<(String, ParameterValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// ============================================================================
// Conversion traits
// ============================================================================

/// Types that convert into a single [`ParameterValue`].
///
/// Implemented for scalars, strings, sequences, string-keyed maps, parts and
/// parameter structures. `#[derive(Parameters)]` implements it as a mapping.
pub trait ToParameterValue {
    /// Build the parameter value for `self`.
    fn to_parameter_value(&self) -> ParameterValue;
}

/// Types that produce a whole top-level parameter mapping.
///
/// This is automatically implemented by the `#[derive(Parameters)]` macro.
///
/// # Example
///
/// ```ignore
/// use parcel::Parameters;
///
/// #[derive(Parameters)]
/// #[parameters(rename_all = "camelCase")]
/// struct Search {
///     query: String,
///     page_size: u32,
///     cursor: Option<String>,
/// }
/// ```
pub trait ToParameters {
    /// Build the parameter mapping for `self`.
    fn to_parameters(&self) -> Parameters;
}

impl<T: ToParameterValue + ?Sized> ToParameterValue for &T {
    fn to_parameter_value(&self) -> ParameterValue {
        (**self).to_parameter_value()
    }
}

impl ToParameterValue for str {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::from(self)
    }
}

impl ToParameterValue for String {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::from(self.as_str())
    }
}

impl ToParameterValue for char {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::from(*self)
    }
}

impl ToParameterValue for Scalar {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::Scalar(self.clone())
    }
}

impl ToParameterValue for ParameterValue {
    fn to_parameter_value(&self) -> ParameterValue {
        self.clone()
    }
}

impl ToParameterValue for Part {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::Attachment(self.clone())
    }
}

impl ToParameterValue for Parameters {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::Mapping(self.clone())
    }
}

impl<T: ToParameterValue> ToParameterValue for [T] {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::Sequence(self.iter().map(ToParameterValue::to_parameter_value).collect())
    }
}

impl<T: ToParameterValue> ToParameterValue for Vec<T> {
    fn to_parameter_value(&self) -> ParameterValue {
        self.as_slice().to_parameter_value()
    }
}

impl<K: AsRef<str>, V: ToParameterValue> ToParameterValue for BTreeMap<K, V> {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::Mapping(self.to_parameters())
    }
}

impl<K: AsRef<str>, V: ToParameterValue, S> ToParameterValue for HashMap<K, V, S> {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::Mapping(self.to_parameters())
    }
}

impl ToParameters for Parameters {
    fn to_parameters(&self) -> Parameters {
        self.clone()
    }
}

impl<T: ToParameters + ?Sized> ToParameters for &T {
    fn to_parameters(&self) -> Parameters {
        (**self).to_parameters()
    }
}

impl<K: AsRef<str>, V: ToParameterValue> ToParameters for BTreeMap<K, V> {
    fn to_parameters(&self) -> Parameters {
        self.iter().map(map_entry).collect()
    }
}

/// Entries are sorted by key so that the output does not depend on the
/// hasher.
impl<K: AsRef<str>, V: ToParameterValue, S> ToParameters for HashMap<K, V, S> {
    fn to_parameters(&self) -> Parameters {
        let mut entries: Vec<_> = self.iter().map(map_entry).collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries.into_iter().collect()
    }
}

fn map_entry<K, V>((key, value): (&K, &V)) -> (String, ParameterValue)
where
    K: AsRef<str>,
    V: ToParameterValue,
{
    (key.as_ref().to_string(), value.to_parameter_value())
}

/// Build a [`Parameters`] mapping from `key => value` pairs.
///
/// Values go through `Into<ParameterValue>`, so nested `params!` calls,
/// vectors, arrays and [`Part`]s can be mixed with scalars.
///
/// ```
/// use parcel_core::params;
///
/// let parameters = params! { "a" => params! { "b" => [1, 2] } };
/// assert_eq!(parameters.keys().collect::<Vec<_>>(), ["a"]);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Parameters::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut parameters = $crate::Parameters::new();
        $(
            parameters.insert($key, $value);
        )+
        parameters
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn scalar_canonical_text() {
        assert_eq!(Scalar::from(42).to_string(), "42");
        assert_eq!(Scalar::from(-7_i64).to_string(), "-7");
        assert_eq!(Scalar::from(u64::MAX).to_string(), "18446744073709551615");
        assert_eq!(Scalar::from(2.0).to_string(), "2");
        assert_eq!(Scalar::from(1.5).to_string(), "1.5");
        assert_eq!(Scalar::from(1.5_f32).to_string(), "1.5");
        assert_eq!(Scalar::from(true).to_string(), "true");
        assert_eq!(Scalar::from(false).to_string(), "false");
        assert_eq!(Scalar::from("héllo").to_string(), "héllo");
    }

    #[test]
    fn parameters_keep_insertion_order() {
        let parameters = params! { "z" => 1, "a" => 2, "m" => 3 };
        assert_eq!(parameters.keys().collect::<Vec<_>>(), ["z", "a", "m"]);
    }

    #[test]
    fn parameters_insert_replaces_in_place() {
        let mut parameters = params! { "a" => 1, "b" => 2 };
        let previous = parameters.insert("a", "one");

        assert_eq!(previous, Some(ParameterValue::from(1)));
        assert_eq!(parameters.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(parameters.get("a"), Some(&ParameterValue::from("one")));
    }

    #[test]
    fn parameters_remove_and_merge() {
        let mut parameters = params! { "a" => 1, "b" => 2 };
        assert_eq!(parameters.remove("a"), Some(ParameterValue::from(1)));
        assert!(parameters.remove("a").is_none());

        parameters.merge(params! { "b" => 20, "c" => 3 });
        assert_eq!(parameters.keys().collect::<Vec<_>>(), ["b", "c"]);
        assert_eq!(parameters.get("b"), Some(&ParameterValue::from(20)));
    }

    #[test]
    fn empty_params_macro() {
        let parameters = params! {};
        assert!(parameters.is_empty());
    }

    #[test]
    fn contains_attachment_looks_through_nesting() {
        let plain = ParameterValue::from(params! { "a" => [1, 2] });
        assert!(!plain.contains_attachment());

        let nested = ParameterValue::from(params! {
            "user" => params! { "files" => vec![Part::bytes("ignored", vec![0])] },
        });
        assert!(nested.contains_attachment());
    }

    #[test]
    fn hash_map_entries_are_sorted() {
        let map: HashMap<&str, i32> = [("b", 2), ("c", 3), ("a", 1)].into_iter().collect();
        let parameters = map.to_parameters();
        assert_eq!(parameters.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
    }

    #[test]
    fn to_parameter_value_for_collections() {
        let tags = vec!["x".to_string(), "y".to_string()];
        assert_eq!(
            tags.to_parameter_value(),
            ParameterValue::Sequence(vec!["x".into(), "y".into()])
        );

        let mut map = BTreeMap::new();
        map.insert("k", 1_u8);
        assert_eq!(
            map.to_parameter_value(),
            ParameterValue::Mapping(params! { "k" => 1_u8 })
        );
    }

    #[test]
    fn serialize_non_finite_float_fails() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = serde_json::to_vec(&Scalar::Float(value)).expect_err("not JSON");
            assert!(err.to_string().contains("non-finite number"));
        }
        assert_eq!(
            serde_json::to_vec(&Scalar::from(0.25_f32)).expect("finite"),
            b"0.25"
        );
    }

    #[test]
    fn serialize_attachment_fails() {
        let value = ParameterValue::from(Part::bytes("file", vec![1]));
        let err = serde_json::to_vec(&value).expect_err("attachments are not JSON");
        assert!(err.to_string().contains("attachment 'file'"));
    }
}
