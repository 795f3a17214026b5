//! Captured argument values.
//!
//! Arguments are captured eagerly into [`ArgValue`] when a frame is entered.
//! Objects are captured by type name only, so a frame never holds borrowed
//! or sensitive state.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Key of one argument or array entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgKey {
    /// Positional key.
    Index(i64),
    /// Named key.
    Name(String),
}

impl fmt::Display for ArgKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKey::Index(index) => write!(f, "{}", index),
            ArgKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for ArgKey {
    fn from(index: i64) -> Self {
        ArgKey::Index(index)
    }
}

impl From<usize> for ArgKey {
    fn from(index: usize) -> Self {
        ArgKey::Index(index as i64)
    }
}

impl From<&str> for ArgKey {
    fn from(name: &str) -> Self {
        ArgKey::Name(name.to_string())
    }
}

impl From<String> for ArgKey {
    fn from(name: String) -> Self {
        ArgKey::Name(name)
    }
}

/// Ordered, keyed entries of an argument list or nested array.
pub type Arguments = Vec<(ArgKey, ArgValue)>;

/// Every shape an argument value can take in a captured frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// An instance of a user type, kept as its type name.
    Object { type_name: String },
    Bool(bool),
    Int(i64),
    /// Unsigned integer, kept apart so values above `i64::MAX` stay exact.
    UInt(u64),
    Float(f64),
    Str(String),
    /// A list or map. Key kinds and order are preserved.
    Array(Arguments),
    Null,
    /// An opaque OS handle such as a file or a socket.
    Resource,
}

impl ArgValue {
    pub fn object(type_name: impl Into<String>) -> Self {
        ArgValue::Object {
            type_name: type_name.into(),
        }
    }

    /// Object value named after `T`, without its module path.
    pub fn object_of<T: ?Sized>() -> Self {
        Self::object(short_type_name::<T>())
    }

    /// Positionally keyed array.
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ArgValue>,
    {
        ArgValue::Array(
            values
                .into_iter()
                .enumerate()
                .map(|(index, value)| (ArgKey::from(index), value.into()))
                .collect(),
        )
    }

    /// Array with explicit keys, in the given order.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ArgKey>,
        V: Into<ArgValue>,
    {
        ArgValue::Array(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// `std::any::type_name` with module paths stripped from every segment,
/// e.g. `alloc::vec::Vec<my_app::User>` becomes `Vec<User>`.
pub fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        match ch {
            ':' => segment.clear(),
            '<' | '>' | ',' | ' ' | '&' | '[' | ']' | '(' | ')' | ';' => {
                out.push_str(&segment);
                segment.clear();
                out.push(ch);
            }
            _ => segment.push(ch),
        }
    }
    out.push_str(&segment);
    out
}

/// Conversion of a value into its captured argument form.
///
/// User types usually get this through `#[derive(TraceArg)]`, which captures
/// them as [`ArgValue::Object`].
pub trait TraceArg {
    fn to_arg_value(&self) -> ArgValue;
}

impl TraceArg for ArgValue {
    fn to_arg_value(&self) -> ArgValue {
        self.clone()
    }
}

impl TraceArg for bool {
    fn to_arg_value(&self) -> ArgValue {
        ArgValue::Bool(*self)
    }
}

macro_rules! int_trace_arg {
    ($variant:ident as $repr:ty: $($ty:ty),*) => {
        $(
            impl TraceArg for $ty {
                fn to_arg_value(&self) -> ArgValue {
                    ArgValue::$variant(*self as $repr)
                }
            }
        )*
    };
}

int_trace_arg!(Int as i64: i8, i16, i32, i64, isize);
int_trace_arg!(UInt as u64: u8, u16, u32, u64, usize);

impl TraceArg for f32 {
    fn to_arg_value(&self) -> ArgValue {
        ArgValue::Float(f64::from(*self))
    }
}

impl TraceArg for f64 {
    fn to_arg_value(&self) -> ArgValue {
        ArgValue::Float(*self)
    }
}

impl TraceArg for char {
    fn to_arg_value(&self) -> ArgValue {
        ArgValue::Str(self.to_string())
    }
}

impl TraceArg for str {
    fn to_arg_value(&self) -> ArgValue {
        ArgValue::Str(self.to_string())
    }
}

impl TraceArg for String {
    fn to_arg_value(&self) -> ArgValue {
        ArgValue::Str(self.clone())
    }
}

impl TraceArg for () {
    fn to_arg_value(&self) -> ArgValue {
        ArgValue::Null
    }
}

impl<T: TraceArg + ?Sized> TraceArg for &T {
    fn to_arg_value(&self) -> ArgValue {
        (**self).to_arg_value()
    }
}

impl<T: TraceArg + ?Sized> TraceArg for &mut T {
    fn to_arg_value(&self) -> ArgValue {
        (**self).to_arg_value()
    }
}

impl<T: TraceArg + ?Sized> TraceArg for Box<T> {
    fn to_arg_value(&self) -> ArgValue {
        (**self).to_arg_value()
    }
}

impl<T: TraceArg + ?Sized> TraceArg for Arc<T> {
    fn to_arg_value(&self) -> ArgValue {
        (**self).to_arg_value()
    }
}

impl<T: TraceArg> TraceArg for Option<T> {
    fn to_arg_value(&self) -> ArgValue {
        match self {
            Some(value) => value.to_arg_value(),
            None => ArgValue::Null,
        }
    }
}

impl<T: TraceArg> TraceArg for [T] {
    fn to_arg_value(&self) -> ArgValue {
        ArgValue::list(self.iter().map(TraceArg::to_arg_value))
    }
}

impl<T: TraceArg, const N: usize> TraceArg for [T; N] {
    fn to_arg_value(&self) -> ArgValue {
        self.as_slice().to_arg_value()
    }
}

impl<T: TraceArg> TraceArg for Vec<T> {
    fn to_arg_value(&self) -> ArgValue {
        self.as_slice().to_arg_value()
    }
}

impl<K: fmt::Display, V: TraceArg> TraceArg for BTreeMap<K, V> {
    fn to_arg_value(&self) -> ArgValue {
        ArgValue::map(
            self.iter()
                .map(|(key, value)| (key.to_string(), value.to_arg_value())),
        )
    }
}

impl<K: fmt::Display, V: TraceArg, S> TraceArg for HashMap<K, V, S> {
    fn to_arg_value(&self) -> ArgValue {
        ArgValue::map(
            self.iter()
                .map(|(key, value)| (key.to_string(), value.to_arg_value())),
        )
    }
}

macro_rules! resource_trace_arg {
    ($($ty:ty),*) => {
        $(
            impl TraceArg for $ty {
                fn to_arg_value(&self) -> ArgValue {
                    ArgValue::Resource
                }
            }
        )*
    };
}

resource_trace_arg!(
    std::fs::File,
    std::net::TcpStream,
    std::net::TcpListener,
    std::net::UdpSocket,
    std::process::Child
);

impl<T: TraceArg + ?Sized> From<&T> for ArgValue {
    fn from(value: &T) -> Self {
        value.to_arg_value()
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Int(i64::from(value))
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<u64> for ArgValue {
    fn from(value: u64) -> Self {
        ArgValue::UInt(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Float(value)
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ArgValue::Null, Into::into)
    }
}
