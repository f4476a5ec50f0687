//! Static types with a known descriptor.
//!
//! [`JsonType`] ties a Rust type to the descriptor that decodes it and to the
//! conversions between it and a [`Value`] tree. Containers build their
//! descriptor from their parameters, so `Vec<HashMap<String, NaiveDateTime>>`
//! decodes dates inside the nested mapping without further hints. Records
//! are declared with [`json_record!`](crate::json_record).

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;

use crate::descriptor::TypeDescriptor;
use crate::error::{CodecError, Result};
use crate::value::{Key, Mapping, Value};

pub trait JsonType: Sized {
    /// The descriptor values of this type are decoded against.
    fn descriptor() -> TypeDescriptor;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self>;

    /// The value an explicit `null` stands for.
    ///
    /// Types with an empty value (`""`, `0`, `[]`, `{}`, a record of
    /// defaults) take it; dates have none and report a mismatch.
    fn from_null() -> Result<Self> {
        Self::from_value(Self::descriptor().empty_value())
    }
}

fn wrong(expected: &str, value: &Value) -> CodecError {
    CodecError::mismatch(expected, value.kind())
}

impl JsonType for bool {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::bool()
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        value.as_bool().ok_or_else(|| wrong("bool", &value))
    }
}

impl JsonType for i64 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::int()
    }

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        value.as_i64().ok_or_else(|| wrong("int", &value))
    }
}

macro_rules! narrow_int {
    ($($ty:ty),*) => {$(
        impl JsonType for $ty {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::int()
            }

            fn to_value(&self) -> Value {
                Value::Int(i64::from(*self))
            }

            fn from_value(value: Value) -> Result<Self> {
                let wide = i64::from_value(value)?;
                <$ty>::try_from(wide).map_err(|_| {
                    CodecError::mismatch(stringify!($ty), format!("out-of-range int {wide}"))
                })
            }
        }
    )*};
}

narrow_int!(i32, u32);

impl JsonType for f64 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::float()
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        value.as_f64().ok_or_else(|| wrong("float", &value))
    }
}

impl JsonType for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::str()
    }

    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(wrong("str", &other)),
        }
    }
}

impl JsonType for NaiveDateTime {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::date()
    }

    fn to_value(&self) -> Value {
        Value::Date(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        value.as_date().copied().ok_or_else(|| wrong("date", &value))
    }
}

impl JsonType for NaiveDate {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::date()
    }

    fn to_value(&self) -> Value {
        self.and_hms_opt(0, 0, 0).map_or(Value::Null, Value::Date)
    }

    fn from_value(value: Value) -> Result<Self> {
        NaiveDateTime::from_value(value).map(|d| d.date())
    }
}

/// The untyped tree itself: decoded with the shape the JSON has.
impl JsonType for Value {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Inferred
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

/// `None` is `null`; the inner type's descriptor is used unchanged.
impl<T: JsonType> JsonType for Option<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, T::to_value)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn from_null() -> Result<Self> {
        Ok(None)
    }
}

impl<T: JsonType> JsonType for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::seq(T::descriptor())
    }

    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Seq(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| T::from_value(item).map_err(|err| err.at(&i.to_string())))
                .collect(),
            other => Err(wrong("sequence", &other)),
        }
    }
}

fn mapping_to_value<'a, K, V, I>(entries: I) -> Value
where
    K: JsonType + 'a,
    V: JsonType + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    Value::Map(
        entries
            .map(|(k, v)| (Key::from(k.to_value()), v.to_value()))
            .collect::<Mapping>(),
    )
}

fn mapping_from_value<K, V, C>(value: Value) -> Result<C>
where
    K: JsonType,
    V: JsonType,
    C: FromIterator<(K, V)>,
{
    match value {
        Value::Map(map) => map
            .into_iter()
            .map(|(key, item)| {
                let segment = key.to_string();
                let k = K::from_value(key.into_value()).map_err(|err| err.at(&segment))?;
                let v = V::from_value(item).map_err(|err| err.at(&segment))?;
                Ok((k, v))
            })
            .collect(),
        other => Err(wrong("mapping", &other)),
    }
}

impl<K: JsonType + Eq + Hash, V: JsonType> JsonType for HashMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::map(K::descriptor(), V::descriptor())
    }

    /// Entries are sorted by key; iteration order differs per instance.
    fn to_value(&self) -> Value {
        let mut value = mapping_to_value(self.iter());
        if let Value::Map(entries) = &mut value {
            entries.sort_keys();
        }
        value
    }

    fn from_value(value: Value) -> Result<Self> {
        mapping_from_value(value)
    }
}

impl<K: JsonType + Ord, V: JsonType> JsonType for BTreeMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::map(K::descriptor(), V::descriptor())
    }

    fn to_value(&self) -> Value {
        mapping_to_value(self.iter())
    }

    fn from_value(value: Value) -> Result<Self> {
        mapping_from_value(value)
    }
}

impl<K: JsonType + Eq + Hash, V: JsonType> JsonType for IndexMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::map(K::descriptor(), V::descriptor())
    }

    fn to_value(&self) -> Value {
        mapping_to_value(self.iter())
    }

    fn from_value(value: Value) -> Result<Self> {
        mapping_from_value(value)
    }
}

/// Declares a record struct together with its descriptor.
///
/// Every field names its declared default, and optionally the
/// [`NullPolicy`](crate::NullPolicy) applied when the JSON holds an explicit
/// `null` for it (`KeepAsNull` when omitted):
///
/// ```
/// use typed_json::json_record;
///
/// json_record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Student {
///         pub name: String = "default" => ReplaceWithEmptyValue,
///         pub age: i64 = 1 => ReplaceWithEmptyValue,
///         pub nickname: Option<String> = None,
///     }
/// }
///
/// let s: Student = typed_json::parse(r#"{"name":null,"age":null}"#).unwrap();
/// assert_eq!(s.name, "");
/// assert_eq!(s.age, 0);
/// assert_eq!(s.nickname, None);
/// ```
#[macro_export]
macro_rules! json_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty = $default:expr $(=> $policy:ident)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field: $fty, )*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: ::std::convert::Into::<$fty>::into($default), )*
                }
            }
        }

        impl $crate::JsonType for $name {
            fn descriptor() -> $crate::TypeDescriptor {
                $crate::RecordDescriptor::new(stringify!($name))
                    $(
                        .field(
                            $crate::FieldDescriptor::new(
                                stringify!($field),
                                <$fty as $crate::JsonType>::descriptor(),
                            )
                            .default(<$fty as $crate::JsonType>::to_value(
                                &::std::convert::Into::<$fty>::into($default),
                            ))
                            .on_null($crate::__null_policy!($($policy)?)),
                        )
                    )*
                    .into_descriptor()
            }

            fn to_value(&self) -> $crate::Value {
                #[allow(unused_mut)]
                let mut record = $crate::Record::new($crate::record_descriptor_of::<Self>());
                $( record.set(stringify!($field), $crate::JsonType::to_value(&self.$field)); )*
                $crate::Value::Record(record)
            }

            fn from_value(value: $crate::Value) -> $crate::Result<Self> {
                #[allow(unused_mut, unused_variables)]
                let mut record = $crate::Record::try_from_value(
                    value,
                    concat!("record ", stringify!($name)),
                )?;
                Ok(Self {
                    $( $field: record.take_as(stringify!($field))?, )*
                })
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __null_policy {
    () => {
        $crate::NullPolicy::KeepAsNull
    };
    ($policy:ident) => {
        $crate::NullPolicy::$policy
    };
}
