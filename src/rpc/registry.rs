//! Type registry: maps stable wire keys to concrete Rust types.
//!
//! ```text
//!   encode:  AnyValue ──TypeId──▶ key + encode fn ──▶ {"Type": key, "Content": ..}
//!   decode:  {"Type": key, ..} ──key──▶ decode fn ──▶ AnyValue
//! ```
//!
//! Every type that may travel as an argument or result must be registered
//! on both ends under the same key. The registry is filled at startup and
//! then shared read-only behind an `Arc`.

use core::any::{Any, TypeId};
use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::value::AnyValue;
use crate::error::{Error, Result};

type EncodeFn = fn(&(dyn Any + Send + Sync)) -> serde_json::Result<Value>;
type DecodeFn = fn(Value) -> serde_json::Result<AnyValue>;

struct Entry {
    encode: EncodeFn,
    decode: DecodeFn,
}

/// Keyed lookup of registered wire types.
#[derive(Default)]
pub struct TypeRegistry {
    by_key: HashMap<String, Entry>,
    by_type: HashMap<TypeId, String>,
}

fn encode_as<T>(value: &(dyn Any + Send + Sync)) -> serde_json::Result<Value>
where
    T: Serialize + DeserializeOwned + 'static,
{
    let Some(v) = value.downcast_ref::<T>() else {
        return Err(not_a::<T>());
    };
    let content = serde_json::to_value(v)?;
    // serde_json writes non-finite floats as null; such content must decode
    // back into T or it never goes on the wire.
    if contains_null(&content) {
        if let Err(e) = serde_json::from_value::<T>(content.clone()) {
            return Err(serde::ser::Error::custom(format!(
                "{} would not decode: {e}",
                core::any::type_name::<T>()
            )));
        }
    }
    Ok(content)
}

fn decode_as<T: DeserializeOwned + Send + Sync + 'static>(content: Value) -> serde_json::Result<AnyValue> {
    serde_json::from_value::<T>(content).map(AnyValue::new)
}

fn not_a<T>() -> serde_json::Error {
    serde::ser::Error::custom(format!("value is not a {}", core::any::type_name::<T>()))
}

fn contains_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.iter().any(contains_null),
        Value::Object(fields) => fields.values().any(contains_null),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Floats: non-finite values travel as "NaN" / "Infinity" / "-Infinity"
// ---------------------------------------------------------------------------

const NAN: &str = "NaN";
const INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";

trait WireFloat: Copy + Into<f64> + Serialize + DeserializeOwned + Send + Sync + 'static {
    fn from_wide(v: f64) -> Self;
}

impl WireFloat for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_wide(v: f64) -> Self {
        v as f32
    }
}

impl WireFloat for f64 {
    fn from_wide(v: f64) -> Self {
        v
    }
}

fn encode_float<T: WireFloat>(value: &(dyn Any + Send + Sync)) -> serde_json::Result<Value> {
    let Some(&v) = value.downcast_ref::<T>() else {
        return Err(not_a::<T>());
    };
    let wide: f64 = v.into();
    let content = if wide.is_nan() {
        Value::from(NAN)
    } else if wide.is_infinite() {
        Value::from(if wide.is_sign_positive() { INFINITY } else { NEG_INFINITY })
    } else {
        serde_json::to_value(v)?
    };
    Ok(content)
}

fn decode_float<T: WireFloat>(content: Value) -> serde_json::Result<AnyValue> {
    let v = match content {
        Value::String(s) => T::from_wide(match s.as_str() {
            NAN => f64::NAN,
            INFINITY => f64::INFINITY,
            NEG_INFINITY => f64::NEG_INFINITY,
            other => {
                return Err(serde::de::Error::custom(format!(
                    "invalid float string `{other}`"
                )));
            }
        }),
        other => serde_json::from_value::<T>(other)?,
    };
    Ok(AnyValue::new(v))
}

impl TypeRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the builtin scalar and collection keys.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register_builtins();
        reg
    }

    fn register_builtins(&mut self) {
        self.insert::<bool>("bool");
        self.insert::<i8>("i8");
        self.insert::<i16>("i16");
        self.insert::<i32>("i32");
        self.insert::<i64>("i64");
        self.insert::<u8>("u8");
        self.insert::<u16>("u16");
        self.insert::<u32>("u32");
        self.insert::<u64>("u64");
        self.insert_with::<f32>("f32", encode_float::<f32>, decode_float::<f32>);
        self.insert_with::<f64>("f64", encode_float::<f64>, decode_float::<f64>);
        self.insert::<char>("char");
        self.insert::<String>("string");
        self.insert::<()>("unit");
        self.insert::<Value>("json");
        self.insert::<Vec<u8>>("bytes");
        self.insert::<Vec<String>>("strings");
    }

    fn insert<T>(&mut self, key: &str)
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        self.insert_with::<T>(key, encode_as::<T>, decode_as::<T>);
    }

    fn insert_with<T: 'static>(&mut self, key: &str, encode: EncodeFn, decode: DecodeFn) {
        self.by_key.insert(key.to_owned(), Entry { encode, decode });
        self.by_type.insert(TypeId::of::<T>(), key.to_owned());
    }

    /// Bind `key` to `T`.
    ///
    /// Fails if the key is already bound or `T` already has a key.
    pub fn register<T>(&mut self, key: &str) -> Result<&mut Self>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        if self.by_key.contains_key(key) {
            return Err(Error::DuplicateRegistration(key.to_owned()));
        }
        if let Some(existing) = self.by_type.get(&TypeId::of::<T>()) {
            return Err(Error::DuplicateRegistration(format!(
                "{} (already registered as `{existing}`)",
                core::any::type_name::<T>()
            )));
        }
        self.insert::<T>(key);
        Ok(self)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Wire key registered for `T`, if any.
    pub fn key_of<T: 'static>(&self) -> Option<&str> {
        self.by_type.get(&TypeId::of::<T>()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.by_key.keys().map(String::as_str)
    }

    /// Resolve a value to its wire key and serialized content.
    pub(crate) fn encode(&self, value: &AnyValue) -> Result<(&str, Value)> {
        let key = self
            .by_type
            .get(&value.type_id())
            .ok_or(Error::UnregisteredType(value.type_name()))?;
        // by_type and by_key are always updated together.
        let entry = self
            .by_key
            .get(key)
            .ok_or(Error::UnregisteredType(value.type_name()))?;
        let content = (entry.encode)(value.as_any())?;
        Ok((key.as_str(), content))
    }

    /// Resolve `key` and deserialize `content` into the bound type.
    pub(crate) fn decode(&self, key: &str, content: Value) -> Result<AnyValue> {
        let entry = self
            .by_key
            .get(key)
            .ok_or_else(|| Error::UnknownType(key.to_owned()))?;
        (entry.decode)(content).map_err(|source| Error::Content {
            key: key.to_owned(),
            source,
        })
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("TypeRegistry").field("keys", &keys).finish()
    }
}
