// crates/secrets-manager-core/src/codec.rs
// ============================================================================
// Module: Family Registry and JSON Codec
// Description: Discriminator-driven encode/decode for polymorphic payloads.
// Purpose: Resolve raw JSON into concrete variants and back, with field-level
//          validation and unknown-field preservation.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every polymorphic family (secret resources, metadata, rotation policies,
//! engine configuration, config element payloads, action bodies) owns one
//! frozen [`Registry`]. The registry maps a [`VariantKey`] (tag plus an
//! optional action name) to a decoder function. The discriminator is either a
//! field inside the payload or supplied by the caller as a [`ContextHint`]
//! derived from the request URL.
//! Invariants:
//! - Registries are built once and never mutated afterwards.
//! - [`encode`] always emits the discriminator field equal to the variant tag
//!   for field-discriminated families.
//! - Families with an opaque fallback never reject an unknown tag; the raw
//!   object is kept verbatim so it can be sent back unchanged.
//! - Known variants decoded through [`from_wire`] re-encode every untouched
//!   field byte for byte.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

use crate::error::CodecError;

// ============================================================================
// SECTION: Keys and Hints
// ============================================================================

/// Composite registry key.
///
/// # Invariants
/// - `action` is `None` for families keyed by tag alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantKey<'a> {
    /// Variant tag.
    pub tag: &'a str,
    /// Action name for action-keyed families.
    pub action: Option<&'a str>,
}

impl<'a> VariantKey<'a> {
    /// Builds a tag-only key.
    #[must_use]
    pub const fn tag(tag: &'a str) -> Self {
        Self {
            tag,
            action: None,
        }
    }

    /// Builds a `(tag, action)` key.
    #[must_use]
    pub const fn action(tag: &'a str, action: &'a str) -> Self {
        Self {
            tag,
            action: Some(action),
        }
    }
}

impl fmt::Display for VariantKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            Some(action) => write!(f, "{}/{action}", self.tag),
            None => f.write_str(self.tag),
        }
    }
}

/// Variant selection supplied by the dispatcher from URL segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextHint {
    /// Tag inferred from the URL (secret type, element kind, policy kind).
    pub tag: Option<String>,
    /// Action inferred from the `action` query parameter.
    pub action: Option<String>,
}

impl ContextHint {
    /// Hint with no inferred tag.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            tag: None,
            action: None,
        }
    }

    /// Hint carrying a URL-derived tag.
    #[must_use]
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            action: None,
        }
    }

    /// Adds a URL-derived action to the hint.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

// ============================================================================
// SECTION: Opaque Variants
// ============================================================================

/// Variant carrying a payload whose discriminator the SDK does not know.
///
/// # Invariants
/// - `raw` is the object exactly as received, discriminator included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpaqueVariant {
    /// Discriminator value read from the payload or hint.
    pub tag: Option<String>,
    /// Raw JSON object.
    pub raw: Map<String, Value>,
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Function decoding a discriminator-stripped object into a family value.
pub type Decoder<F> = fn(Map<String, Value>) -> Result<F, CodecError>;

/// Where a family reads its discriminator from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discriminator {
    /// A field inside the payload, with the context hint as fallback.
    Field(&'static str),
    /// Only the context hint (URL-derived) selects the variant.
    Context,
}

/// Single registry entry.
struct Entry<F> {
    /// Variant tag.
    tag: &'static str,
    /// Action name for composite keys.
    action: Option<&'static str>,
    /// Decoder for the variant.
    decode: Decoder<F>,
}

/// Frozen mapping from discriminator keys to variant decoders.
///
/// # Invariants
/// - Keys are unique; the first registration of a key wins and later ones are
///   recorded in [`Registry::conflicts`].
pub struct Registry<F> {
    /// Family name used in errors.
    family: &'static str,
    /// Discriminator source.
    discriminator: Discriminator,
    /// Registered variants in registration order.
    entries: Vec<Entry<F>>,
    /// Fallback for unknown tags.
    opaque: Option<fn(OpaqueVariant) -> F>,
    /// Duplicate keys rejected during registration.
    conflicts: Vec<String>,
}

impl<F> fmt::Debug for Registry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("family", &self.family)
            .field("discriminator", &self.discriminator)
            .field("variants", &self.entries.len())
            .field("opaque", &self.opaque.is_some())
            .finish()
    }
}

impl<F> Registry<F> {
    /// Starts building a registry for `family`.
    #[must_use]
    pub const fn builder(family: &'static str, discriminator: Discriminator) -> RegistryBuilder<F> {
        RegistryBuilder {
            registry: Self {
                family,
                discriminator,
                entries: Vec::new(),
                opaque: None,
                conflicts: Vec::new(),
            },
        }
    }

    /// Returns the family name.
    #[must_use]
    pub const fn family(&self) -> &'static str {
        self.family
    }

    /// Returns the discriminator field, if the family carries one in the payload.
    #[must_use]
    pub const fn discriminator_field(&self) -> Option<&'static str> {
        match self.discriminator {
            Discriminator::Field(field) => Some(field),
            Discriminator::Context => None,
        }
    }

    /// Returns true when unknown tags decode to an opaque variant.
    #[must_use]
    pub const fn accepts_opaque(&self) -> bool {
        self.opaque.is_some()
    }

    /// Returns the registered keys in registration order.
    #[must_use]
    pub fn keys(&self) -> Vec<VariantKey<'static>> {
        self.entries
            .iter()
            .map(|entry| VariantKey {
                tag: entry.tag,
                action: entry.action,
            })
            .collect()
    }

    /// Returns true when `key` is registered.
    #[must_use]
    pub fn contains(&self, key: VariantKey<'_>) -> bool {
        self.lookup(key).is_some()
    }

    /// Returns duplicate keys dropped during registration.
    #[must_use]
    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }

    /// Finds the entry for `key`.
    fn lookup(&self, key: VariantKey<'_>) -> Option<&Entry<F>> {
        self.entries.iter().find(|entry| entry.tag == key.tag && entry.action == key.action)
    }

    /// Decodes a raw JSON value into a family variant.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingDiscriminator`] when neither the payload nor
    /// the hint selects a tag, [`CodecError::UnknownVariant`] for unregistered
    /// tags on closed families, and [`CodecError::Json`] for non-object input or
    /// schema mismatches.
    pub fn decode(&self, raw: Value, hint: &ContextHint) -> Result<F, CodecError> {
        let Value::Object(map) = raw else {
            return Err(CodecError::Json(format!("{} payload must be a JSON object", self.family)));
        };
        self.decode_map(map, hint)
    }

    /// Decodes a raw JSON object into a family variant.
    ///
    /// # Errors
    ///
    /// See [`Registry::decode`].
    pub fn decode_map(&self, mut map: Map<String, Value>, hint: &ContextHint) -> Result<F, CodecError> {
        let tag = match self.discriminator {
            Discriminator::Field(field) => match map.get(field) {
                Some(Value::String(tag)) => Some(tag.clone()),
                Some(Value::Null) | None => hint.tag.clone(),
                Some(_) => {
                    return Err(CodecError::invalid(field, "discriminator must be a string"));
                }
            },
            Discriminator::Context => hint.tag.clone(),
        };
        let Some(tag) = tag else {
            return Err(CodecError::MissingDiscriminator {
                family: self.family,
            });
        };
        let key = VariantKey {
            tag: &tag,
            action: hint.action.as_deref(),
        };
        if let Some(entry) = self.lookup(key) {
            if let Some(field) = self.discriminator_field() {
                map.remove(field);
            }
            return (entry.decode)(map);
        }
        match self.opaque {
            Some(opaque) => Ok(opaque(OpaqueVariant {
                tag: Some(tag),
                raw: map,
            })),
            None => Err(CodecError::UnknownVariant {
                family: self.family,
                tag: key.to_string(),
            }),
        }
    }
}

/// Builder used once per family at initialisation.
pub struct RegistryBuilder<F> {
    /// Registry under construction.
    registry: Registry<F>,
}

impl<F> RegistryBuilder<F> {
    /// Registers a tag-keyed variant.
    #[must_use]
    pub fn register(self, tag: &'static str, decode: Decoder<F>) -> Self {
        self.insert(tag, None, decode)
    }

    /// Registers a `(tag, action)`-keyed variant.
    #[must_use]
    pub fn register_action(self, tag: &'static str, action: &'static str, decode: Decoder<F>) -> Self {
        self.insert(tag, Some(action), decode)
    }

    /// Routes unknown tags to an opaque variant instead of failing.
    #[must_use]
    pub fn opaque(mut self, wrap: fn(OpaqueVariant) -> F) -> Self {
        self.registry.opaque = Some(wrap);
        self
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> Registry<F> {
        self.registry
    }

    /// Inserts an entry, recording duplicates instead of overwriting.
    fn insert(mut self, tag: &'static str, action: Option<&'static str>, decode: Decoder<F>) -> Self {
        let key = VariantKey {
            tag,
            action,
        };
        if self.registry.contains(key) {
            self.registry.conflicts.push(key.to_string());
        } else {
            self.registry.entries.push(Entry {
                tag,
                action,
                decode,
            });
        }
        self
    }
}

// ============================================================================
// SECTION: Family Contract
// ============================================================================

/// Capability set every polymorphic family implements.
pub trait Family: Sized + 'static {
    /// Returns the family's frozen registry.
    fn registry() -> &'static Registry<Self>;

    /// Returns the variant tag, or the raw tag for opaque variants.
    fn tag(&self) -> Option<&str>;

    /// Returns the schema-declared fields of the variant without the discriminator.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] when a field cannot be serialized.
    fn fields(&self) -> Result<Map<String, Value>, CodecError>;

    /// Checks required fields and enumerated values.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingField`] or [`CodecError::InvalidField`].
    fn validate(&self) -> Result<(), CodecError> {
        Ok(())
    }
}

/// Validates and encodes a family variant, emitting its discriminator.
///
/// # Errors
///
/// Returns validation or serialization failures from the variant.
pub fn encode<F: Family>(variant: &F) -> Result<Value, CodecError> {
    variant.validate()?;
    let mut map = variant.fields()?;
    if let (Some(field), Some(tag)) = (F::registry().discriminator_field(), variant.tag()) {
        map.insert(field.to_string(), Value::String(tag.to_string()));
    }
    Ok(Value::Object(map))
}

/// Decodes a raw value into a family variant using `hint` as fallback.
///
/// # Errors
///
/// See [`Registry::decode`].
pub fn decode<F: Family>(raw: Value, hint: &ContextHint) -> Result<F, CodecError> {
    F::registry().decode(raw, hint)
}

/// Serializes a family variant through its registry without validating.
///
/// # Errors
///
/// Returns a serializer error when the variant's fields cannot be encoded.
pub fn serialize_family<F: Family, S: Serializer>(variant: &F, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = variant.fields().map_err(serde::ser::Error::custom)?;
    if let (Some(field), Some(tag)) = (F::registry().discriminator_field(), variant.tag()) {
        map.insert(field.to_string(), Value::String(tag.to_string()));
    }
    map.serialize(serializer)
}

/// Deserializes a field-discriminated family variant.
///
/// # Errors
///
/// Returns a deserializer error wrapping the registry failure.
pub fn deserialize_family<'de, F: Family, D: Deserializer<'de>>(deserializer: D) -> Result<F, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    F::registry().decode(raw, &ContextHint::none()).map_err(serde::de::Error::custom)
}

/// Implements `Serialize` (and optionally `Deserialize`) through the family registry.
#[macro_export]
macro_rules! impl_family_serde {
    ($ty:ty) => {
        $crate::impl_family_serde!($ty, serialize);
        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                $crate::codec::deserialize_family(deserializer)
            }
        }
    };
    ($ty:ty, serialize) => {
        impl ::serde::Serialize for $ty {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                $crate::codec::serialize_family(self, serializer)
            }
        }
    };
}

// ============================================================================
// SECTION: Wire Origin
// ============================================================================

/// Object a variant was decoded from.
///
/// Fields whose typed value is unchanged since decoding re-encode exactly as
/// received: explicit nulls, empty arrays, omitted defaults, and timestamp
/// spellings survive a decode/encode cycle.
///
/// # Invariants
/// - Never participates in equality; two variants with equal fields are equal
///   whatever their origin.
#[derive(Debug, Clone, Default)]
pub struct WireOrigin(Option<Box<OriginMaps>>);

/// Received and decoded forms of one object.
#[derive(Debug, Clone)]
struct OriginMaps {
    /// Object as received, discriminator stripped.
    raw: Map<String, Value>,
    /// Typed fields as serialized right after decoding.
    decoded: Map<String, Value>,
}

impl PartialEq for WireOrigin {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for WireOrigin {}

impl WireOrigin {
    /// Returns true when the value was decoded from the wire.
    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        self.0.is_some()
    }

    /// Merges freshly serialized fields with the received object.
    fn restore(&self, typed: Map<String, Value>) -> Map<String, Value> {
        let Some(origin) = &self.0 else {
            return typed;
        };
        let mut merged = Map::new();
        for key in origin.raw.keys().chain(typed.keys().filter(|key| !origin.raw.contains_key(*key))) {
            let current = typed.get(key);
            let value = if current == origin.decoded.get(key) { origin.raw.get(key) } else { current };
            if let Some(value) = value {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }
}

/// Record that remembers the object it was decoded from.
pub trait Tracked: Serialize + DeserializeOwned {
    /// Returns the recorded origin.
    fn origin(&self) -> &WireOrigin;

    /// Returns the recorded origin for replacement.
    fn origin_mut(&mut self) -> &mut WireOrigin;
}

/// Implements [`Tracked`] for records with an `origin: WireOrigin` field.
#[macro_export]
macro_rules! impl_tracked {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::codec::Tracked for $ty {
                fn origin(&self) -> &$crate::codec::WireOrigin {
                    &self.origin
                }

                fn origin_mut(&mut self) -> &mut $crate::codec::WireOrigin {
                    &mut self.origin
                }
            }
        )+
    };
}

/// Deserializes a record and remembers the object it came from.
///
/// # Errors
///
/// Returns [`CodecError::Json`] on type mismatches.
pub fn from_wire<T: Tracked>(map: Map<String, Value>) -> Result<T, CodecError> {
    let raw = map.clone();
    let mut value: T = from_fields(map)?;
    let decoded = to_fields(&value)?;
    *value.origin_mut() = WireOrigin(Some(Box::new(OriginMaps {
        raw,
        decoded,
    })));
    Ok(value)
}

/// Serializes a record, re-emitting unchanged fields as they were received.
///
/// # Errors
///
/// Returns [`CodecError::Json`] when the record is not an object.
pub fn to_wire<T: Tracked>(value: &T) -> Result<Map<String, Value>, CodecError> {
    Ok(value.origin().restore(to_fields(value)?))
}

// ============================================================================
// SECTION: Field Helpers
// ============================================================================

/// Serializes a record into a JSON object.
///
/// # Errors
///
/// Returns [`CodecError::Json`] when the record is not an object.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Map<String, Value>, CodecError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(CodecError::Json(format!("expected a JSON object, found {}", kind_of(&other)))),
    }
}

/// Deserializes a record from a JSON object.
///
/// # Errors
///
/// Returns [`CodecError::Json`] on type mismatches.
pub fn from_fields<T: DeserializeOwned>(map: Map<String, Value>) -> Result<T, CodecError> {
    Ok(serde_json::from_value(Value::Object(map))?)
}

/// Requires a non-empty string.
///
/// # Errors
///
/// Returns [`CodecError::MissingField`] when `value` is empty.
pub fn require_str(field: &str, value: &str) -> Result<(), CodecError> {
    if value.is_empty() { Err(CodecError::missing(field)) } else { Ok(()) }
}

/// Requires an optional value to be present.
///
/// # Errors
///
/// Returns [`CodecError::MissingField`] when `value` is `None`.
pub fn require_some<'a, T>(field: &str, value: Option<&'a T>) -> Result<&'a T, CodecError> {
    value.ok_or_else(|| CodecError::missing(field))
}

/// Requires a non-empty sequence.
///
/// # Errors
///
/// Returns [`CodecError::MissingField`] when `values` is empty.
pub fn require_non_empty<T>(field: &str, values: &[T]) -> Result<(), CodecError> {
    if values.is_empty() { Err(CodecError::missing(field)) } else { Ok(()) }
}

/// Requires `value` to be one of `allowed`.
///
/// # Errors
///
/// Returns [`CodecError::InvalidField`] listing the accepted values.
pub fn check_enum(field: &str, value: &str, allowed: &[&str]) -> Result<(), CodecError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CodecError::invalid(field, format!("`{value}` is not one of {}", allowed.join(", "))))
    }
}

/// Rejects caller-supplied extra properties that shadow a known field.
///
/// # Errors
///
/// Returns [`CodecError::InvalidField`] naming the shadowed field.
pub fn check_extra_fields(extra: &Map<String, Value>, known: &[&str]) -> Result<(), CodecError> {
    match extra.keys().find(|key| known.contains(&key.as_str())) {
        Some(key) => Err(CodecError::invalid(key.as_str(), "additional property shadows a declared field")),
        None => Ok(()),
    }
}

/// Returns a short name for a JSON value kind.
const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
