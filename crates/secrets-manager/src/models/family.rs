// crates/secrets-manager/src/models/family.rs
// ============================================================================
// Module: Family Declarations
// Description: Declarative macro generating tag-keyed families and registries.
// Purpose: Keep every single-tag family on one registration path.
// Dependencies: secrets-manager-core, serde_json
// ============================================================================

//! ## Overview
//! [`family!`] expands a variant list into the family enum, its frozen
//! registry, and the [`Family`](secrets_manager_core::Family) implementation.
//! Families keyed by `(tag, action)` are written by hand next to their
//! variants.
//! Invariants:
//! - Each variant maps to exactly one registered tag.
//! - Opaque variants encode back to the raw object they were decoded from.
//! - Known variants implement [`Tracked`](secrets_manager_core::Tracked) so
//!   decoded values re-encode their untouched fields as received.

use secrets_manager_core::CodecError;

/// Variant-level validation run before encoding.
pub trait Validate {
    /// Checks required fields, enumerations, and extra-field shadowing.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingField`] or [`CodecError::InvalidField`].
    fn validate(&self) -> Result<(), CodecError> {
        Ok(())
    }
}

/// Declares a tag-keyed family with its registry and `Family` impl.
macro_rules! family {
    (
        $(#[$meta:meta])*
        pub enum $family:ident ($name:literal, $discriminator:expr) {
            $( $(#[$vmeta:meta])* $variant:ident($ty:ty) = $tag:literal, )+
        }
        $( opaque $opaque:ident; )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $family {
            $( $(#[$vmeta])* $variant($ty), )+
            $(
                /// Variant whose discriminator this SDK does not know.
                $opaque(::secrets_manager_core::OpaqueVariant),
            )?
        }

        impl $family {
            /// Registered tags in registration order.
            pub const TAGS: &'static [&'static str] = &[$($tag),+];
        }

        impl ::secrets_manager_core::Family for $family {
            fn registry() -> &'static ::secrets_manager_core::Registry<Self> {
                static REGISTRY: ::std::sync::LazyLock<::secrets_manager_core::Registry<$family>> =
                    ::std::sync::LazyLock::new(|| {
                        let builder = ::secrets_manager_core::Registry::builder($name, $discriminator)
                            $( .register($tag, |map| ::secrets_manager_core::codec::from_wire(map).map($family::$variant)) )+;
                        $( let builder = builder.opaque($family::$opaque); )?
                        builder.build()
                    });
                &REGISTRY
            }

            fn tag(&self) -> Option<&str> {
                match self {
                    $( Self::$variant(_) => Some($tag), )+
                    $( Self::$opaque(raw) => raw.tag.as_deref(), )?
                }
            }

            fn fields(&self) -> Result<::serde_json::Map<String, ::serde_json::Value>, ::secrets_manager_core::CodecError> {
                match self {
                    $( Self::$variant(value) => ::secrets_manager_core::codec::to_wire(value), )+
                    $( Self::$opaque(raw) => {
                        let mut map = raw.raw.clone();
                        if let Some(field) = <Self as ::secrets_manager_core::Family>::registry().discriminator_field() {
                            map.remove(field);
                        }
                        Ok(map)
                    } )?
                }
            }

            fn validate(&self) -> Result<(), ::secrets_manager_core::CodecError> {
                match self {
                    $( Self::$variant(value) => $crate::models::family::Validate::validate(value), )+
                    $( Self::$opaque(_) => Ok(()), )?
                }
            }
        }
    };
}

pub(crate) use family;
