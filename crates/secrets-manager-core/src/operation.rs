// crates/secrets-manager-core/src/operation.rs
// ============================================================================
// Module: Operation Contract
// Description: Declarative description of a single REST operation.
// Purpose: Give the request builder and response parser everything they need
//          without knowing concrete options or result types.
// Dependencies: reqwest, serde_json
// ============================================================================

//! ## Overview
//! An [`Operation`] is an options value that knows its HTTP method, URL
//! template, path and query parameters, optional JSON body, and how to decode
//! a successful response body. The dispatcher treats every operation through
//! this trait alone.
//! Invariants:
//! - Every `{name}` segment in [`OperationDescriptor::path`] has a matching
//!   entry in [`Operation::path_params`].
//! - Query parameters render in the order they are pushed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::CodecError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Caller-supplied per-call headers.
pub type HeaderBag = BTreeMap<String, String>;

/// HTTP methods used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`.
    Get,
    /// `POST`.
    Post,
    /// `PUT`.
    Put,
    /// `DELETE`.
    Delete,
}

impl HttpMethod {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Converts to the reqwest method type.
    #[must_use]
    pub fn as_method(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a REST operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Snake-case identifier used in logs.
    pub id: &'static str,
    /// Operation name reported in the analytics header.
    pub name: &'static str,
    /// HTTP method.
    pub method: HttpMethod,
    /// URL template relative to the service URL, e.g. `/api/v1/secrets/{secret_type}`.
    pub path: &'static str,
}

// ============================================================================
// SECTION: Query Parameters
// ============================================================================

/// Rendered value of a query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// `name=value`.
    Single(String),
    /// `name=a&name=b`.
    Repeated(Vec<String>),
}

/// Named query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    /// Wire name.
    pub name: &'static str,
    /// Rendered value.
    pub value: QueryValue,
}

/// Ordered query parameter list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Parameters in declared order.
    params: Vec<QueryParam>,
}

impl QueryParams {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            params: Vec::new(),
        }
    }

    /// Appends a required single-valued parameter.
    #[must_use]
    pub fn push(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push(QueryParam {
            name,
            value: QueryValue::Single(value.to_string()),
        });
        self
    }

    /// Appends a single-valued parameter when present.
    #[must_use]
    pub fn opt<T: ToString>(self, name: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.push(name, value),
            None => self,
        }
    }

    /// Appends a sequence rendered as repeated parameters; empty sequences are skipped.
    #[must_use]
    pub fn repeated(mut self, name: &'static str, values: &[String]) -> Self {
        if !values.is_empty() {
            self.params.push(QueryParam {
                name,
                value: QueryValue::Repeated(values.to_vec()),
            });
        }
        self
    }

    /// Returns true when no parameter was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates parameters in declared order.
    pub fn iter(&self) -> impl Iterator<Item = &QueryParam> {
        self.params.iter()
    }
}

// ============================================================================
// SECTION: Operation Trait
// ============================================================================

/// Options value for one REST operation.
pub trait Operation: Send + Sync {
    /// Decoded result type.
    type Output: Send;

    /// Static operation description.
    const DESCRIPTOR: OperationDescriptor;

    /// Values for the URL template segments.
    fn path_params(&self) -> Vec<(&'static str, &str)>;

    /// Query parameters in declared order.
    fn query_params(&self) -> QueryParams {
        QueryParams::new()
    }

    /// Checks constraints that span fields or are not covered by path expansion.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingField`] or [`CodecError::InvalidField`].
    fn validate(&self) -> Result<(), CodecError> {
        Ok(())
    }

    /// Encodes the JSON request body, if the operation sends one.
    ///
    /// # Errors
    ///
    /// Returns codec validation or serialization failures.
    fn body(&self) -> Result<Option<Value>, CodecError> {
        Ok(None)
    }

    /// Caller-supplied headers for this call.
    fn headers(&self) -> &HeaderBag;

    /// Decodes a non-empty successful response body.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when the body does not match the result schema.
    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError>;
}
