// crates/secrets-manager/src/options/config.rs
// ============================================================================
// Module: Configuration Options
// Description: Options for engine configuration and config elements.
// Purpose: Configure secret engines and manage their CAs, DNS providers,
//          and certificate templates.
// Dependencies: secrets-manager-core, serde_json
// ============================================================================

//! ## Overview
//! Config elements belong to one secret engine. Each operation checks the
//! `(secret_type, config_element)` pair before sending, and element payloads
//! must use a `type` accepted by their element kind.

use std::str::FromStr;

use secrets_manager_core::CodecError;
use secrets_manager_core::ContextHint;
use secrets_manager_core::Envelope;
use secrets_manager_core::Family;
use secrets_manager_core::HeaderBag;
use secrets_manager_core::HttpMethod;
use secrets_manager_core::Operation;
use secrets_manager_core::OperationDescriptor;
use secrets_manager_core::QueryParams;
use secrets_manager_core::codec;
use secrets_manager_core::response::decode_envelope_with;
use secrets_manager_core::response::decode_family_envelope;
use secrets_manager_core::response::decode_json;
use serde_json::Value;
use serde_json::json;

use crate::models::ConfigAction;
use crate::models::ConfigActionName;
use crate::models::ConfigElementActionData;
use crate::models::ConfigElementConfig;
use crate::models::ConfigElementDef;
use crate::models::ConfigElementGroup;
use crate::models::ConfigElementKind;
use crate::models::EngineConfig;
use crate::models::elements::encode_typed_config;
use crate::options::header_setter;

/// Secret types whose engine configuration can be written.
pub const WRITABLE_ENGINES: &[&str] = &["private_cert", "iam_credentials"];

/// Requires `config` to use a type accepted by `kind`.
fn check_config_type(kind: ConfigElementKind, config: &ConfigElementConfig) -> Result<(), CodecError> {
    let config_type = config.tag().ok_or_else(|| CodecError::missing("type"))?;
    if kind.config_types().contains(&config_type) {
        return Ok(());
    }
    Err(CodecError::invalid("type", format!("`{config_type}` is not a valid {kind} type")))
}

// ============================================================================
// SECTION: Engine Configuration
// ============================================================================

/// Options for `put_config`.
#[derive(Debug, Clone)]
pub struct PutConfigOptions {
    /// Secret type.
    pub secret_type: String,
    /// Engine configuration.
    pub config: EngineConfig,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl PutConfigOptions {
    /// Options writing `config` for the `secret_type` engine.
    #[must_use]
    pub fn new(secret_type: impl Into<String>, config: EngineConfig) -> Self {
        Self {
            secret_type: secret_type.into(),
            config,
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for PutConfigOptions {
    type Output = ();

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "put_config",
        name: "PutConfig",
        method: HttpMethod::Put,
        path: "/api/v1/config/{secret_type}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("secret_type", self.secret_type.as_str())]
    }

    fn validate(&self) -> Result<(), CodecError> {
        codec::check_enum("secret_type", &self.secret_type, WRITABLE_ENGINES)?;
        if self.config.tag() != Some(self.secret_type.as_str()) {
            return Err(CodecError::invalid(
                "config",
                format!("configuration does not belong to the {} engine", self.secret_type),
            ));
        }
        Ok(())
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        codec::encode(&self.config).map(Some)
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, _body: &[u8]) -> Result<Self::Output, CodecError> {
        Ok(())
    }
}

/// Options for `get_config`.
#[derive(Debug, Clone, Default)]
pub struct GetConfigOptions {
    /// Secret type.
    pub secret_type: String,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl GetConfigOptions {
    /// Options reading the `secret_type` engine configuration.
    #[must_use]
    pub fn new(secret_type: impl Into<String>) -> Self {
        Self {
            secret_type: secret_type.into(),
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for GetConfigOptions {
    type Output = Envelope<EngineConfig>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "get_config",
        name: "GetConfig",
        method: HttpMethod::Get,
        path: "/api/v1/config/{secret_type}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("secret_type", self.secret_type.as_str())]
    }

    fn validate(&self) -> Result<(), CodecError> {
        codec::check_enum("secret_type", &self.secret_type, EngineConfig::TAGS)
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_family_envelope(body, &ContextHint::tag(self.secret_type.as_str()))
    }
}

// ============================================================================
// SECTION: Config Elements
// ============================================================================

/// Options for `create_config_element`.
#[derive(Debug, Clone)]
pub struct CreateConfigElementOptions {
    /// Secret type.
    pub secret_type: String,
    /// Element kind.
    pub config_element: String,
    /// Element definition.
    pub element: ConfigElementDef,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl CreateConfigElementOptions {
    /// Options creating `element` under `config_element`.
    #[must_use]
    pub fn new(secret_type: impl Into<String>, config_element: impl Into<String>, element: ConfigElementDef) -> Self {
        Self {
            secret_type: secret_type.into(),
            config_element: config_element.into(),
            element,
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for CreateConfigElementOptions {
    type Output = Envelope<ConfigElementDef>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "create_config_element",
        name: "CreateConfigElement",
        method: HttpMethod::Post,
        path: "/api/v1/config/{secret_type}/{config_element}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("secret_type", self.secret_type.as_str()), ("config_element", self.config_element.as_str())]
    }

    fn validate(&self) -> Result<(), CodecError> {
        let kind = ConfigElementKind::check_pair(&self.secret_type, &self.config_element)?;
        check_config_type(kind, &self.element.config)
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        self.element.encode().map(Some)
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_envelope_with(body, ConfigElementDef::decode)
    }
}

/// Options for `get_config_elements`.
#[derive(Debug, Clone, Default)]
pub struct GetConfigElementsOptions {
    /// Secret type.
    pub secret_type: String,
    /// Element kind.
    pub config_element: String,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl GetConfigElementsOptions {
    /// Options listing the elements of `config_element`.
    #[must_use]
    pub fn new(secret_type: impl Into<String>, config_element: impl Into<String>) -> Self {
        Self {
            secret_type: secret_type.into(),
            config_element: config_element.into(),
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for GetConfigElementsOptions {
    type Output = Envelope<ConfigElementGroup>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "get_config_elements",
        name: "GetConfigElements",
        method: HttpMethod::Get,
        path: "/api/v1/config/{secret_type}/{config_element}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("secret_type", self.secret_type.as_str()), ("config_element", self.config_element.as_str())]
    }

    fn validate(&self) -> Result<(), CodecError> {
        ConfigElementKind::check_pair(&self.secret_type, &self.config_element).map(|_| ())
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_json(body)
    }
}

/// Options for `get_config_element`.
#[derive(Debug, Clone, Default)]
pub struct GetConfigElementOptions {
    /// Secret type.
    pub secret_type: String,
    /// Element kind.
    pub config_element: String,
    /// Element name.
    pub config_name: String,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl GetConfigElementOptions {
    /// Options reading element `config_name`.
    #[must_use]
    pub fn new(
        secret_type: impl Into<String>,
        config_element: impl Into<String>,
        config_name: impl Into<String>,
    ) -> Self {
        Self {
            secret_type: secret_type.into(),
            config_element: config_element.into(),
            config_name: config_name.into(),
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for GetConfigElementOptions {
    type Output = Envelope<ConfigElementDef>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "get_config_element",
        name: "GetConfigElement",
        method: HttpMethod::Get,
        path: "/api/v1/config/{secret_type}/{config_element}/{config_name}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("secret_type", self.secret_type.as_str()),
            ("config_element", self.config_element.as_str()),
            ("config_name", self.config_name.as_str()),
        ]
    }

    fn validate(&self) -> Result<(), CodecError> {
        ConfigElementKind::check_pair(&self.secret_type, &self.config_element).map(|_| ())
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_envelope_with(body, ConfigElementDef::decode)
    }
}

/// Options for `update_config_element`.
#[derive(Debug, Clone)]
pub struct UpdateConfigElementOptions {
    /// Secret type.
    pub secret_type: String,
    /// Element kind.
    pub config_element: String,
    /// Element name.
    pub config_name: String,
    /// Replacement payload; its tag is sent as `type`.
    pub config: ConfigElementConfig,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl UpdateConfigElementOptions {
    /// Options replacing the payload of element `config_name`.
    #[must_use]
    pub fn new(
        secret_type: impl Into<String>,
        config_element: impl Into<String>,
        config_name: impl Into<String>,
        config: ConfigElementConfig,
    ) -> Self {
        Self {
            secret_type: secret_type.into(),
            config_element: config_element.into(),
            config_name: config_name.into(),
            config,
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for UpdateConfigElementOptions {
    type Output = Envelope<ConfigElementDef>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "update_config_element",
        name: "UpdateConfigElement",
        method: HttpMethod::Put,
        path: "/api/v1/config/{secret_type}/{config_element}/{config_name}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("secret_type", self.secret_type.as_str()),
            ("config_element", self.config_element.as_str()),
            ("config_name", self.config_name.as_str()),
        ]
    }

    fn validate(&self) -> Result<(), CodecError> {
        let kind = ConfigElementKind::check_pair(&self.secret_type, &self.config_element)?;
        check_config_type(kind, &self.config)
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        encode_typed_config(&self.config).map(|map| Some(Value::Object(map)))
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_envelope_with(body, ConfigElementDef::decode)
    }
}

/// Options for `delete_config_element`.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfigElementOptions {
    /// Secret type.
    pub secret_type: String,
    /// Element kind.
    pub config_element: String,
    /// Element name.
    pub config_name: String,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl DeleteConfigElementOptions {
    /// Options deleting element `config_name`.
    #[must_use]
    pub fn new(
        secret_type: impl Into<String>,
        config_element: impl Into<String>,
        config_name: impl Into<String>,
    ) -> Self {
        Self {
            secret_type: secret_type.into(),
            config_element: config_element.into(),
            config_name: config_name.into(),
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for DeleteConfigElementOptions {
    type Output = ();

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "delete_config_element",
        name: "DeleteConfigElement",
        method: HttpMethod::Delete,
        path: "/api/v1/config/{secret_type}/{config_element}/{config_name}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("secret_type", self.secret_type.as_str()),
            ("config_element", self.config_element.as_str()),
            ("config_name", self.config_name.as_str()),
        ]
    }

    fn validate(&self) -> Result<(), CodecError> {
        ConfigElementKind::check_pair(&self.secret_type, &self.config_element).map(|_| ())
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, _body: &[u8]) -> Result<Self::Output, CodecError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Config Element Actions
// ============================================================================

/// Options for `action_on_config_element`.
#[derive(Debug, Clone, Default)]
pub struct ActionOnConfigElementOptions {
    /// Secret type.
    pub secret_type: String,
    /// Element kind.
    pub config_element: String,
    /// Element name.
    pub config_name: String,
    /// Action name.
    pub action: String,
    /// Action input, sent as `{"config": ...}`.
    pub config: Option<ConfigAction>,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl ActionOnConfigElementOptions {
    /// Options running `action` on element `config_name`.
    #[must_use]
    pub fn new(
        secret_type: impl Into<String>,
        config_element: impl Into<String>,
        config_name: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            secret_type: secret_type.into(),
            config_element: config_element.into(),
            config_name: config_name.into(),
            action: action.into(),
            ..Self::default()
        }
    }

    /// Sets the action input.
    #[must_use]
    pub fn with_config(mut self, config: ConfigAction) -> Self {
        self.config = Some(config);
        self
    }
}

impl Operation for ActionOnConfigElementOptions {
    type Output = Envelope<ConfigElementActionData>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "action_on_config_element",
        name: "ActionOnConfigElement",
        method: HttpMethod::Post,
        path: "/api/v1/config/{secret_type}/{config_element}/{config_name}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("secret_type", self.secret_type.as_str()),
            ("config_element", self.config_element.as_str()),
            ("config_name", self.config_name.as_str()),
        ]
    }

    fn query_params(&self) -> QueryParams {
        QueryParams::new().push("action", &self.action)
    }

    fn validate(&self) -> Result<(), CodecError> {
        ConfigElementKind::check_pair(&self.secret_type, &self.config_element)?;
        codec::require_str("action", &self.action)?;
        ConfigActionName::from_str(&self.action)?;
        if !ConfigAction::supports(&self.config_element, &self.action) {
            return Err(CodecError::invalid(
                "action",
                format!("{} is not supported on {}", self.action, self.config_element),
            ));
        }
        if let Some(config) = &self.config
            && !config.fits(&self.action)
        {
            return Err(CodecError::invalid(
                "config",
                format!("{} body does not belong to {}", config.action(), self.action),
            ));
        }
        Ok(())
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        match &self.config {
            Some(config) => Ok(Some(json!({ "config": codec::encode(config)? }))),
            None => Ok(None),
        }
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_envelope_with(body, |value| ConfigElementActionData::decode(value, Some(self.action.as_str())))
    }
}

header_setter!(
    PutConfigOptions,
    GetConfigOptions,
    CreateConfigElementOptions,
    GetConfigElementsOptions,
    GetConfigElementOptions,
    UpdateConfigElementOptions,
    DeleteConfigElementOptions,
    ActionOnConfigElementOptions,
);
