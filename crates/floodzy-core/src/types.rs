//! Common types used across Floodzy

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

// =============================================================================
// CONVERSATION
// =============================================================================

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "assistant")]
    Model,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
        }
    }
}

/// One element of the caller-owned conversation history.
///
/// Accepts both `{role, content}` and the Gemini-shaped
/// `{role, parts: [{text}]}` on input; always serializes as `{role, content}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTurn")]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
        }
    }
}

#[derive(Deserialize)]
struct RawTurn {
    role: Role,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    parts: Vec<RawTextPart>,
}

#[derive(Deserialize)]
struct RawTextPart {
    #[serde(default)]
    text: Option<String>,
}

impl From<RawTurn> for ConversationTurn {
    fn from(raw: RawTurn) -> Self {
        let content = raw.content.unwrap_or_else(|| {
            raw.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        });
        Self {
            role: raw.role,
            content,
        }
    }
}

// =============================================================================
// TOOLS
// =============================================================================

/// Scalar type of a declared tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    String,
    Number,
}

/// A named, typed, optionally-required tool parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
    #[serde(default)]
    pub required: bool,
}

impl Parameter {
    pub fn string(name: &str, description: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            kind: ParameterKind::String,
            description: description.into(),
            allowed_values: Vec::new(),
            required: false,
        }
    }

    pub fn number(name: &str, description: impl Into<String>) -> Self {
        Self {
            kind: ParameterKind::Number,
            ..Self::string(name, description)
        }
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Static declaration of one callable capability, advertised to the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
}

impl ToolDeclaration {
    /// Render the parameter list as an OpenAPI-style object schema
    pub fn parameter_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            let mut prop = json!({
                "type": param.kind,
                "description": param.description,
            });
            if !param.allowed_values.is_empty() {
                prop["enum"] = json!(param.allowed_values);
            }
            properties.insert(param.name.clone(), prop);
        }
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// A structured request from the model to invoke one declared function.
///
/// Neither the name nor the arguments are trusted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FunctionCallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl FunctionCallRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Map::new(),
        }
    }

    pub fn with_arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.to_string(), value.into());
        self
    }

    /// Build from a raw `args` value; anything but an object yields no arguments
    pub fn from_value(name: impl Into<String>, args: Value) -> Self {
        let arguments = match args {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Non-blank string argument
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Finite numeric argument; numeric strings are accepted
    pub fn number_arg(&self, key: &str) -> Option<f64> {
        let value = match self.arguments.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        value.is_finite().then_some(value)
    }
}

/// Observed outcome of a tool invocation, fed back to the model either way
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    Ok(Value),
    Err { message: String },
}

impl ToolResult {
    pub fn err(message: impl Into<String>) -> Self {
        ToolResult::Err {
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ToolResult::Ok(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ToolResult::Ok(_) => None,
            ToolResult::Err { message } => Some(message),
        }
    }

    /// The function-response body sent to the model; always a JSON object
    pub fn to_response_payload(&self) -> Value {
        match self {
            ToolResult::Ok(Value::Object(map)) => Value::Object(map.clone()),
            ToolResult::Ok(other) => json!({ "result": other }),
            ToolResult::Err { message } => json!({ "error": message }),
        }
    }
}

// =============================================================================
// LOCATIONS
// =============================================================================

/// One geocoder match; lat/lon are guaranteed to be within range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeCandidate {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

impl GeocodeCandidate {
    /// Returns `None` for coordinates outside [-90,90] x [-180,180]
    pub fn new(latitude: f64, longitude: f64, display_name: impl Into<String>) -> Option<Self> {
        valid_coordinates(latitude, longitude).then(|| Self {
            latitude,
            longitude,
            display_name: display_name.into(),
        })
    }

    pub fn is_valid(&self) -> bool {
        valid_coordinates(self.latitude, self.longitude)
    }
}

/// Whether a pair is a usable WGS84 coordinate
pub fn valid_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

/// Where a resolved coordinate pair came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Explicit,
    Geocoded,
    Default,
}

/// Coordinates used for a single tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub label: Option<String>,
    /// Set when a requested place could not be found and the default was used
    pub warning: Option<String>,
    pub source: LocationSource,
}

/// Process-wide fallback location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultLocation {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

pub const DEFAULT_LOCATION: DefaultLocation = DefaultLocation {
    name: "Jakarta",
    latitude: -6.2088,
    longitude: 106.8456,
};

impl DefaultLocation {
    pub fn resolved(&self, warning: Option<String>) -> ResolvedLocation {
        ResolvedLocation {
            latitude: self.latitude,
            longitude: self.longitude,
            label: Some(self.name.to_string()),
            warning,
            source: LocationSource::Default,
        }
    }
}
