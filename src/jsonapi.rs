//! JSON:API envelope and request body types.
//!
//! Responses are kept close to the wire: a [`ResourceObject`] carries its
//! attributes as an untyped JSON map because most HighBond fields are
//! configured per project type. Request bodies are built from typed
//! parameter structs whose unset fields are never serialized.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{HighbondError, Result};

/// A JSON:API resource object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    /// Resource type (e.g., "issues").
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Resource id. HighBond sends ids as strings; numeric ids are accepted too.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Attribute map as returned by the server.
    #[serde(default)]
    pub attributes: Map<String, Value>,

    /// Relationship map as returned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ResourceObject {
    /// Look up a raw attribute value.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Look up a string attribute.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(Value::as_str)
    }

    /// The id parsed as a number, when it is one.
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.parse().ok()
    }

    /// Id of the resource a to-one relationship points at.
    pub fn related_id(&self, relationship: &str) -> Option<&str> {
        self.relationships
            .as_ref()?
            .get(relationship)?
            .get("data")?
            .get("id")?
            .as_str()
    }
}

/// A JSON:API top-level document.
///
/// `T` is a single resource for member endpoints and a `Vec` of resources for
/// collection endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document<T> {
    /// Primary data.
    pub data: T,

    /// Side-loaded resources requested through `include`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Value>,
}

impl<T> Document<T> {
    /// Map the primary data to a different type.
    #[must_use]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Document<U> {
        Document {
            data: f(self.data),
            included: self.included,
            meta: self.meta,
            links: self.links,
        }
    }

    /// Total record count declared by the server in `meta`, if any.
    pub fn declared_total(&self) -> Option<u64> {
        let meta = self.meta.as_ref()?;
        meta.get("total")
            .or_else(|| meta.get("record_count"))
            .or_else(|| meta.get("page").and_then(|p| p.get("total")))
            .and_then(Value::as_u64)
    }
}

/// A `{type, id}` pair referencing another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

impl ResourceIdentifier {
    /// Create an identifier; the id is always sent as a string.
    pub fn new(resource_type: impl Into<String>, id: impl ToString) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.to_string(),
        }
    }
}

/// Body for `POST .../relationships/<name>` calls.
#[derive(Debug, Clone, Serialize)]
pub struct Linkage {
    pub data: Vec<ResourceIdentifier>,
}

impl Linkage {
    pub fn single(target: ResourceIdentifier) -> Self {
        Self { data: vec![target] }
    }
}

/// A custom attribute value as HighBond expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomAttribute {
    pub id: String,
    pub term: String,
    pub value: Vec<String>,
}

impl CustomAttribute {
    pub fn new(id: impl ToString, term: impl Into<String>, value: Vec<String>) -> Self {
        Self {
            id: id.to_string(),
            term: term.into(),
            value,
        }
    }
}

/// Parameters that become the `attributes` of a create or update body.
///
/// Serialization produces the attribute map, so fields that should stay
/// untouched must be skipped when unset. Relationship-bearing inputs are
/// `#[serde(skip)]` fields surfaced through [`relationships`](Self::relationships)
/// and [`owner_user_uid`](Self::owner_user_uid).
pub trait ResourceParams: Serialize + Send + Sync {
    /// Check the parameters before any request is made.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// User id that owns the resource. When present it is sent as the
    /// `owner_user` relationship and replaces any free-text `owner`.
    fn owner_user_uid(&self) -> Option<&str> {
        None
    }

    /// Additional relationships to send alongside the attributes.
    fn relationships(&self) -> Vec<(&'static str, ResourceIdentifier)> {
        Vec::new()
    }
}

/// A JSON:API create/update request body.
#[derive(Debug, Clone, Serialize)]
pub struct RequestBody {
    pub data: RequestData,
}

/// The `data` member of a [`RequestBody`].
#[derive(Debug, Clone, Serialize)]
pub struct RequestData {
    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub attributes: Map<String, Value>,

    #[serde(skip_serializing_if = "Map::is_empty")]
    pub relationships: Map<String, Value>,
}

impl RequestBody {
    /// An empty body for a resource type.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            data: RequestData {
                resource_type: resource_type.into(),
                id: None,
                attributes: Map::new(),
                relationships: Map::new(),
            },
        }
    }

    /// Build a body from typed parameters.
    ///
    /// `id` is set for updates only.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the parameters are rejected, or a parse
    /// error if they do not serialize to a JSON object.
    pub fn from_params<P: ResourceParams>(
        resource_type: &str,
        id: Option<u64>,
        params: &P,
    ) -> Result<Self> {
        params.validate()?;

        let attributes = match serde_json::to_value(params)? {
            Value::Object(map) => map,
            other => {
                return Err(HighbondError::validation(format!(
                    "{resource_type} parameters must serialize to an object, got {other}"
                )))
            }
        };

        let mut body = Self::new(resource_type);
        body.data.id = id.map(|id| id.to_string());
        body.data.attributes = attributes;

        if let Some(uid) = params.owner_user_uid() {
            body.data.attributes.remove("owner");
            body = body.relate("owner_user", ResourceIdentifier::new("users", uid));
        }
        for (name, target) in params.relationships() {
            body = body.relate(name, target);
        }

        Ok(body)
    }

    /// Set an attribute.
    #[must_use]
    pub fn attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.attributes.insert(key.to_string(), value.into());
        self
    }

    /// Add a to-one relationship.
    #[must_use]
    pub fn relate(mut self, name: &str, target: ResourceIdentifier) -> Self {
        self.data
            .relationships
            .insert(name.to_string(), serde_json::json!({ "data": target }));
        self
    }
}

/// Serde helper: skip a list that is unset or empty (create semantics).
pub(crate) fn is_none_or_empty<T>(value: &Option<Vec<T>>) -> bool {
    value.as_ref().map_or(true, Vec::is_empty)
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> core::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
