use alloc::string::String;
use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WireError;

// -----------------------------------------------------------------------------
// ObjectRef

/// Wire descriptor of a host object.
///
/// Never carries the object's value, only ways to find it again: the
/// numeric handle, the asset path, and the content id. Any of them can be
/// absent; a handle of `0` stands for "no handle".
///
/// # Examples
///
/// ```
/// use hb_reflect::refs::{ObjectRef, ReferenceKey};
///
/// let r: ObjectRef = serde_json::from_str(r#"{"instanceID": 0, "assetPath": "Assets/a.mat"}"#).unwrap();
/// assert!(!r.is_null());
/// assert_eq!(r.keys().next(), Some(ReferenceKey::PathReference("Assets/a.mat".into())));
/// assert_eq!(r.to_string(), "assetPath=Assets/a.mat");
///
/// assert!(ObjectRef::default().is_null());
/// assert_eq!(ObjectRef::default().to_string(), "instanceID=0");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    #[serde(rename = "instanceID", default)]
    pub instance_id: i64,
    #[serde(rename = "assetPath", default, skip_serializing_if = "Option::is_none")]
    pub asset_path: Option<String>,
    #[serde(rename = "assetGuid", default, skip_serializing_if = "Option::is_none")]
    pub asset_guid: Option<String>,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

impl ObjectRef {
    /// The descriptor written for null and destroyed references.
    pub const NULL: Self = Self {
        instance_id: 0,
        asset_path: None,
        asset_guid: None,
    };

    #[inline]
    pub const fn from_handle(instance_id: i64) -> Self {
        Self {
            instance_id,
            asset_path: None,
            asset_guid: None,
        }
    }

    #[inline]
    pub fn with_asset_path(mut self, path: impl Into<String>) -> Self {
        self.asset_path = Some(path.into());
        self
    }

    #[inline]
    pub fn with_asset_guid(mut self, guid: impl Into<String>) -> Self {
        self.asset_guid = Some(guid.into());
        self
    }

    /// Whether no descriptor is present at all.
    pub fn is_null(&self) -> bool {
        self.instance_id == 0 && self.asset_path().is_none() && self.asset_guid().is_none()
    }

    #[inline]
    pub fn asset_path(&self) -> Option<&str> {
        non_empty(&self.asset_path)
    }

    #[inline]
    pub fn asset_guid(&self) -> Option<&str> {
        non_empty(&self.asset_guid)
    }

    /// The present descriptors, in lookup order.
    pub fn keys(&self) -> impl Iterator<Item = ReferenceKey> + '_ {
        let handle = (self.instance_id != 0).then_some(ReferenceKey::InstanceHandle(self.instance_id));
        let path = self.asset_path().map(|p| ReferenceKey::PathReference(p.into()));
        let guid = self.asset_guid().map(|g| ReferenceKey::ContentReference(g.into()));
        handle.into_iter().chain(path).chain(guid)
    }

    pub fn from_value(value: &Value) -> Result<Self, WireError> {
        Self::deserialize(value).map_err(WireError::from)
    }

    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("instanceID".into(), Value::from(self.instance_id));
        if let Some(path) = &self.asset_path {
            map.insert("assetPath".into(), Value::from(path.as_str()));
        }
        if let Some(guid) = &self.asset_guid {
            map.insert("assetGuid".into(), Value::from(guid.as_str()));
        }
        Value::Object(map)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        if self.instance_id != 0 {
            write!(f, "instanceID={}", self.instance_id)?;
            sep = ", ";
        }
        if let Some(path) = self.asset_path() {
            write!(f, "{sep}assetPath={path}")?;
            sep = ", ";
        }
        if let Some(guid) = self.asset_guid() {
            write!(f, "{sep}assetGuid={guid}")?;
            sep = ", ";
        }
        if sep.is_empty() {
            f.write_str("instanceID=0")?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// ReferenceKey

/// One way of identifying a host object, used as a context key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceKey {
    InstanceHandle(i64),
    PathReference(String),
    ContentReference(String),
}

impl fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstanceHandle(id) => write!(f, "instanceID={id}"),
            Self::PathReference(path) => write!(f, "assetPath={path}"),
            Self::ContentReference(guid) => write!(f, "assetGuid={guid}"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
