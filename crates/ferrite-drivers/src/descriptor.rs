//! Shared descriptor metadata

use crate::error::AdapterError;
use ferrite_host::json;
use ferrite_host::DriverCategory;
use serde_json::Value as Json;

/// Identity and metadata common to both backends. The backend-specific
/// implementation data (programs or native mappings) lives on the
/// descriptor that embeds this.
#[derive(Debug, Clone)]
pub struct DriverMeta {
    pub id: String,
    pub name: String,
    pub version: String,
    pub category: DriverCategory,
    pub config_schema: Option<Json>,
    pub persistent: bool,
}

impl DriverMeta {
    /// Parse the metadata half of a JSON driver description. `id` is
    /// mandatory; everything else has firmware defaults.
    pub fn from_description(description: &Json) -> Result<Self, AdapterError> {
        let id = json::get_str(description, "id")
            .ok_or_else(|| AdapterError::InvalidDescription("missing `id`".to_string()))?
            .to_string();
        if id.is_empty() {
            return Err(AdapterError::InvalidDescription("empty `id`".to_string()));
        }
        let name = json::get_str_or(description, "name", &id).to_string();
        let version = json::get_str_or(description, "version", "1.0.0").to_string();
        let category = match json::get_str(description, "category") {
            Some(raw) => raw
                .parse::<DriverCategory>()
                .map_err(AdapterError::InvalidDescription)?,
            None => DriverCategory::Custom,
        };
        let config_schema = json::lookup(description, "configSchema").cloned();
        let persistent = json::get_bool_or(description, "persistent", false);

        Ok(Self {
            id,
            name,
            version,
            category,
            config_schema,
            persistent,
        })
    }

    /// Render the metadata back into description form (the bridge backend
    /// synthesizes its persisted description from this)
    pub fn to_description(&self) -> Json {
        let mut obj = serde_json::Map::new();
        obj.insert("id".to_string(), Json::String(self.id.clone()));
        obj.insert("name".to_string(), Json::String(self.name.clone()));
        obj.insert("version".to_string(), Json::String(self.version.clone()));
        obj.insert(
            "category".to_string(),
            Json::String(self.category.as_str().to_string()),
        );
        if let Some(schema) = &self.config_schema {
            obj.insert("configSchema".to_string(), schema.clone());
        }
        obj.insert("persistent".to_string(), Json::Bool(self.persistent));
        Json::Object(obj)
    }
}
