// src/models/ou.rs

use serde::{Deserialize, Serialize};

/// Запись OU в том виде, в котором её отдаёт слой загрузки
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OuRecord {
    /// DN: например, OU=IT,DC=corp,DC=com
    pub dn: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OuRecord {
    pub fn new(dn: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
