// src/models/snapshot.rs

use crate::models::{GroupRecord, OuRecord, UserRecord};
use serde::{Deserialize, Serialize};

/// Снимок каталога: три плоских списка, полученных слоем загрузки
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DirectorySnapshot {
    #[serde(default)]
    pub ous: Vec<OuRecord>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
}

impl DirectorySnapshot {
    pub fn is_empty(&self) -> bool {
        self.ous.is_empty() && self.users.is_empty() && self.groups.is_empty()
    }
}
