// src/models/group.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ========================================
// 👥 MemberList: `member` бывает строкой или массивом
// ========================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum MemberList {
    One(String),
    Many(Vec<String>),
}

impl MemberList {
    pub fn len(&self) -> usize {
        match self {
            MemberList::One(_) => 1,
            MemberList::Many(members) => members.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ========================================
// 👥 GroupRecord
// ========================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct GroupRecord {
    pub dn: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cn: Option<String>,

    #[serde(rename = "sAMAccountName", default, skip_serializing_if = "Option::is_none")]
    pub sam_account_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberList>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl GroupRecord {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            ..Self::default()
        }
    }

    pub fn with_members(mut self, members: Vec<String>) -> Self {
        self.member = Some(MemberList::Many(members));
        self
    }

    pub fn member_count(&self) -> usize {
        self.member.as_ref().map_or(0, MemberList::len)
    }

    /// Имя для дерева: cn → sAMAccountName
    pub fn label(&self) -> Option<&str> {
        self.cn
            .as_deref()
            .or(self.sam_account_name.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn attributes(&self) -> BTreeMap<String, Value> {
        let mut attrs = self.extra.clone();
        if let Some(description) = &self.description {
            attrs.insert("description".to_string(), Value::from(description.as_str()));
        }
        attrs.insert("memberCount".to_string(), Value::from(self.member_count()));
        attrs
    }
}
