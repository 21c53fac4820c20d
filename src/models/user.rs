// src/models/user.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Запись пользователя (атрибуты LDAP, лишние поля сохраняются как есть)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct UserRecord {
    pub dn: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cn: Option<String>,

    #[serde(rename = "sAMAccountName", default, skip_serializing_if = "Option::is_none")]
    pub sam_account_name: Option<String>,

    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    /// Произвольные атрибуты: только для отображения
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl UserRecord {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            ..Self::default()
        }
    }

    pub fn with_account(mut self, sam_account_name: impl Into<String>) -> Self {
        self.sam_account_name = Some(sam_account_name.into());
        self
    }

    pub fn with_cn(mut self, cn: impl Into<String>) -> Self {
        self.cn = Some(cn.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Имя для дерева: первое непустое из displayName, cn, sAMAccountName
    pub fn label(&self) -> Option<&str> {
        [&self.display_name, &self.cn, &self.sam_account_name]
            .into_iter()
            .filter_map(|value| value.as_deref())
            .find(|value| !value.trim().is_empty())
    }

    /// Атрибуты для LeafEntry
    pub fn attributes(&self) -> BTreeMap<String, Value> {
        let mut attrs = self.extra.clone();
        if let Some(mail) = &self.mail {
            attrs.insert("mail".to_string(), Value::from(mail.as_str()));
        }
        if let Some(department) = &self.department {
            attrs.insert("department".to_string(), Value::from(department.as_str()));
        }
        if let Some(display_name) = &self.display_name {
            attrs.insert("displayName".to_string(), Value::from(display_name.as_str()));
        }
        attrs
    }
}
