// src/hierarchy/node.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::DistinguishedName;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum LeafKind {
    User,
    Group,
}

/// Пользователь или группа, привязанные к контейнеру
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeafEntry {
    pub dn: String,
    pub display_name: String,
    /// sAMAccountName, второй идентификатор для поиска
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    pub kind: LeafKind,
    /// Атрибуты только для отображения (mail, department, memberCount…)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
}

/// Дочерний элемент контейнера
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TreeChild {
    Container(ContainerNode),
    Leaf(LeafEntry),
}

impl TreeChild {
    pub fn name(&self) -> &str {
        match self {
            TreeChild::Container(node) => &node.name,
            TreeChild::Leaf(leaf) => &leaf.display_name,
        }
    }

    pub fn dn(&self) -> &str {
        match self {
            TreeChild::Container(node) => &node.dn,
            TreeChild::Leaf(leaf) => &leaf.dn,
        }
    }

    /// Порядок: контейнеры, пользователи, группы
    pub(crate) fn rank(&self) -> u8 {
        match self {
            TreeChild::Container(_) => 0,
            TreeChild::Leaf(LeafEntry { kind: LeafKind::User, .. }) => 1,
            TreeChild::Leaf(LeafEntry { kind: LeafKind::Group, .. }) => 2,
        }
    }
}

/// Организационное подразделение в дереве
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerNode {
    pub dn: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Число компонентов OU= в DN (у корня домена 0)
    pub depth: usize,
    pub children: Vec<TreeChild>,
    pub direct_user_count: usize,
    pub direct_group_count: usize,
    pub total_user_count: usize,
    pub total_group_count: usize,
    /// Привязано, но не показано из-за лимита листьев
    #[serde(default)]
    pub hidden_leaf_count: usize,
}

impl ContainerNode {
    pub fn new(dn: impl Into<String>, name: impl Into<String>, depth: usize) -> Self {
        Self {
            dn: dn.into(),
            name: name.into(),
            description: None,
            depth,
            children: Vec::new(),
            direct_user_count: 0,
            direct_group_count: 0,
            total_user_count: 0,
            total_group_count: 0,
            hidden_leaf_count: 0,
        }
    }

    pub fn containers(&self) -> impl Iterator<Item = &ContainerNode> {
        self.children.iter().filter_map(|child| match child {
            TreeChild::Container(node) => Some(node),
            TreeChild::Leaf(_) => None,
        })
    }

    pub fn leaves(&self) -> impl Iterator<Item = &LeafEntry> {
        self.children.iter().filter_map(|child| match child {
            TreeChild::Leaf(leaf) => Some(leaf),
            TreeChild::Container(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Поиск узла по DN в поддереве (включая сам узел)
    pub fn find(&self, dn: &str) -> Option<&ContainerNode> {
        if self.dn == dn {
            return Some(self);
        }
        self.containers().find_map(|child| child.find(dn))
    }

    /// Все контейнеры поддерева, не считая сам узел
    pub fn descendant_count(&self) -> usize {
        self.containers().map(|child| 1 + child.descendant_count()).sum()
    }

    /// Высота поддерева в уровнях контейнеров (лист-контейнер = 1)
    pub fn height(&self) -> usize {
        1 + self.containers().map(ContainerNode::height).max().unwrap_or(0)
    }

    pub(crate) fn sort_children(&mut self) {
        self.children.sort_by(|a, b| {
            a.rank()
                .cmp(&b.rank())
                .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
                .then_with(|| a.name().cmp(b.name()))
                .then_with(|| a.dn().cmp(b.dn()))
        });
    }
}

/// Синтетический корень домена, оборачивающий все корневые OU
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct TreeRoot {
    pub root: ContainerNode,
}

impl TreeRoot {
    pub fn empty() -> Self {
        Self {
            root: ContainerNode::new(String::new(), String::new(), 0),
        }
    }

    /// Корень для домена `DC=...`; имя через точку
    pub fn for_domain(domain: Option<&DistinguishedName>) -> Self {
        match domain {
            Some(dn) => Self {
                root: ContainerNode::new(dn.to_string(), dn.domain_name(), 0),
            },
            None => Self::empty(),
        }
    }

    /// Поиск по DN; строка приводится к канонической форме, если разбирается
    pub fn find(&self, dn: &str) -> Option<&ContainerNode> {
        let canonical = dn
            .parse::<DistinguishedName>()
            .map(|parsed| parsed.to_string())
            .unwrap_or_else(|_| dn.to_string());
        self.root.find(&canonical)
    }

    /// Число OU в дереве (без синтетического корня)
    pub fn container_count(&self) -> usize {
        self.root.descendant_count()
    }

    /// Максимальная глубина вложенности OU
    pub fn height(&self) -> usize {
        self.root.height() - 1
    }
}

impl Default for TreeRoot {
    fn default() -> Self {
        Self::empty()
    }
}
