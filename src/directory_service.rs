// src/directory_service.rs

use crate::events::{BuildNotice, EventHub, NoopObserver};
use crate::hierarchy::{
    apply_leaf_cap, compute_container_stats, filter_hierarchy, ContainerStats, HierarchyBuilder,
    HierarchyOptions, TreeRoot,
};
use crate::models::{DirectorySnapshot, DistinguishedName, DnError};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};

/// Ошибки каталога
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid DN: {0}")]
    InvalidDn(#[from] DnError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unsupported snapshot format: {0}")]
    UnsupportedFormat(String),
}

/// Итог пересборки
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildSummary {
    pub ous: usize,
    pub users: usize,
    pub groups: usize,
    pub containers: usize,
    pub attached_users: usize,
    pub attached_groups: usize,
}

struct State {
    snapshot: Arc<DirectorySnapshot>,
    /// Полное дерево: все листья, по нему идёт поиск
    tree: Arc<TreeRoot>,
    /// То же дерево с лимитом листьев, для показа
    view: Arc<TreeRoot>,
}

impl State {
    fn new(snapshot: DirectorySnapshot, tree: TreeRoot, options: &HierarchyOptions, events: &EventHub) -> Self {
        let view = apply_leaf_cap(&tree, options.leaf_display_cap, events);
        Self {
            snapshot: Arc::new(snapshot),
            tree: Arc::new(tree),
            view: Arc::new(view),
        }
    }
}

/// Сервис каталога: последний снимок и дерево, собранное из него
pub struct DirectoryService {
    state: RwLock<State>,
    options: HierarchyOptions,
    events: Arc<EventHub>,
}

impl DirectoryService {
    /// Пустой сервис
    pub fn new(options: HierarchyOptions) -> Self {
        Self {
            state: RwLock::new(State {
                snapshot: Arc::new(DirectorySnapshot::default()),
                tree: Arc::new(TreeRoot::empty()),
                view: Arc::new(TreeRoot::empty()),
            }),
            options,
            events: Arc::new(EventHub::new()),
        }
    }

    /// Открыть сервис со снимком из файла (.json / .yaml / .yml)
    pub fn open<P: AsRef<Path>>(path: P, options: HierarchyOptions) -> Result<Self, DirectoryError> {
        let snapshot = load_snapshot(path)?;
        let events = Arc::new(EventHub::new());
        let tree = build_tree(&snapshot, options, &events);
        Ok(Self {
            state: RwLock::new(State::new(snapshot, tree, &options, &events)),
            options,
            events,
        })
    }

    pub fn options(&self) -> &HierarchyOptions {
        &self.options
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BuildNotice> {
        self.events.subscribe()
    }

    // === SNAPSHOT ===

    /// Заменить снимок и пересобрать дерево с нуля
    pub async fn replace_snapshot(&self, snapshot: DirectorySnapshot) -> RebuildSummary {
        // Сборка вне блокировки: снимок неизменяем
        let tree = build_tree(&snapshot, self.options, &self.events);
        let summary = RebuildSummary {
            ous: snapshot.ous.len(),
            users: snapshot.users.len(),
            groups: snapshot.groups.len(),
            containers: tree.container_count(),
            attached_users: tree.root.total_user_count,
            attached_groups: tree.root.total_group_count,
        };

        let next = State::new(snapshot, tree, &self.options, &self.events);
        *self.state.write().await = next;
        tracing::info!(
            ous = summary.ous,
            users = summary.users,
            groups = summary.groups,
            containers = summary.containers,
            "directory snapshot replaced"
        );
        summary
    }

    /// Перечитать снимок из файла
    pub async fn reload<P: AsRef<Path>>(&self, path: P) -> Result<RebuildSummary, DirectoryError> {
        let snapshot = load_snapshot(path)?;
        Ok(self.replace_snapshot(snapshot).await)
    }

    pub async fn snapshot(&self) -> Arc<DirectorySnapshot> {
        self.state.read().await.snapshot.clone()
    }

    // === HIERARCHY ===

    /// Полное дерево без лимита листьев
    pub async fn tree(&self) -> Arc<TreeRoot> {
        self.state.read().await.tree.clone()
    }

    /// Дерево для показа: лимит листьев уже применён
    pub async fn view(&self) -> Arc<TreeRoot> {
        self.state.read().await.view.clone()
    }

    /// Поиск по полному дереву, затем лимит листьев
    pub async fn search(&self, term: &str) -> TreeRoot {
        let tree = self.tree().await;
        let filtered = filter_hierarchy(&tree, term);
        apply_leaf_cap(&filtered, self.options.leaf_display_cap, &NoopObserver)
    }

    /// Статистика узла по DN
    pub async fn container_stats(&self, dn: &str) -> Result<ContainerStats, DirectoryError> {
        let canonical = dn.parse::<DistinguishedName>()?.to_string();
        let tree = self.tree().await;
        tree.root
            .find(&canonical)
            .map(compute_container_stats)
            .ok_or(DirectoryError::NotFound(canonical))
    }
}

fn build_tree(snapshot: &DirectorySnapshot, options: HierarchyOptions, events: &Arc<EventHub>) -> TreeRoot {
    HierarchyBuilder::new(options)
        .with_observer(events.clone())
        .build(&snapshot.ous, &snapshot.users, &snapshot.groups)
}

/// Прочитать снимок: формат по расширению файла
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<DirectorySnapshot, DirectoryError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let snapshot: DirectorySnapshot = match extension.as_str() {
        "json" => serde_json::from_str(&content)?,
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        other => return Err(DirectoryError::UnsupportedFormat(other.to_string())),
    };
    tracing::debug!(
        path = %path.display(),
        ous = snapshot.ous.len(),
        users = snapshot.users.len(),
        groups = snapshot.groups.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}
