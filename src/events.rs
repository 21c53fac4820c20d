// src/events.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::Utc;
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Какой список содержал запись
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    OrganizationalUnit,
    User,
    Group,
}

/// Что произошло при сборке дерева. Ни одно событие не прерывает сборку.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BuildEvent {
    /// DN не разобран: запись исключена
    MalformedDn { record: RecordKind, dn: String, reason: String },
    /// DN повторился: более поздняя запись заменила предыдущую
    DuplicateDn { record: RecordKind, dn: String },
    /// Родитель не найден: OU поднята в корень
    OrphanContainer { dn: String, missing_parent: String },
    /// Превышен лимит глубины: OU прикреплена плоско к предку
    DepthFlattened { dn: String, attached_to: String },
    /// Контейнер для пользователя/группы не найден: запись не попала в дерево
    UnattachedLeaf { record: RecordKind, dn: String },
    /// Показаны не все листья контейнера
    LeavesTruncated { dn: String, hidden: usize },
    /// Сборка завершена
    Built { containers: usize, users: usize, groups: usize },
}

/// Необязательный хук наблюдения за сборкой
pub trait BuildObserver: Send + Sync {
    fn on_event(&self, event: &BuildEvent);
}

/// Ничего не делает
pub struct NoopObserver;

impl BuildObserver for NoopObserver {
    fn on_event(&self, _event: &BuildEvent) {}
}

/// Пишет события в tracing
pub struct TracingObserver;

impl BuildObserver for TracingObserver {
    fn on_event(&self, event: &BuildEvent) {
        match event {
            BuildEvent::MalformedDn { record, dn, reason } => {
                tracing::warn!(?record, %dn, %reason, "malformed DN skipped");
            }
            BuildEvent::DuplicateDn { record, dn } => {
                tracing::warn!(?record, %dn, "duplicate DN, later record wins");
            }
            BuildEvent::OrphanContainer { dn, missing_parent } => {
                tracing::warn!(%dn, %missing_parent, "parent OU not found, attached to root");
            }
            BuildEvent::DepthFlattened { dn, attached_to } => {
                tracing::debug!(%dn, %attached_to, "depth limit reached, OU flattened");
            }
            BuildEvent::UnattachedLeaf { record, dn } => {
                tracing::debug!(?record, %dn, "no container for entry, dropped from tree");
            }
            BuildEvent::LeavesTruncated { dn, hidden } => {
                tracing::debug!(%dn, hidden, "leaf display cap applied");
            }
            BuildEvent::Built { containers, users, groups } => {
                tracing::info!(containers, users, groups, "hierarchy built");
            }
        }
    }
}

/// Складывает события в память (lint, тесты)
#[derive(Default)]
pub struct CollectingObserver {
    events: Mutex<Vec<BuildEvent>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BuildEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl BuildObserver for CollectingObserver {
    fn on_event(&self, event: &BuildEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

// ========================================
// 📡 EventHub: рассылка событий подписчикам
// ========================================

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BuildNotice {
    pub id: Uuid,
    pub event: BuildEvent,
    pub timestamp: chrono::DateTime<Utc>,
}

pub struct EventHub {
    sender: broadcast::Sender<BuildNotice>,
}

impl EventHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1000);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BuildNotice> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: BuildEvent) {
        let notice = BuildNotice {
            id: Uuid::new_v4(),
            event,
            timestamp: Utc::now(),
        };
        let _ = self.sender.send(notice); // игнорируем, если нет получателей
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Хаб и пишет в лог, и рассылает
impl BuildObserver for EventHub {
    fn on_event(&self, event: &BuildEvent) {
        TracingObserver.on_event(event);
        self.emit(event.clone());
    }
}
