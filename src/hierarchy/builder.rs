// src/hierarchy/builder.rs

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::events::{BuildEvent, BuildObserver, NoopObserver, RecordKind};
use crate::hierarchy::node::{ContainerNode, LeafEntry, LeafKind, TreeChild, TreeRoot};
use crate::hierarchy::stats::{subtree_totals, Tally};
use crate::models::{DistinguishedName, GroupRecord, OuRecord, UserRecord};

pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Параметры сборки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyOptions {
    /// Максимум уровней OU в дереве; всё глубже прикрепляется плоско
    pub max_depth: usize,
    /// Сколько листьев показывать в одном контейнере (None: все).
    /// Сборщик его не применяет: см. `apply_leaf_cap`
    pub leaf_display_cap: Option<usize>,
}

impl Default for HierarchyOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            leaf_display_cap: None,
        }
    }
}

impl HierarchyOptions {
    /// Корни и хотя бы один уровень под ними
    fn effective_max_depth(&self) -> usize {
        self.max_depth.max(2)
    }
}

/// Промежуточная запись OU до материализации
struct Slot {
    dn: DistinguishedName,
    key: String,
    name: String,
    description: Option<String>,
    parent: Option<usize>,
    children: Vec<usize>,
    leaves: Vec<LeafEntry>,
    /// Суммы по настоящему поддереву, до уплощения
    total_users: usize,
    total_groups: usize,
}

impl Slot {
    fn to_node(&self, leaves: Vec<LeafEntry>) -> ContainerNode {
        let mut node = ContainerNode::new(self.key.clone(), self.name.clone(), self.dn.depth());
        node.description = self.description.clone();
        node.direct_user_count = leaves.iter().filter(|l| l.kind == LeafKind::User).count();
        node.direct_group_count = leaves.iter().filter(|l| l.kind == LeafKind::Group).count();
        node.total_user_count = self.total_users;
        node.total_group_count = self.total_groups;
        node.children = leaves.into_iter().map(TreeChild::Leaf).collect();
        node
    }
}

/// Сборщик дерева OU по плоским спискам DN
pub struct HierarchyBuilder {
    options: HierarchyOptions,
    observer: Arc<dyn BuildObserver>,
}

impl HierarchyBuilder {
    pub fn new(options: HierarchyOptions) -> Self {
        Self {
            options,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn BuildObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn options(&self) -> &HierarchyOptions {
        &self.options
    }

    /// Собрать дерево. Входные срезы не изменяются; порядок записей на результат не влияет
    /// (при повторе DN побеждает более поздняя запись).
    pub fn build(&self, ous: &[OuRecord], users: &[UserRecord], groups: &[GroupRecord]) -> TreeRoot {
        let mut domain: Option<DistinguishedName> = None;
        let mut note_domain = |dn: &DistinguishedName| {
            if let Some(suffix) = dn.domain_suffix() {
                let smaller = domain
                    .as_ref()
                    .is_none_or(|current| suffix.to_string() < current.to_string());
                if smaller {
                    domain = Some(suffix);
                }
            }
        };

        // 1. DN → OU
        let mut by_dn: BTreeMap<String, Slot> = BTreeMap::new();
        for record in ous {
            let Some(dn) = self.parse(RecordKind::OrganizationalUnit, &record.dn) else {
                continue;
            };
            if !dn.is_organizational_unit() {
                self.emit(BuildEvent::MalformedDn {
                    record: RecordKind::OrganizationalUnit,
                    dn: record.dn.clone(),
                    reason: "leaf component is not OU=".to_string(),
                });
                continue;
            }
            note_domain(&dn);

            let key = dn.to_string();
            let slot = Slot {
                name: dn.leaf().value.clone(),
                description: record.description.clone(),
                key: key.clone(),
                dn,
                parent: None,
                children: Vec::new(),
                leaves: Vec::new(),
                total_users: 0,
                total_groups: 0,
            };
            if by_dn.insert(key.clone(), slot).is_some() {
                self.emit(BuildEvent::DuplicateDn {
                    record: RecordKind::OrganizationalUnit,
                    dn: key,
                });
            }
        }

        let mut slots: Vec<Slot> = by_dn.into_values().collect();
        let index: HashMap<String, usize> = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.key.clone(), i))
            .collect();

        // 2-3. Родители
        let mut roots = Vec::new();
        for i in 0..slots.len() {
            if slots[i].dn.depth() == 1 {
                roots.push(i);
                continue;
            }
            let parent_key = slots[i].dn.parent().map(|p| p.to_string()).unwrap_or_default();
            match index.get(&parent_key) {
                Some(&parent) => {
                    slots[parent].children.push(i);
                    slots[i].parent = Some(parent);
                }
                None => {
                    self.emit(BuildEvent::OrphanContainer {
                        dn: slots[i].key.clone(),
                        missing_parent: parent_key,
                    });
                    roots.push(i);
                }
            }
        }

        // 5. Пользователи и группы
        let mut leaves: BTreeMap<(LeafKind, String), (Option<String>, LeafEntry)> = BTreeMap::new();
        for user in users {
            if let Some(dn) = self.parse(RecordKind::User, &user.dn) {
                note_domain(&dn);
                let entry = LeafEntry {
                    dn: dn.to_string(),
                    display_name: user.label().unwrap_or(&dn.leaf().value).to_string(),
                    account_name: user.sam_account_name.clone(),
                    kind: LeafKind::User,
                    attributes: user.attributes(),
                };
                self.collect_leaf(&mut leaves, RecordKind::User, &dn, entry);
            }
        }
        for group in groups {
            if let Some(dn) = self.parse(RecordKind::Group, &group.dn) {
                note_domain(&dn);
                let entry = LeafEntry {
                    dn: dn.to_string(),
                    display_name: group.label().unwrap_or(&dn.leaf().value).to_string(),
                    account_name: group.sam_account_name.clone(),
                    kind: LeafKind::Group,
                    attributes: group.attributes(),
                };
                self.collect_leaf(&mut leaves, RecordKind::Group, &dn, entry);
            }
        }

        let (mut attached_users, mut attached_groups) = (0, 0);
        for ((kind, dn), (parent_key, entry)) in leaves {
            match parent_key.and_then(|key| index.get(&key).copied()) {
                Some(i) => {
                    match kind {
                        LeafKind::User => attached_users += 1,
                        LeafKind::Group => attached_groups += 1,
                    }
                    slots[i].leaves.push(entry);
                }
                None => self.emit(BuildEvent::UnattachedLeaf {
                    record: match kind {
                        LeafKind::User => RecordKind::User,
                        LeafKind::Group => RecordKind::Group,
                    },
                    dn,
                }),
            }
        }

        // Итоги считаются по настоящей иерархии, уплощение их не меняет
        let tallies: Vec<Tally> = slots
            .iter()
            .map(|slot| Tally {
                parent: slot.parent,
                depth: slot.dn.depth(),
                users: slot.leaves.iter().filter(|l| l.kind == LeafKind::User).count(),
                groups: slot.leaves.iter().filter(|l| l.kind == LeafKind::Group).count(),
            })
            .collect();
        for (slot, (users, groups)) in slots.iter_mut().zip(subtree_totals(&tallies)) {
            slot.total_users = users;
            slot.total_groups = groups;
        }

        // 4, 6, 7. Материализация от корней
        let mut tree = TreeRoot::for_domain(domain.as_ref());
        for root in roots {
            let node = self.materialize(root, 1, &mut slots);
            tree.root.total_user_count += node.total_user_count;
            tree.root.total_group_count += node.total_group_count;
            tree.root.children.push(TreeChild::Container(node));
        }
        tree.root.sort_children();

        self.emit(BuildEvent::Built {
            containers: tree.container_count(),
            users: attached_users,
            groups: attached_groups,
        });
        tree
    }

    fn materialize(&self, idx: usize, level: usize, slots: &mut [Slot]) -> ContainerNode {
        let children = std::mem::take(&mut slots[idx].children);
        let leaves = std::mem::take(&mut slots[idx].leaves);
        let mut node = slots[idx].to_node(leaves);

        if level + 1 < self.options.effective_max_depth() {
            for child in children {
                let child = self.materialize(child, level + 1, slots);
                node.children.push(TreeChild::Container(child));
            }
        } else {
            // Дальше не спускаемся: все потомки становятся плоскими детьми узла
            let mut stack: Vec<(usize, bool)> = children.into_iter().map(|c| (c, true)).collect();
            while let Some((i, direct)) = stack.pop() {
                let grandchildren = std::mem::take(&mut slots[i].children);
                stack.extend(grandchildren.into_iter().map(|c| (c, false)));

                let leaves = std::mem::take(&mut slots[i].leaves);
                let mut flat = slots[i].to_node(leaves);
                flat.sort_children();
                if !direct {
                    self.emit(BuildEvent::DepthFlattened {
                        dn: flat.dn.clone(),
                        attached_to: node.dn.clone(),
                    });
                }
                node.children.push(TreeChild::Container(flat));
            }
        }

        node.sort_children();
        node
    }

    /// Повтор DN в пределах одного вида: побеждает более поздняя запись
    fn collect_leaf(
        &self,
        leaves: &mut BTreeMap<(LeafKind, String), (Option<String>, LeafEntry)>,
        record: RecordKind,
        dn: &DistinguishedName,
        entry: LeafEntry,
    ) {
        let key = (entry.kind, entry.dn.clone());
        let parent_key = dn.parent().map(|parent| parent.to_string());
        if leaves.insert(key, (parent_key, entry)).is_some() {
            self.emit(BuildEvent::DuplicateDn {
                record,
                dn: dn.to_string(),
            });
        }
    }

    fn parse(&self, record: RecordKind, raw: &str) -> Option<DistinguishedName> {
        match raw.parse::<DistinguishedName>() {
            Ok(dn) => Some(dn),
            Err(e) => {
                self.emit(BuildEvent::MalformedDn {
                    record,
                    dn: raw.to_string(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    fn emit(&self, event: BuildEvent) {
        self.observer.on_event(&event);
    }
}
