// src/hierarchy/mod.rs

pub mod node;
pub mod builder;
pub mod stats;
pub mod filter;
pub mod display;

pub use node::{ContainerNode, LeafEntry, LeafKind, TreeChild, TreeRoot};
pub use builder::{HierarchyBuilder, HierarchyOptions, DEFAULT_MAX_DEPTH};
pub use stats::{compute_container_stats, ContainerStats};
pub use filter::filter_hierarchy;
pub use display::apply_leaf_cap;

use crate::models::{GroupRecord, OuRecord, UserRecord};

/// Собрать дерево с параметрами по умолчанию и без наблюдателя
pub fn build_hierarchy(ous: &[OuRecord], users: &[UserRecord], groups: &[GroupRecord]) -> TreeRoot {
    HierarchyBuilder::new(HierarchyOptions::default()).build(ous, users, groups)
}
