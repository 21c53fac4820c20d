// src/hierarchy/filter.rs

use crate::hierarchy::node::{ContainerNode, LeafEntry, TreeChild, TreeRoot};

/// Отфильтровать дерево по подстроке (без учёта регистра), сохраняя цепочки предков.
/// Пустой запрос возвращает дерево без изменений.
pub fn filter_hierarchy(tree: &TreeRoot, term: &str) -> TreeRoot {
    let term = term.trim();
    if term.is_empty() {
        return tree.clone();
    }
    let needle = term.to_lowercase();

    let mut root = shell(&tree.root);
    root.children = filter_children(&tree.root, &needle);
    TreeRoot { root }
}

pub fn leaf_matches(leaf: &LeafEntry, needle: &str) -> bool {
    contains(&leaf.display_name, needle)
        || leaf.account_name.as_deref().is_some_and(|name| contains(name, needle))
}

fn filter_container(node: &ContainerNode, needle: &str) -> Option<ContainerNode> {
    // Совпало имя: поддерево целиком
    if contains(&node.name, needle) {
        return Some(node.clone());
    }

    let children = filter_children(node, needle);
    if children.is_empty() {
        return None;
    }
    let mut pruned = shell(node);
    pruned.children = children;
    Some(pruned)
}

fn filter_children(node: &ContainerNode, needle: &str) -> Vec<TreeChild> {
    node.children
        .iter()
        .filter_map(|child| match child {
            TreeChild::Container(container) => {
                filter_container(container, needle).map(TreeChild::Container)
            }
            TreeChild::Leaf(leaf) if leaf_matches(leaf, needle) => Some(child.clone()),
            TreeChild::Leaf(_) => None,
        })
        .collect()
}

/// Копия узла без детей; все счётчики остаются как во входном дереве
fn shell(node: &ContainerNode) -> ContainerNode {
    ContainerNode {
        dn: node.dn.clone(),
        name: node.name.clone(),
        description: node.description.clone(),
        depth: node.depth,
        children: Vec::new(),
        direct_user_count: node.direct_user_count,
        direct_group_count: node.direct_group_count,
        total_user_count: node.total_user_count,
        total_group_count: node.total_group_count,
        hidden_leaf_count: node.hidden_leaf_count,
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
