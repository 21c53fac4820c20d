// src/hierarchy/stats.rs

use serde::{Deserialize, Serialize};

use crate::hierarchy::node::ContainerNode;

/// Сводка по узлу для панели деталей
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStats {
    pub direct_users: usize,
    pub direct_groups: usize,
    pub total_users: usize,
    pub total_groups: usize,
    /// Прямые дочерние OU
    pub sub_ou_count: usize,
    /// Все OU ниже узла
    pub descendant_ou_count: usize,
}

/// Узел настоящей иерархии OU для подсчёта итогов
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tally {
    pub parent: Option<usize>,
    /// Глубина DN; у родителя всегда меньше, чем у ребёнка
    pub depth: usize,
    pub users: usize,
    pub groups: usize,
}

/// total_* для каждого узла: свои листья плюс все потомки.
/// Без рекурсии: узлы обходятся от самых глубоких к корням.
pub(crate) fn subtree_totals(tallies: &[Tally]) -> Vec<(usize, usize)> {
    let mut totals: Vec<(usize, usize)> = tallies.iter().map(|t| (t.users, t.groups)).collect();
    let mut order: Vec<usize> = (0..tallies.len()).collect();
    order.sort_by(|a, b| tallies[*b].depth.cmp(&tallies[*a].depth));

    for i in order {
        if let Some(parent) = tallies[i].parent {
            let (users, groups) = totals[i];
            totals[parent].0 += users;
            totals[parent].1 += groups;
        }
    }
    totals
}

pub fn compute_container_stats(node: &ContainerNode) -> ContainerStats {
    ContainerStats {
        direct_users: node.direct_user_count,
        direct_groups: node.direct_group_count,
        total_users: node.total_user_count,
        total_groups: node.total_group_count,
        sub_ou_count: node.containers().count(),
        descendant_ou_count: node.descendant_count(),
    }
}
