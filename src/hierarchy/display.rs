// src/hierarchy/display.rs

use crate::events::{BuildEvent, BuildObserver};
use crate::hierarchy::node::{ContainerNode, TreeChild, TreeRoot};

/// Оставить в каждом контейнере не больше `cap` листьев (в порядке сортировки).
/// Остальные учитываются в `hidden_leaf_count`, счётчики пользователей и групп не меняются.
/// Применяется к готовому дереву, в том числе после `filter_hierarchy`.
pub fn apply_leaf_cap(tree: &TreeRoot, cap: Option<usize>, observer: &dyn BuildObserver) -> TreeRoot {
    let mut capped = tree.clone();
    if let Some(cap) = cap {
        cap_container(&mut capped.root, cap, observer);
    }
    capped
}

fn cap_container(node: &mut ContainerNode, cap: usize, observer: &dyn BuildObserver) {
    let before = node.children.len();
    let mut shown = 0;
    node.children.retain(|child| match child {
        TreeChild::Container(_) => true,
        TreeChild::Leaf(_) => {
            shown += 1;
            shown <= cap
        }
    });

    let hidden = before - node.children.len();
    if hidden > 0 {
        node.hidden_leaf_count += hidden;
        observer.on_event(&BuildEvent::LeavesTruncated {
            dn: node.dn.clone(),
            hidden,
        });
    }

    // Высота дерева ограничена max_depth
    for child in &mut node.children {
        if let TreeChild::Container(container) = child {
            cap_container(container, cap, observer);
        }
    }
}
