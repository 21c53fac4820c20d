// tests/integration/hierarchy.rs

use nextdomen_console::hierarchy::{HierarchyBuilder, HierarchyOptions, TreeChild};
use nextdomen_console::models::{GroupRecord, OuRecord, UserRecord};
use nextdomen_console::config::AppConfig;
use nextdomen_console::events::NoopObserver;
use nextdomen_console::{apply_leaf_cap, build_hierarchy, compute_container_stats, filter_hierarchy};

const SUFFIX: &str = "DC=corp,DC=acme,DC=com";

fn ou(path: &str) -> OuRecord {
    let name = path.split(',').next().unwrap_or_default().trim_start_matches("OU=");
    OuRecord::new(format!("{},{}", path, SUFFIX), name)
}

fn user(cn: &str, path: &str) -> UserRecord {
    UserRecord::new(format!("CN={},{},{}", cn, path, SUFFIX)).with_cn(cn)
}

fn group(cn: &str, path: &str) -> GroupRecord {
    GroupRecord::new(format!("CN={},{},{}", cn, path, SUFFIX))
}

fn directory() -> (Vec<OuRecord>, Vec<UserRecord>, Vec<GroupRecord>) {
    let ous = vec![
        ou("OU=Sales"),
        ou("OU=APAC,OU=Sales"),
        ou("OU=EMEA,OU=Sales"),
        ou("OU=IT"),
        ou("OU=Servers,OU=IT"),
    ];
    let users = vec![
        user("Jane", "OU=APAC,OU=Sales"),
        user("Ken", "OU=APAC,OU=Sales"),
        user("Otto", "OU=EMEA,OU=Sales"),
        user("Root", "OU=IT"),
        // нет такого контейнера
        user("Lost", "OU=Nowhere"),
    ];
    let groups = vec![
        group("Sellers", "OU=Sales"),
        group("Admins", "OU=IT"),
        group("Backup", "OU=Servers,OU=IT"),
    ];
    (ous, users, groups)
}

#[test]
fn totals_match_attached_leaves() {
    let (ous, users, groups) = directory();
    let tree = build_hierarchy(&ous, &users, &groups);

    assert_eq!(tree.root.total_user_count, 4);
    assert_eq!(tree.root.total_group_count, 3);

    let sales = tree.find(&format!("OU=Sales,{}", SUFFIX)).unwrap();
    assert_eq!(sales.total_user_count, 3);
    assert_eq!(sales.direct_user_count, 0);
    assert_eq!(sales.direct_group_count, 1);

    let stats = compute_container_stats(sales);
    assert_eq!(stats.sub_ou_count, 2);
    assert_eq!(stats.total_groups, 1);
}

#[test]
fn input_order_does_not_change_tree() {
    let (ous, users, groups) = directory();
    let expected = build_hierarchy(&ous, &users, &groups);

    let mut ous_rev = ous.clone();
    ous_rev.reverse();
    let mut users_rot = users.clone();
    users_rot.rotate_left(2);
    let mut groups_rev = groups.clone();
    groups_rev.reverse();

    assert_eq!(build_hierarchy(&ous_rev, &users_rot, &groups_rev), expected);
}

#[test]
fn empty_search_returns_whole_tree() {
    let (ous, users, groups) = directory();
    let tree = build_hierarchy(&ous, &users, &groups);
    assert_eq!(filter_hierarchy(&tree, ""), tree);
    assert_eq!(filter_hierarchy(&tree, "   "), tree);
}

#[test]
fn search_keeps_path_to_match() {
    let (ous, users, groups) = directory();
    let tree = build_hierarchy(&ous, &users, &groups);
    let filtered = filter_hierarchy(&tree, "jane");

    let names: Vec<_> = filtered.root.containers().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Sales"]);

    let sales = filtered.root.containers().next().unwrap();
    let apac: Vec<_> = sales.containers().collect();
    assert_eq!(apac.len(), 1);
    assert_eq!(apac[0].name, "APAC");

    let leaves: Vec<_> = apac[0].leaves().map(|l| l.display_name.as_str()).collect();
    assert_eq!(leaves, ["Jane"]);
    // счётчики не пересчитываются фильтром
    assert_eq!(apac[0].total_user_count, 2);
}

#[test]
fn search_without_match_leaves_bare_root() {
    let (ous, users, groups) = directory();
    let tree = build_hierarchy(&ous, &users, &groups);
    let filtered = filter_hierarchy(&tree, "zzz");
    assert_eq!(filtered.root.dn, tree.root.dn);
    assert!(filtered.root.children.is_empty());
}

#[test]
fn deep_chain_is_bounded_and_complete() {
    let mut ous = Vec::new();
    let mut path = String::new();
    for level in 1..=15 {
        path = if path.is_empty() {
            format!("OU=L{}", level)
        } else {
            format!("OU=L{},{}", level, path)
        };
        ous.push(ou(&path));
    }
    let tree = build_hierarchy(&ous, &[], &[]);

    assert!(tree.height() <= 10);
    assert_eq!(tree.container_count(), 15);
    for level in 1..=15 {
        assert!(
            tree.find(&ous[level - 1].dn).is_some(),
            "L{} missing",
            level
        );
    }
}

#[test]
fn orphan_is_lifted_to_root() {
    let tree = build_hierarchy(&[OuRecord::new("OU=Ghost,OU=Missing,DC=x,DC=y", "Ghost")], &[], &[]);
    let roots: Vec<_> = tree.root.children.iter().collect();
    assert_eq!(roots.len(), 1);
    assert!(matches!(roots[0], TreeChild::Container(c) if c.name == "Ghost"));
}

#[test]
fn custom_depth_limit_applies() {
    let (ous, users, groups) = directory();
    let options = HierarchyOptions { max_depth: 2, leaf_display_cap: None };
    let tree = HierarchyBuilder::new(options).build(&ous, &users, &groups);

    assert!(tree.height() <= 2);
    assert_eq!(tree.container_count(), 5);
    assert_eq!(tree.root.total_user_count, 4);
}

#[test]
fn shipped_cap_does_not_hide_leaves_from_search() {
    let options = AppConfig::default().hierarchy_options();
    let mut users: Vec<_> = (0..60).map(|i| user(&format!("u{:02}", i), "OU=IT")).collect();
    users.push(user("zzTarget", "OU=IT"));
    let tree = HierarchyBuilder::new(options).build(&[ou("OU=IT")], &users, &[]);
    assert_eq!(tree.root.total_user_count, 61);

    let shown = apply_leaf_cap(&filter_hierarchy(&tree, "zzTarget"), options.leaf_display_cap, &NoopObserver);
    let it = shown.root.containers().next().unwrap();
    let names: Vec<_> = it.leaves().map(|l| l.display_name.as_str()).collect();
    assert_eq!(names, ["zzTarget"]);
}

#[test]
fn flattened_containers_total_their_real_subtree() {
    let mut ous = Vec::new();
    let mut path = String::new();
    for level in 1..=12 {
        path = if path.is_empty() { format!("OU=L{}", level) } else { format!("OU=L{},{}", level, path) };
        ous.push(ou(&path));
    }
    let users = vec![user("Deep", &path)];
    let tree = build_hierarchy(&ous, &users, &[]);

    for level in 9..=12 {
        let node = tree.find(&ous[level - 1].dn).unwrap();
        assert_eq!(compute_container_stats(node).total_users, 1, "L{}", level);
    }
}
