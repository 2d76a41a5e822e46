//! Menu tree building
//!
//! Converts the flat, parent-referencing node list into a nested forest.

use rustc_hash::FxHashMap;
use serde::Serialize;

use super::{MenuKey, MenuNode};

/// One node of the assembled navigation tree.
#[derive(Debug, Clone, Serialize)]
pub struct MenuTreeNode {
    /// Store key of the underlying node
    pub key: MenuKey,

    /// Display name
    pub name: String,

    /// URL-safe identifier
    pub slug: String,

    /// Parent key, `None` for roots
    pub parent: Option<MenuKey>,

    /// Sibling sort key
    pub order: i32,

    /// Whether the entry is shown
    pub is_active: bool,

    /// Link target
    pub url: Option<String>,

    /// Icon identifier
    pub icon: Option<String>,

    /// Free-form description
    pub description: Option<String>,

    /// Entry kind label (link, dropdown, …)
    pub kind: String,

    /// Whether the link opens in a new tab
    pub is_new_tab: bool,

    /// Child entries, sorted by `order`
    pub children: Vec<MenuTreeNode>,
}

/// Build a forest from a flat node list already sorted by (order, creation
/// time).
///
/// A node whose parent is not in the input is treated as a root. Nodes on a
/// corrupted parent cycle are unreachable from any root and are simply
/// omitted.
pub fn build_tree(nodes: &[(MenuKey, &MenuNode)]) -> Vec<MenuTreeNode> {
    let by_key: FxHashMap<MenuKey, &MenuNode> = nodes.iter().copied().collect();

    let mut children: FxHashMap<MenuKey, Vec<MenuKey>> = FxHashMap::default();
    let mut roots: Vec<MenuKey> = Vec::new();

    for &(key, node) in nodes {
        match node.parent.filter(|parent| by_key.contains_key(parent)) {
            Some(parent) => children.entry(parent).or_default().push(key),
            None => roots.push(key),
        }
    }

    let mut tree: Vec<MenuTreeNode> = roots
        .into_iter()
        .filter_map(|key| assemble(key, &by_key, &children))
        .collect();
    tree.sort_by_key(|node| node.order);

    tree
}

fn assemble(
    key: MenuKey,
    by_key: &FxHashMap<MenuKey, &MenuNode>,
    children: &FxHashMap<MenuKey, Vec<MenuKey>>,
) -> Option<MenuTreeNode> {
    let node = by_key.get(&key)?;

    let mut kids: Vec<MenuTreeNode> = children
        .get(&key)
        .into_iter()
        .flatten()
        .filter_map(|&child| assemble(child, by_key, children))
        .collect();
    kids.sort_by_key(|child| child.order);

    Some(MenuTreeNode {
        key,
        name: node.name.clone(),
        slug: node.slug.clone(),
        parent: node.parent,
        order: node.order,
        is_active: node.is_active,
        url: node.url.clone(),
        icon: node.icon.clone(),
        description: node.description.clone(),
        kind: node.kind.clone(),
        is_new_tab: node.is_new_tab,
        children: kids,
    })
}
