//! Menus
//!
//! Hierarchical navigation entries: a forest of parent-referencing nodes
//! with unique slugs, sibling ordering, and guarded reparenting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::slug;

pub mod tree;

pub use tree::{MenuTreeNode, build_tree};

new_key_type! {
    /// Menu Key
    pub struct MenuKey;
}

/// Errors from menu operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    /// The referenced menu node does not exist.
    #[error("menu node not found")]
    NotFound,

    /// The proposed parent does not exist.
    #[error("parent menu node not found")]
    ParentNotFound,

    /// Another node already carries the slug.
    #[error("menu with slug {0:?} already exists")]
    SlugConflict(String),

    /// An explicitly supplied slug is malformed.
    #[error("invalid slug format: {0:?}")]
    InvalidSlug(String),

    /// A node cannot be its own parent.
    #[error("menu node cannot be its own parent")]
    SelfParent,

    /// The proposed parent is a descendant of the node.
    #[error("reparenting would create a cycle in the menu hierarchy")]
    CyclicReference,

    /// The node still has children and cannot be deleted.
    #[error("cannot delete a menu node with children; delete or move them first")]
    HasChildren,
}

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    /// Display name
    pub name: String,

    /// URL-safe identifier, unique across the store
    pub slug: String,

    /// Parent node; `None` for roots
    pub parent: Option<MenuKey>,

    /// Sibling sort key
    pub order: i32,

    /// Whether the entry is shown on the storefront
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

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Input for [`MenuStore::create`].
#[derive(Debug, Clone)]
pub struct NewMenuNode {
    /// Display name
    pub name: String,

    /// Explicit slug; generated from the name when absent
    pub slug: Option<String>,

    /// Parent node
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

    /// Entry kind label
    pub kind: String,

    /// Whether the link opens in a new tab
    pub is_new_tab: bool,
}

impl NewMenuNode {
    /// A minimal active link entry with the given name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            slug: None,
            parent: None,
            order: 0,
            is_active: true,
            url: None,
            icon: None,
            description: None,
            kind: "link".to_owned(),
            is_new_tab: false,
        }
    }
}

/// Partial patch for [`MenuStore::update`]. `None` fields are left as-is;
/// `parent` uses a nested `Option` so that `Some(None)` clears the parent.
#[derive(Debug, Clone, Default)]
pub struct MenuUpdate {
    /// New display name
    pub name: Option<String>,

    /// New slug
    pub slug: Option<String>,

    /// New parent (`Some(None)` detaches the node to a root)
    pub parent: Option<Option<MenuKey>>,

    /// New sibling sort key
    pub order: Option<i32>,

    /// New active flag
    pub is_active: Option<bool>,

    /// New link target
    pub url: Option<Option<String>>,

    /// New icon
    pub icon: Option<Option<String>>,

    /// New description
    pub description: Option<Option<String>>,

    /// New kind label
    pub kind: Option<String>,

    /// New new-tab flag
    pub is_new_tab: Option<bool>,
}

/// In-memory menu store.
#[derive(Debug, Default)]
pub struct MenuStore {
    nodes: SlotMap<MenuKey, MenuNode>,
}

impl MenuStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node.
    ///
    /// An explicit slug must be well-formed and free; a slug generated from
    /// the name is disambiguated with a numeric suffix instead.
    ///
    /// # Errors
    ///
    /// - [`MenuError::InvalidSlug`]: explicit slug is malformed.
    /// - [`MenuError::SlugConflict`]: explicit slug is already taken.
    /// - [`MenuError::ParentNotFound`]: the parent key does not resolve.
    pub fn create(&mut self, new: NewMenuNode) -> Result<MenuKey, MenuError> {
        let slug = match new.slug {
            Some(explicit) => {
                if !slug::is_valid(&explicit) {
                    return Err(MenuError::InvalidSlug(explicit));
                }
                if self.slug_taken(&explicit) {
                    return Err(MenuError::SlugConflict(explicit));
                }
                explicit
            }
            None => {
                let base = slug::generate(&new.name);
                if !slug::is_valid(&base) {
                    return Err(MenuError::InvalidSlug(base));
                }
                slug::disambiguate(&base, |candidate| self.slug_taken(candidate))
            }
        };

        if let Some(parent) = new.parent {
            if !self.nodes.contains_key(parent) {
                return Err(MenuError::ParentNotFound);
            }
        }

        let now = Utc::now();
        Ok(self.nodes.insert(MenuNode {
            name: new.name,
            slug,
            parent: new.parent,
            order: new.order,
            is_active: new.is_active,
            url: new.url,
            icon: new.icon,
            description: new.description,
            kind: new.kind,
            is_new_tab: new.is_new_tab,
            created_at: now,
            updated_at: now,
        }))
    }

    /// Fetch a node by key.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::NotFound`] if the key does not resolve.
    pub fn get(&self, key: MenuKey) -> Result<&MenuNode, MenuError> {
        self.nodes.get(key).ok_or(MenuError::NotFound)
    }

    /// Fetch a node by slug.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::NotFound`] if no node carries the slug.
    pub fn find_by_slug(&self, slug: &str) -> Result<(MenuKey, &MenuNode), MenuError> {
        self.nodes
            .iter()
            .find(|(_, node)| node.slug == slug)
            .ok_or(MenuError::NotFound)
    }

    /// Apply a partial update.
    ///
    /// Renaming without an explicit slug regenerates the slug from the new
    /// name, but only adopts it when it is free; otherwise the old slug is
    /// kept. Reparenting is guarded against self-parenting and cycles.
    ///
    /// # Errors
    ///
    /// - [`MenuError::NotFound`]: the node does not exist.
    /// - [`MenuError::SlugConflict`] / [`MenuError::InvalidSlug`]: explicit
    ///   slug problems.
    /// - [`MenuError::SelfParent`]: proposed parent is the node itself.
    /// - [`MenuError::CyclicReference`]: proposed parent is a descendant.
    /// - [`MenuError::ParentNotFound`]: proposed parent does not resolve.
    pub fn update(&mut self, key: MenuKey, patch: MenuUpdate) -> Result<&MenuNode, MenuError> {
        let current = self.nodes.get(key).ok_or(MenuError::NotFound)?;
        let current_slug = current.slug.clone();

        let mut new_slug: Option<String> = None;
        if let Some(explicit) = patch.slug {
            if explicit != current_slug {
                if !slug::is_valid(&explicit) {
                    return Err(MenuError::InvalidSlug(explicit));
                }
                if self.slug_taken(&explicit) {
                    return Err(MenuError::SlugConflict(explicit));
                }
                new_slug = Some(explicit);
            }
        } else if let Some(name) = &patch.name {
            let regenerated = slug::generate(name);
            if regenerated != current_slug
                && !self.slug_taken(&regenerated)
                && slug::is_valid(&regenerated)
            {
                new_slug = Some(regenerated);
            }
        }

        if let Some(Some(parent)) = patch.parent {
            if parent == key {
                return Err(MenuError::SelfParent);
            }
            if self.would_create_cycle(key, parent) {
                return Err(MenuError::CyclicReference);
            }
            if !self.nodes.contains_key(parent) {
                return Err(MenuError::ParentNotFound);
            }
        }

        let node = self.nodes.get_mut(key).ok_or(MenuError::NotFound)?;
        if let Some(name) = patch.name {
            node.name = name;
        }
        if let Some(slug) = new_slug {
            node.slug = slug;
        }
        if let Some(parent) = patch.parent {
            node.parent = parent;
        }
        if let Some(order) = patch.order {
            node.order = order;
        }
        if let Some(is_active) = patch.is_active {
            node.is_active = is_active;
        }
        if let Some(url) = patch.url {
            node.url = url;
        }
        if let Some(icon) = patch.icon {
            node.icon = icon;
        }
        if let Some(description) = patch.description {
            node.description = description;
        }
        if let Some(kind) = patch.kind {
            node.kind = kind;
        }
        if let Some(is_new_tab) = patch.is_new_tab {
            node.is_new_tab = is_new_tab;
        }
        node.updated_at = Utc::now();

        Ok(node)
    }

    /// Delete a node. This is a precondition check, not a cascade: children
    /// must be deleted or reassigned first.
    ///
    /// # Errors
    ///
    /// - [`MenuError::NotFound`]: the node does not exist.
    /// - [`MenuError::HasChildren`]: another node references it as parent.
    pub fn remove(&mut self, key: MenuKey) -> Result<MenuNode, MenuError> {
        if !self.nodes.contains_key(key) {
            return Err(MenuError::NotFound);
        }
        if self.nodes.values().any(|node| node.parent == Some(key)) {
            return Err(MenuError::HasChildren);
        }
        self.nodes.remove(key).ok_or(MenuError::NotFound)
    }

    /// All nodes sorted by (order, creation time). Inactive nodes are
    /// filtered out unless requested.
    pub fn all(&self, include_inactive: bool) -> Vec<(MenuKey, &MenuNode)> {
        let mut nodes: Vec<(MenuKey, &MenuNode)> = self
            .nodes
            .iter()
            .filter(|(_, node)| include_inactive || node.is_active)
            .collect();
        nodes.sort_by(|(_, a), (_, b)| a.order.cmp(&b.order).then(a.created_at.cmp(&b.created_at)));
        nodes
    }

    /// Assemble the navigation forest (see [`tree::build_tree`]).
    pub fn tree(&self, include_inactive: bool) -> Vec<MenuTreeNode> {
        build_tree(&self.all(include_inactive))
    }

    /// Walk the proposed parent chain upward; reaching `node` means the
    /// reparenting would close a cycle. The walk is bounded by the store
    /// size so it terminates even on a corrupted parent graph, which is
    /// then reported as cyclic.
    pub fn would_create_cycle(&self, node: MenuKey, proposed_parent: MenuKey) -> bool {
        let mut current = Some(proposed_parent);

        for _ in 0..=self.nodes.len() {
            match current {
                None => return false,
                Some(ancestor) if ancestor == node => return true,
                Some(ancestor) => {
                    current = self.nodes.get(ancestor).and_then(|n| n.parent);
                }
            }
        }

        true
    }

    /// Number of nodes in the store.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn slug_taken(&self, candidate: &str) -> bool {
        self.nodes.values().any(|node| node.slug == candidate)
    }
}
