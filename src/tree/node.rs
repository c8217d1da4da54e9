//! A single row of the hierarchy.

use std::fmt;

use crate::types::{Identifiable, RowDefaults, RowHeader};

/// Generational handle to an item stored in an [`ItemTree`](super::ItemTree).
///
/// A handle outlives its item: once the item is disposed, lookups with the
/// old handle fail with `DisposedAccess` even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId {
    pub(crate) slot: usize,
    pub(crate) generation: u32,
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}v{}", self.slot, self.generation)
    }
}

/// Row state owned by the tree arena.
///
/// Parent and children are stored as handles, never as owning links.
#[derive(Debug, Clone)]
pub struct ItemNode {
    pub(crate) id: ItemId,
    /// Depth in the hierarchy (0 = root)
    pub(crate) level: usize,
    pub(crate) parent: Option<ItemId>,
    pub(crate) children: Vec<ItemId>,
    pub(crate) expanded: bool,
    pub(crate) visible: bool,
    /// Row height in pixels, always >= 1
    pub(crate) height: i32,
    /// Virtual mode: data for this row has been requested from the host
    pub(crate) materialized: bool,
    pub(crate) defaults: RowDefaults,
    pub(crate) header: RowHeader,
}

impl ItemNode {
    pub(crate) fn new(id: ItemId, parent: Option<ItemId>, level: usize, height: i32) -> Self {
        Self {
            id,
            level,
            parent,
            children: Vec::new(),
            expanded: false,
            visible: true,
            height,
            materialized: false,
            defaults: RowDefaults::default(),
            header: RowHeader::default(),
        }
    }

    /// Depth in the hierarchy (0 = root)
    pub fn level(&self) -> usize {
        self.level
    }

    /// Parent handle, `None` for roots
    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    /// Child handles in display order
    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Current visible flag
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Row height in pixels
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_materialized(&self) -> bool {
        self.materialized
    }

    pub fn defaults(&self) -> &RowDefaults {
        &self.defaults
    }

    pub fn header(&self) -> &RowHeader {
        &self.header
    }
}

impl Identifiable for ItemNode {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}
