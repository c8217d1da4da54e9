//! Lazy population of virtual rows.
//!
//! In virtual mode a row starts unmaterialized. The first read of any of its
//! cell content asks the host for data once, identified by the row's
//! position: its index among siblings when it has a parent, else its flat
//! row index. Clearing the row re-arms the request. Writes never trigger it.

use std::fmt;

use crate::error::Result;
use crate::events::Notification;
use crate::provider::CellDataProvider;
use crate::tree::{ItemId, ItemTree};

/// Host callback that fills a row's cells when it is first read.
pub trait Materializer {
    fn materialize(&mut self, item: ItemId, index: usize, data: &mut dyn CellDataProvider);
}

impl<F> Materializer for F
where
    F: FnMut(ItemId, usize, &mut dyn CellDataProvider),
{
    fn materialize(&mut self, item: ItemId, index: usize, data: &mut dyn CellDataProvider) {
        self(item, index, data);
    }
}

/// Virtual mode switch plus the optional host callback.
#[derive(Default)]
pub struct VirtualDataBridge {
    enabled: bool,
    materializer: Option<Box<dyn Materializer>>,
    requests: usize,
}

impl fmt::Debug for VirtualDataBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualDataBridge")
            .field("enabled", &self.enabled)
            .field("materializer", &self.materializer.is_some())
            .field("requests", &self.requests)
            .finish()
    }
}

impl VirtualDataBridge {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_materializer(&mut self, materializer: Option<Box<dyn Materializer>>) {
        self.materializer = materializer;
    }

    /// Number of materialization requests issued so far
    pub fn request_count(&self) -> usize {
        self.requests
    }

    /// Request data for `item` if it has not been materialized yet.
    ///
    /// Queues a [`Notification::SetData`] and runs the materializer, if any,
    /// synchronously. Returns whether a request was issued.
    pub fn ensure_materialized(
        &mut self,
        tree: &mut ItemTree,
        item: ItemId,
        data: &mut dyn CellDataProvider,
        notifications: &mut Vec<Notification>,
    ) -> Result<bool> {
        if !self.enabled || tree.is_materialized(item)? {
            return Ok(false);
        }
        tree.set_materialized(item, true)?;
        let index = match tree.parent(item)? {
            Some(_) => tree.sibling_index(item)?,
            None => tree.row_index(item)?,
        };
        self.requests += 1;
        log::debug!("materializing {item} at index {index}");
        notifications.push(Notification::SetData { item, index });
        if let Some(materializer) = self.materializer.as_mut() {
            materializer.materialize(item, index, data);
        }
        Ok(true)
    }

    /// Re-arm `item` (and its descendants when `recursive`).
    pub fn reset(&self, tree: &mut ItemTree, item: ItemId, recursive: bool) -> Result<()> {
        tree.set_materialized(item, false)?;
        if recursive {
            for child in tree.descendants(item) {
                tree.set_materialized(child, false)?;
            }
        }
        Ok(())
    }

    /// Re-arm every row, e.g. after a column was added.
    pub fn reset_all(&self, tree: &mut ItemTree) {
        let rows: Vec<ItemId> = tree.rows().collect();
        for row in rows {
            // Rows come from the tree itself; a failure here means it was
            // already gone.
            if tree.set_materialized(row, false).is_err() {
                log::warn!("row {row} vanished while re-arming virtual data");
            }
        }
    }
}
