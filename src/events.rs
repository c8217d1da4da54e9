//! Structural change events and host notifications.
//!
//! Two channels leave the grid:
//! - [`StructuralEvent`]s, routed by [`Topic`] to per-listener mailboxes for
//!   listeners that subscribed (the overlay tracker is one)
//! - [`Notification`]s for the host: selection changes, virtual data
//!   requests and obsolete scroll bounds

use std::collections::{HashMap, HashSet, VecDeque};

use crate::layout::GroupId;
use crate::tree::ItemId;
use crate::types::SelectionDetail;

/// Identifies a subscriber of structural events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Which scrollbar moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollAxis {
    Horizontal,
    Vertical,
}

/// Subscription scopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Move/resize/show/hide of one column
    Column(usize),
    /// Expand/collapse of one column group
    ColumnGroup(GroupId),
    /// Grid client area resized
    Resize,
    /// Either scrollbar moved
    Scroll,
    /// Any row expanded or collapsed
    Tree,
}

/// Geometry-affecting change inside the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralEvent {
    ColumnMoved(usize),
    ColumnResized(usize),
    ColumnShown(usize),
    ColumnHidden(usize),
    GroupExpanded(GroupId),
    GroupCollapsed(GroupId),
    Resized,
    Scrolled(ScrollAxis),
    TreeExpanded(ItemId),
    TreeCollapsed(ItemId),
}

impl StructuralEvent {
    pub fn topic(&self) -> Topic {
        match *self {
            Self::ColumnMoved(c)
            | Self::ColumnResized(c)
            | Self::ColumnShown(c)
            | Self::ColumnHidden(c) => Topic::Column(c),
            Self::GroupExpanded(g) | Self::GroupCollapsed(g) => Topic::ColumnGroup(g),
            Self::Resized => Topic::Resize,
            Self::Scrolled(_) => Topic::Scroll,
            Self::TreeExpanded(_) | Self::TreeCollapsed(_) => Topic::Tree,
        }
    }
}

/// Core-to-host notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// Selection changed (at most one per expand/collapse call)
    Selection { item: ItemId, detail: SelectionDetail },
    /// Virtual mode: populate the row at `index` (sibling index for child
    /// rows, flat row index for roots)
    SetData { item: ItemId, index: usize },
    /// Cached scroll bounds must be recomputed
    ScrollBoundsObsolete,
}

/// Topic subscriptions and pending deliveries.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    subscriptions: HashMap<ListenerId, HashSet<Topic>>,
    mailboxes: HashMap<ListenerId, VecDeque<StructuralEvent>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.subscriptions.insert(id, HashSet::new());
        self.mailboxes.insert(id, VecDeque::new());
        id
    }

    /// Drop a listener, its subscriptions and undelivered events.
    pub fn unregister(&mut self, id: ListenerId) {
        self.subscriptions.remove(&id);
        self.mailboxes.remove(&id);
    }

    /// Returns false if the listener is unknown or already subscribed.
    pub fn subscribe(&mut self, id: ListenerId, topic: Topic) -> bool {
        let added = self
            .subscriptions
            .get_mut(&id)
            .is_some_and(|topics| topics.insert(topic));
        if added {
            log::debug!("{id:?} subscribed to {topic:?}");
        }
        added
    }

    /// Returns false if there was no such subscription.
    pub fn unsubscribe(&mut self, id: ListenerId, topic: Topic) -> bool {
        let removed = self
            .subscriptions
            .get_mut(&id)
            .is_some_and(|topics| topics.remove(&topic));
        if removed {
            log::debug!("{id:?} unsubscribed from {topic:?}");
        }
        removed
    }

    pub fn is_subscribed(&self, id: ListenerId, topic: Topic) -> bool {
        self.subscriptions
            .get(&id)
            .is_some_and(|topics| topics.contains(&topic))
    }

    pub fn subscription_count(&self, id: ListenerId) -> usize {
        self.subscriptions.get(&id).map_or(0, HashSet::len)
    }

    /// Queue `event` for every listener subscribed to its topic. Returns the
    /// number of deliveries.
    pub fn publish(&mut self, event: StructuralEvent) -> usize {
        let topic = event.topic();
        let mut delivered = 0;
        for (id, topics) in &self.subscriptions {
            if topics.contains(&topic) {
                if let Some(mailbox) = self.mailboxes.get_mut(id) {
                    mailbox.push_back(event);
                    delivered += 1;
                }
            }
        }
        delivered
    }

    /// Take a listener's pending events in emission order.
    pub fn drain(&mut self, id: ListenerId) -> Vec<StructuralEvent> {
        self.mailboxes
            .get_mut(&id)
            .map(|mailbox| mailbox.drain(..).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_by_topic() {
        let mut registry = ListenerRegistry::new();
        let a = registry.register();
        let b = registry.register();
        assert!(registry.subscribe(a, Topic::Column(1)));
        assert!(!registry.subscribe(a, Topic::Column(1)));
        registry.subscribe(b, Topic::Resize);

        assert_eq!(registry.publish(StructuralEvent::ColumnResized(1)), 1);
        assert_eq!(registry.publish(StructuralEvent::ColumnResized(2)), 0);
        registry.publish(StructuralEvent::Resized);
        registry.publish(StructuralEvent::ColumnMoved(1));

        assert_eq!(
            registry.drain(a),
            vec![
                StructuralEvent::ColumnResized(1),
                StructuralEvent::ColumnMoved(1)
            ]
        );
        assert_eq!(registry.drain(b), vec![StructuralEvent::Resized]);
        assert!(registry.drain(a).is_empty());
    }

    #[test]
    fn test_unsubscribe_and_unregister() {
        let mut registry = ListenerRegistry::new();
        let a = registry.register();
        registry.subscribe(a, Topic::Scroll);
        assert!(registry.unsubscribe(a, Topic::Scroll));
        assert!(!registry.unsubscribe(a, Topic::Scroll));
        assert_eq!(
            registry.publish(StructuralEvent::Scrolled(ScrollAxis::Vertical)),
            0
        );

        registry.subscribe(a, Topic::Tree);
        registry.unregister(a);
        assert!(!registry.subscribe(a, Topic::Tree));
        assert_eq!(registry.subscription_count(a), 0);
        assert!(registry.drain(a).is_empty());
    }
}
