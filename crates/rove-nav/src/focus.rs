//! Roving tab index bookkeeping.
//!
//! Exactly one element inside a container sits in the natural tab order.
//! Before any candidate has been focused that element is the container
//! itself.  Once focus moves inside, the container lends its tab index to
//! the focused candidate and every other candidate stays at `-1`, so Tab
//! and Shift-Tab skip past the whole group.  When focus leaves the group the
//! container takes its tab index back.

use rove_core::dom::{Document, NodeId};

/// State of the roving tab stop for one container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RovingFocus {
    focused_child: Option<NodeId>,
    saved_tab_index: Option<i32>,
    /// Lent the tab stop by a focus request that has not been confirmed yet.
    pending: Option<NodeId>,
}

impl RovingFocus {
    pub fn new() -> Self {
        Self::default()
    }

    /// The candidate that last reported focus, if any.
    pub fn focused_child(&self) -> Option<NodeId> {
        self.focused_child
    }

    /// The container's own tab index, held while a candidate owns the tab stop.
    pub fn saved_tab_index(&self) -> Option<i32> {
        self.saved_tab_index
    }

    /// The tab index a candidate receives when it takes the tab stop.
    pub fn lent_tab_index(&self, doc: &Document, container: NodeId) -> i32 {
        self.saved_tab_index
            .unwrap_or_else(|| doc.tab_index(container))
    }

    /// Give `child` the tab stop ahead of a focus request on it.
    ///
    /// A child still waiting from an earlier request is demoted first, so an
    /// unconfirmed request never leaves a second tab stop behind.
    pub fn lend(&mut self, doc: &mut Document, container: NodeId, child: NodeId) -> i32 {
        if let Some(waiting) = self.pending.take() {
            if waiting != child && Some(waiting) != self.focused_child {
                demote(doc, waiting);
            }
        }
        let lent = self.lent_tab_index(doc, container);
        doc.set_tab_index(child, lent);
        if self.focused_child != Some(child) {
            self.pending = Some(child);
        }
        lent
    }

    /// The focus request for `child` was refused.
    pub fn withdraw(&mut self, child: NodeId) {
        if self.pending == Some(child) {
            self.pending = None;
        }
    }

    /// The container itself received focus.
    ///
    /// Returns `true` when the caller should forward focus to the first
    /// candidate.  A container that already has a focused child ignores the
    /// notification.
    pub fn on_container_focus(&mut self, doc: &mut Document, container: NodeId) -> bool {
        if self.focused_child.is_some() {
            return false;
        }
        self.relinquish(doc, container);
        true
    }

    /// `child` received focus. Returns `false` when it already owned it.
    pub fn on_child_focus(
        &mut self,
        doc: &mut Document,
        container: NodeId,
        child: NodeId,
    ) -> bool {
        if self.focused_child == Some(child) {
            return false;
        }
        if let Some(previous) = self.focused_child {
            demote(doc, previous);
        }
        if let Some(waiting) = self.pending.take() {
            if waiting != child {
                demote(doc, waiting);
            }
        }
        self.relinquish(doc, container);
        let lent = self.lent_tab_index(doc, container);
        doc.set_tab_index(child, lent);
        self.focused_child = Some(child);
        true
    }

    /// Focus left the container and everything it owns.
    pub fn on_blur(&mut self, doc: &mut Document, container: NodeId) {
        if let Some(saved) = self.saved_tab_index.take() {
            doc.set_tab_index(container, saved);
        }
        let owned = [self.focused_child.take(), self.pending.take()];
        for node in owned.into_iter().flatten() {
            demote(doc, node);
        }
    }

    fn relinquish(&mut self, doc: &mut Document, container: NodeId) {
        if self.saved_tab_index.is_none() {
            self.saved_tab_index = Some(doc.tab_index(container));
            doc.remove_attribute(container, "tabindex");
        }
    }
}

fn demote(doc: &mut Document, node: NodeId) {
    if !doc.is_destroyed(node) {
        doc.set_tab_index(node, -1);
    }
}

/// Nodes strictly inside `root` that are in the tab order.
pub fn tab_stops(doc: &Document, root: NodeId) -> Vec<NodeId> {
    doc.descendants(root)
        .into_iter()
        .filter(|&n| doc.tab_index(n) >= 0)
        .collect()
}
