//! Re-entrancy guard for nested height and draw queries
//!
//! Computing one node can synchronously trigger computation of the same node
//! again (a picker opened mid-draw re-queries the height of the field that owns
//! it). Strict LIFO detection is not enough because the host can interleave an
//! ancestor query before a descendant unwinds, so the guard set tracks both the
//! node and its parent.

use std::cell::RefCell;
use std::collections::HashSet;

use log::debug;

use crate::model::NodePath;

thread_local! {
    /// Paths currently mid-computation on this UI thread.
    static ACTIVE_PATHS: RefCell<HashSet<NodePath>> = RefCell::new(HashSet::new());
}

/// Result of entering a height computation
pub enum LayoutEntry {
    /// First entry; the token releases the guard when dropped
    Entered(GuardToken),
    /// Known re-entry; the caller must return a cached height
    Reentered,
}

/// Removes the paths it inserted when dropped, on every exit path
#[must_use]
pub struct GuardToken {
    inserted: Vec<NodePath>,
}

impl Drop for GuardToken {
    fn drop(&mut self) {
        ACTIVE_PATHS.with(|active| {
            let mut active = active.borrow_mut();
            for path in &self.inserted {
                active.remove(path);
            }
        });
    }
}

/// Enter a height computation for `path`
pub fn enter_layout(path: &NodePath) -> LayoutEntry {
    ACTIVE_PATHS.with(|active| {
        let mut active = active.borrow_mut();
        let parent = path.parent();

        if active.contains(path) {
            // The root has no parent; treat it as always present.
            let parent_active = parent.as_ref().map_or(true, |parent| active.contains(parent));
            active.clear();
            if parent_active {
                debug!("Re-entrant layout of `{}`, using cached height", path);
                return LayoutEntry::Reentered;
            }
            debug!("Stale guard entry for `{}`, cleared", path);
        }

        let mut inserted = Vec::with_capacity(2);
        if let Some(parent) = parent {
            if active.insert(parent.clone()) {
                inserted.push(parent);
            }
        }
        active.insert(path.clone());
        inserted.push(path.clone());

        LayoutEntry::Entered(GuardToken { inserted })
    })
}

/// Enter a draw for `path`; `None` when the path is already being drawn
pub fn enter_draw(path: &NodePath) -> Option<GuardToken> {
    ACTIVE_PATHS.with(|active| {
        let mut active = active.borrow_mut();
        if active.insert(path.clone()) {
            Some(GuardToken {
                inserted: vec![path.clone()],
            })
        } else {
            None
        }
    })
}

#[cfg(test)]
pub(crate) fn is_active(path: &NodePath) -> bool {
    ACTIVE_PATHS.with(|active| active.borrow().contains(path))
}

/// Number of guarded paths on this thread
#[cfg(test)]
pub(crate) fn active_count() -> usize {
    ACTIVE_PATHS.with(|active| active.borrow().len())
}

/// Drop every guard entry on this thread
#[cfg(test)]
pub(crate) fn reset() {
    ACTIVE_PATHS.with(|active| active.borrow_mut().clear());
}
