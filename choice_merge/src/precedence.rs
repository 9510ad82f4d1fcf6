//! Rules for folding one choice block's cancel/default settings into the menu
//! accumulated so far.
//!
//! `offset` is always the number of options gathered before the incoming block, so a
//! concrete index adopted from that block is moved into the unified option space.

use choice_data::{CancelSelector, DefaultSelector};

/// Resolve the cancel behavior of a merged menu.
///
/// A branch setting anywhere wins outright. Otherwise the first block that allows
/// cancelling decides, and blocks set to disallow defer to the others.
pub fn resolve_cancel(accumulated: CancelSelector, incoming: CancelSelector, offset: usize) -> CancelSelector {
    match (accumulated, incoming) {
        (CancelSelector::Branch, _) | (_, CancelSelector::Branch) => CancelSelector::Branch,
        (acc, CancelSelector::Disallow) => acc,
        (CancelSelector::Disallow, inc) => inc.shifted(offset),
        (acc, _) => acc,
    }
}

/// Resolve the pre-selected option of a merged menu: the first block with one set wins.
pub fn resolve_default(accumulated: DefaultSelector, incoming: DefaultSelector, offset: usize) -> DefaultSelector {
    match accumulated {
        DefaultSelector::None => incoming.shifted(offset),
        DefaultSelector::Choice(_) => accumulated,
    }
}
