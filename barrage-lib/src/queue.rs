//! FIFO buffer of items awaiting a lane.

use std::collections::VecDeque;

use log::debug;

use crate::options::OverflowPolicy;

/// Content payload for one overlay item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarrageItem {
    pub text: String,
    /// Optional avatar/image reference rendered ahead of the text.
    pub image: Option<String>,
}

impl BarrageItem {
    /// Create a plain text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }
}

/// Strictly FIFO pending-item buffer.
///
/// Items wait here from enqueue until the dispatch loop releases them; an
/// item leaves the queue the instant it is dispatched. An optional bound
/// caps the backlog (`max_len == 0` disables the bound, keeping the
/// unbounded behavior).
#[derive(Debug)]
pub struct PendingQueue {
    items: VecDeque<BarrageItem>,
    max_len: usize,
    overflow: OverflowPolicy,
}

impl PendingQueue {
    pub fn new(max_len: usize, overflow: OverflowPolicy) -> Self {
        Self {
            items: VecDeque::new(),
            max_len,
            overflow,
        }
    }

    /// Append to the tail, applying the overflow policy at the bound.
    pub fn enqueue(&mut self, item: BarrageItem) {
        if self.max_len > 0 && self.items.len() >= self.max_len {
            match self.overflow {
                OverflowPolicy::DropOldest => {
                    self.items.pop_front();
                    debug!("queue full; dropped oldest pending item");
                }
                OverflowPolicy::DropNewest => {
                    debug!("queue full; dropped incoming item");
                    return;
                }
            }
        }
        self.items.push_back(item);
    }

    /// Remove and return the head, or `None` when empty. Emptiness is a
    /// normal condition, not an error.
    pub fn dequeue_one(&mut self) -> Option<BarrageItem> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
