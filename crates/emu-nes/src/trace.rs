//! Bounded execution trace, newest entry first.

use std::collections::VecDeque;

use mos_6502::Step;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    entries: VecDeque<Step>,
    depth: usize,
}

impl Trace {
    #[must_use]
    pub fn new(depth: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(depth),
            depth,
        }
    }

    pub fn record(&mut self, step: Step) {
        if self.depth == 0 {
            return;
        }
        if self.entries.len() == self.depth {
            self.entries.pop_back();
        }
        self.entries.push_front(step);
    }

    /// Entries, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.entries.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Step> {
        self.entries.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}
