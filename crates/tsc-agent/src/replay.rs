//! Experience replay: a bounded FIFO of transitions with uniform sampling.

use std::collections::VecDeque;

use tsc_core::SimRng;

/// One unit of experience.  Immutable once recorded.
#[derive(Clone, Debug)]
pub struct Transition {
    pub state: Vec<f32>,
    pub action: u8,
    pub reward: f32,
    pub next_state: Vec<f32>,
    pub done: bool,
}

/// Bounded FIFO transition store.
///
/// Owned exclusively by the agent: one writer (`push`), one reader at a time
/// (`sample`).  On overflow the oldest transition is evicted.
pub struct ReplayBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a transition, evicting the oldest when full.
    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// The oldest stored transition (next eviction victim).
    pub fn oldest(&self) -> Option<&Transition> {
        self.buffer.front()
    }

    /// Uniform sample of `count` *distinct* transitions.  When fewer are
    /// stored, returns everything.
    ///
    /// Partial Fisher–Yates over an index vector: O(len) setup, O(count)
    /// draws, no replacement by construction.
    pub fn sample(&self, count: usize, rng: &mut SimRng) -> Vec<&Transition> {
        let len = self.buffer.len();
        let count = count.min(len);
        let mut indices: Vec<usize> = (0..len).collect();
        for i in 0..count {
            let j = rng.gen_range(i..len);
            indices.swap(i, j);
        }
        indices[..count].iter().map(|&i| &self.buffer[i]).collect()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
