use std::collections::{vec_deque, VecDeque};

use super::metrics::Sample;
use crate::error::{GtopError, Result};

/// Fixed-capacity sliding window of samples, oldest first
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    capacity: usize,
    samples: VecDeque<Sample>,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::new(),
        }
    }

    /// Append a sample, evicting from the front until the buffer fits its capacity
    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn first(&self) -> Result<&Sample> {
        self.samples.front().ok_or(GtopError::EmptyBuffer)
    }

    pub fn last(&self) -> Result<&Sample> {
        self.samples.back().ok_or(GtopError::EmptyBuffer)
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    /// Timestamps of the retained samples, oldest first
    pub fn timestamps(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }
}

impl<'a> IntoIterator for &'a HistoryBuffer {
    type Item = &'a Sample;
    type IntoIter = vec_deque::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
