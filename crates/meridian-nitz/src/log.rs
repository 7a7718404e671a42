//! Bounded in-memory log for detection decisions
//!
//! NITZ signals can arrive every few minutes; an unbounded log would drown
//! the interesting entries. Each detection domain keeps a small ring of the
//! most recent decisions for state dumps.

use std::collections::VecDeque;
use std::fmt;

const DEFAULT_CAPACITY: usize = 30;

/// Fixed-capacity ring of human-readable log entries, newest last.
#[derive(Debug)]
pub struct DetectionLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl DetectionLog {
    pub fn new(capacity: usize) -> Self {
        DetectionLog {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn log(&mut self, entry: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn dump(&self, w: &mut dyn fmt::Write) -> fmt::Result {
        for entry in &self.entries {
            writeln!(w, "  {entry}")?;
        }
        Ok(())
    }
}

impl Default for DetectionLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_drops_oldest() {
        let mut log = DetectionLog::new(3);
        for i in 0..5 {
            log.log(format!("entry {i}"));
        }
        assert_eq!(log.len(), 3);
        let entries: Vec<&str> = log.iter().collect();
        assert_eq!(entries, vec!["entry 2", "entry 3", "entry 4"]);
    }

    #[test]
    fn test_dump_format() {
        let mut log = DetectionLog::default();
        log.log("zone set");
        let mut out = String::new();
        log.dump(&mut out).unwrap();
        assert_eq!(out, "  zone set\n");
    }
}
