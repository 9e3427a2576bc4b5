//! Scan tasks and the candidates collected for them.

use std::cmp::Ordering;
use std::path::PathBuf;
use std::time::SystemTime;

use super::identifier::TaskKey;

/// A file discovered during the scan whose name matches a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Full path of the matching file.
    pub path: PathBuf,
    /// Modification time reported by the filesystem.
    pub modified: SystemTime,
}

impl Candidate {
    // Newer wins; equal timestamps prefer the lexicographically smaller path.
    fn preference(&self, other: &Self) -> Ordering {
        self.modified
            .cmp(&other.modified)
            .then_with(|| other.path.cmp(&self.path))
    }
}

/// One accepted input plus the candidates found for it.
#[derive(Debug, Clone)]
pub struct Task {
    /// What the task is looking for.
    pub key: TaskKey,
    /// 1-based input line of the first occurrence.
    pub line: usize,
    candidates: Vec<Candidate>,
}

impl Task {
    /// Create a task with no candidates.
    #[must_use]
    pub const fn new(key: TaskKey, line: usize) -> Self {
        Self {
            key,
            line,
            candidates: Vec::new(),
        }
    }

    /// Record a candidate; a path already recorded (overlapping source roots) is ignored.
    pub fn push_candidate(&mut self, candidate: Candidate) {
        if self
            .candidates
            .iter()
            .all(|existing| existing.path != candidate.path)
        {
            self.candidates.push(candidate);
        }
    }

    /// All candidates in discovery order.
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// The candidate to copy: the newest, ties broken by the smallest path.
    #[must_use]
    pub fn best_candidate(&self) -> Option<&Candidate> {
        self.candidates.iter().max_by(|a, b| a.preference(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::identifier::Identifier;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn candidate(path: &str, secs: u64) -> Candidate {
        Candidate {
            path: PathBuf::from(path),
            modified: at(secs),
        }
    }

    fn well_task() -> Task {
        let key = Identifier::parse("040192017100").map_or_else(
            || TaskKey::Name("fallback".to_string()),
            TaskKey::Well,
        );
        Task::new(key, 1)
    }

    #[test]
    fn best_candidate_is_newest() {
        let mut task = well_task();
        assert!(task.best_candidate().is_none());
        task.push_candidate(candidate("/b/0401920171_00.pdf", 10));
        task.push_candidate(candidate("/a/0401920171.pdf", 30));
        task.push_candidate(candidate("/c/0401920171.pdf", 20));

        let best = task.best_candidate().map(|c| c.path.clone());
        assert_eq!(best, Some(PathBuf::from("/a/0401920171.pdf")));
        let chosen = task.best_candidate().map(|c| c.modified);
        for other in task.candidates() {
            assert!(chosen >= Some(other.modified));
        }
    }

    #[test]
    fn ties_prefer_smallest_path_regardless_of_order() {
        let forward = {
            let mut task = well_task();
            task.push_candidate(candidate("/z/0401920171.pdf", 50));
            task.push_candidate(candidate("/a/0401920171.pdf", 50));
            task.best_candidate().map(|c| c.path.clone())
        };
        let reverse = {
            let mut task = well_task();
            task.push_candidate(candidate("/a/0401920171.pdf", 50));
            task.push_candidate(candidate("/z/0401920171.pdf", 50));
            task.best_candidate().map(|c| c.path.clone())
        };
        assert_eq!(forward, Some(PathBuf::from("/a/0401920171.pdf")));
        assert_eq!(forward, reverse);
    }

    #[test]
    fn duplicate_paths_are_recorded_once() {
        let mut task = well_task();
        task.push_candidate(candidate("/a/0401920171.pdf", 1));
        task.push_candidate(candidate("/a/0401920171.pdf", 1));
        assert_eq!(task.candidates().len(), 1);
    }
}
