use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A non-preemptive job.
///
/// Equality and hashing use only `id`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Job {
    /// Identity of the job.
    pub id: u32,
    /// Position of the job in the instance job array.
    pub index: usize,
    /// Machine the job is dedicated to.
    pub machine_idx: i64,
    /// Processing time in absolute time units.
    pub processing_time: i64,
}

impl Job {
    /// Creates a job.
    pub fn new(id: u32, index: usize, machine_idx: i64, processing_time: i64) -> Self {
        Self {
            id,
            index,
            machine_idx,
            processing_time,
        }
    }
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Job {}

impl Hash for Job {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job {} (p={})", self.id, self.processing_time)
    }
}
