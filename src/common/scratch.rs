use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

/// The pair of temporary files owned by one job.
///
/// Names come from a fresh UUID, so concurrent jobs sharing the same
/// directory never touch each other's files. Both paths are removed when the
/// workspace is dropped, whichever way the job ends (success, error, panic,
/// or the request future being dropped). Removal is best effort: a file that
/// was never created, or cannot be deleted, is ignored.
#[derive(Debug)]
pub struct JobWorkspace {
    id: Uuid,
    input: PathBuf,
    output: PathBuf,
}

impl JobWorkspace {
    pub fn new(dir: &Path) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            input: dir.join(format!("{}_input", id.simple())),
            output: dir.join(format!("{}_output.mp4", id.simple())),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Consumes the workspace, deleting both artifacts.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for JobWorkspace {
    fn drop(&mut self) {
        for path in [&self.input, &self.output] {
            if let Err(e) = fs::remove_file(path) {
                debug!("cleanup skipped {}: {}", path.display(), e);
            }
        }
    }
}
