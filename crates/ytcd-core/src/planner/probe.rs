//! Artifact presence checks used by the planner.

use std::path::Path;

/// Decides whether a destination already holds a complete artifact.
pub trait ArtifactProbe {
    fn is_complete(&self, path: &Path) -> bool;
}

/// Filesystem probe: the destination exists, is a regular file and is
/// non-empty. Content is not verified.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsArtifactProbe;

impl ArtifactProbe for FsArtifactProbe {
    fn is_complete(&self, path: &Path) -> bool {
        match std::fs::metadata(path) {
            Ok(m) => m.is_file() && m.len() > 0,
            Err(_) => false,
        }
    }
}

impl<F> ArtifactProbe for F
where
    F: Fn(&Path) -> bool,
{
    fn is_complete(&self, path: &Path) -> bool {
        self(path)
    }
}
