/// Identifiers handed out by the external scene provider.
///
/// The provider's own handles are ephemeral; these plain values are the
/// only thing the sync engine keeps from one traversal to the next.

use std::fmt;

/// Identity of a provider data-block (object, mesh data, material,
/// particle settings, cache file, world, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataId(pub u64);

impl fmt::Display for DataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Maximum nesting depth of a persistent-id path
pub const PERSISTENT_ID_SIZE: usize = 8;

/// Position of an instance within nested duplication.
///
/// Stable across traversals of an unchanged scene. Element 0 is the
/// innermost level (e.g. the particle index for particle duplicates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PersistentId {
    ids: [i32; PERSISTENT_ID_SIZE],
    len: u8,
}

impl PersistentId {
    /// Build a path from its levels. Levels past `PERSISTENT_ID_SIZE` are dropped.
    pub fn new(levels: &[i32]) -> Self {
        let len = levels.len().min(PERSISTENT_ID_SIZE);
        let mut ids = [0; PERSISTENT_ID_SIZE];
        ids[..len].copy_from_slice(&levels[..len]);
        Self { ids, len: len as u8 }
    }

    /// Levels of the path
    pub fn as_slice(&self) -> &[i32] {
        &self.ids[..self.len as usize]
    }

    /// Innermost level, if any
    pub fn first(&self) -> Option<i32> {
        self.as_slice().first().copied()
    }

    /// The path without its innermost level
    pub fn tail(&self) -> Self {
        match self.as_slice().split_first() {
            Some((_, rest)) => Self::new(rest),
            None => *self,
        }
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True for an empty path
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
