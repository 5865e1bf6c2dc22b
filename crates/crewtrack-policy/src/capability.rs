//! Capabilities and capability sets

use serde::{Deserialize, Serialize};

/// A named permission on a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Edit project fields, change status, delete the project
    ManageProject,
    /// Add and remove roster members
    ManageMembers,
    /// Create tasks in the project
    CreateTask,
    /// Delete tasks from the project
    DeleteTask,
}

impl Capability {
    /// Every capability, in declaration order
    pub const ALL: [Capability; 4] = [
        Capability::ManageProject,
        Capability::ManageMembers,
        Capability::CreateTask,
        Capability::DeleteTask,
    ];
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Capability::ManageProject => "ManageProject",
            Capability::ManageMembers => "ManageMembers",
            Capability::CreateTask => "CreateTask",
            Capability::DeleteTask => "DeleteTask",
        };
        write!(f, "{label}")
    }
}

/// A set of capabilities, compactly stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet {
    bits: u8,
}

impl CapabilitySet {
    /// The empty set
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// The full set: every capability
    #[inline]
    #[must_use]
    pub fn full() -> Self {
        let mut set = Self::empty();
        for cap in Capability::ALL {
            set.insert(cap);
        }
        set
    }

    /// Insert a capability
    #[inline]
    pub fn insert(&mut self, cap: Capability) {
        self.bits |= Self::bit(cap);
    }

    /// Check membership
    #[inline]
    #[must_use]
    pub fn allows(&self, cap: Capability) -> bool {
        self.bits & Self::bit(cap) != 0
    }

    /// True when no capability is held
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterate over held capabilities in declaration order
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.allows(*c))
    }

    #[inline]
    fn bit(cap: Capability) -> u8 {
        match cap {
            Capability::ManageProject => 1 << 0,
            Capability::ManageMembers => 1 << 1,
            Capability::CreateTask => 1 << 2,
            Capability::DeleteTask => 1 << 3,
        }
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = Self::empty();
        for cap in iter {
            set.insert(cap);
        }
        set
    }
}

impl std::fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for cap in self.iter() {
            if !first {
                write!(f, "+")?;
            }
            write!(f, "{cap}")?;
            first = false;
        }
        if first {
            write!(f, "none")?;
        }
        Ok(())
    }
}
