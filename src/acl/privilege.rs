use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind};

/// Repository privileges, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Privilege {
    All,
    ReadWrite,
    ReadWriteUnpublished,
    AddComment,
    Read,
    ReadProcessed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalType {
    User,
    Group,
}

impl PrincipalType {
    pub const VALUES: [PrincipalType; 2] = [PrincipalType::User, PrincipalType::Group];
}

// Reflexive-transitive closure of DIRECT_SUPER, indexed by discriminant
static SUPER_CLOSURE: LazyLock<Vec<Vec<Privilege>>> = LazyLock::new(|| {
    Privilege::VALUES
        .iter()
        .map(|&privilege| {
            let mut closure = vec![privilege];
            let mut pending = vec![privilege];
            while let Some(current) = pending.pop() {
                for &sup in current.direct_super_privileges() {
                    if !closure.contains(&sup) {
                        closure.push(sup);
                        pending.push(sup);
                    }
                }
            }
            closure.sort();
            closure
        })
        .collect()
});

impl Privilege {
    pub const VALUES: [Privilege; 6] = [
        Privilege::All,
        Privilege::ReadWrite,
        Privilege::ReadWriteUnpublished,
        Privilege::AddComment,
        Privilege::Read,
        Privilege::ReadProcessed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Privilege::All => "all",
            Privilege::ReadWrite => "read-write",
            Privilege::ReadWriteUnpublished => "read-write-unpublished",
            Privilege::AddComment => "add-comment",
            Privilege::Read => "read",
            Privilege::ReadProcessed => "read-processed",
        }
    }

    /// Privileges that directly imply this one.
    pub fn direct_super_privileges(self) -> &'static [Privilege] {
        match self {
            Privilege::All => &[],
            Privilege::ReadWrite => &[Privilege::All],
            Privilege::ReadWriteUnpublished => &[Privilege::ReadWrite],
            Privilege::AddComment => &[Privilege::ReadWrite],
            Privilege::Read => &[Privilege::ReadWriteUnpublished],
            Privilege::ReadProcessed => &[Privilege::Read],
        }
    }

    /// This privilege plus every privilege implying it, sorted.
    pub fn with_super_privileges(self) -> &'static [Privilege] {
        &SUPER_CLOSURE[self as usize]
    }

    pub fn implies(self, other: Privilege) -> bool {
        other.with_super_privileges().contains(&self)
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Privilege {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Privilege::VALUES
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidPrivilegeConfiguration,
                    format!("unknown privilege '{}'", s),
                )
            })
    }
}
