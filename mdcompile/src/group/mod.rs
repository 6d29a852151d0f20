use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::block::CodeBlock;
use crate::ids::IdSource;

/// Label used for groups without an explicit id.
pub const ANONYMOUS: &str = "anonymous";

/// Resolved group key.
///
/// Explicit and synthetic keys live in separate namespaces, so an explicit
/// `assembly=1` can never collide with a generated key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// From a non-empty `assembly=<id>` directive.
    Explicit(String),
    /// Generated for a block without a group id; unique per block.
    Synthetic(String),
}

impl GroupKey {
    pub fn explicit(&self) -> Option<&str> {
        match self {
            GroupKey::Explicit(id) => Some(id),
            GroupKey::Synthetic(_) => None,
        }
    }

    /// User-facing label: the explicit id, or `anonymous`.
    pub fn label(&self) -> &str {
        self.explicit().unwrap_or(ANONYMOUS)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Blocks compiled together. A read-only view over the scanned blocks.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub key: GroupKey,
    /// Members in document order. Never empty.
    pub blocks: Vec<&'a CodeBlock>,
}

impl<'a> Group<'a> {
    /// The first member, used to position group-level diagnostics.
    pub fn representative(&self) -> &'a CodeBlock {
        self.blocks[0]
    }

    /// Compilation is group-wide: one member with `compile=false` opts the
    /// whole group out.
    pub fn compiles(&self) -> bool {
        self.blocks.iter().all(|b| b.config.compile)
    }
}

/// Partition blocks by group key, keeping first-seen group order and
/// document order within each group.
pub fn group_blocks<'a>(blocks: &'a [CodeBlock], ids: &mut dyn IdSource) -> Vec<Group<'a>> {
    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut by_id: HashMap<&'a str, usize> = HashMap::new();

    for block in blocks {
        match block.config.explicit_group() {
            Some(id) => {
                if let Some(&index) = by_id.get(id) {
                    groups[index].blocks.push(block);
                } else {
                    by_id.insert(id, groups.len());
                    groups.push(Group {
                        key: GroupKey::Explicit(id.to_string()),
                        blocks: vec![block],
                    });
                }
            }
            None => groups.push(Group {
                key: GroupKey::Synthetic(ids.next_id()),
                blocks: vec![block],
            }),
        }
    }

    debug!(blocks = blocks.len(), groups = groups.len(), "grouped blocks");
    groups
}
