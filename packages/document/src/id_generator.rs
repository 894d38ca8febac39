use crate::ast::Node;
use uuid::Uuid;

/// Attribute that carries a block's stable identity
pub const UID_ATTR: &str = "uid";

/// Source of block identifiers
pub trait UidGenerator {
    fn next_uid(&mut self) -> String;
}

/// Random 128-bit identifiers (UUID v4). Used by the live editor.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUidGenerator;

impl UidGenerator for RandomUidGenerator {
    fn next_uid(&mut self) -> String {
        generate_uid()
    }
}

/// Generate a fresh block identifier
pub fn generate_uid() -> String {
    Uuid::new_v4().to_string()
}

/// Sequential identifiers for fixtures and snapshot tests
#[derive(Debug, Clone)]
pub struct SequentialUidGenerator {
    seed: String,
    count: u32,
}

impl SequentialUidGenerator {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl UidGenerator for SequentialUidGenerator {
    fn next_uid(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }
}

/// Give every uid-bearing node that lacks one a fresh `uid`.
///
/// Existing identifiers are never replaced. Returns the number of nodes
/// that were assigned.
pub fn assign_missing_uids<G: UidGenerator + ?Sized>(node: &mut Node, generator: &mut G) -> usize {
    let mut assigned = 0;

    if node.node_type.carries_uid() && node.uid().is_none() {
        node.attrs
            .insert(UID_ATTR.to_string(), generator.next_uid().into());
        assigned += 1;
    }

    for child in &mut node.content {
        assigned += assign_missing_uids(child, generator);
    }

    assigned
}
