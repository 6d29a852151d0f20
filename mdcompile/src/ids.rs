//! Sources of run-unique identifiers for synthetic group keys and type names.

use uuid::Uuid;

/// Produces identifiers that never repeat within one source.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Monotonic counter starting at 1. Deterministic, so handy in tests.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    last: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        self.last += 1;
        self.last.to_string()
    }
}

/// Random v4 UUIDs in simple (hex only) form, usable inside identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
