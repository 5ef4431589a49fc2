use std::collections::HashSet;

/// Tracks which `(display name, license name)` pairs were already emitted in
/// this run. Keys are only ever added.
#[derive(Debug, Default)]
pub struct DedupLedger {
    seen: HashSet<(String, String)>,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the key and return `true` the first time it is seen; `false` on
    /// every later call with the same key.
    pub fn should_emit(&mut self, display_name: &str, license_name: &str) -> bool {
        self.seen
            .insert((display_name.to_string(), license_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_call_is_suppressed() {
        let mut ledger = DedupLedger::new();
        assert!(ledger.should_emit("a (g:a)", "MIT License"));
        assert!(!ledger.should_emit("a (g:a)", "MIT License"));
        assert!(ledger.should_emit("a (g:b)", "MIT License"));
    }

    #[test]
    fn test_key_is_both_fields() {
        let mut ledger = DedupLedger::new();
        assert!(ledger.should_emit("a", "MIT License"));
        assert!(ledger.should_emit("a", "Apache License, version 2.0"));
        assert!(ledger.should_emit("b", "MIT License"));
        assert!(!ledger.should_emit("a", "Apache License, version 2.0"));
    }

    #[test]
    fn test_empty_license_name_is_a_key() {
        let mut ledger = DedupLedger::new();
        assert!(ledger.should_emit("gap", ""));
        assert!(!ledger.should_emit("gap", ""));
    }
}
