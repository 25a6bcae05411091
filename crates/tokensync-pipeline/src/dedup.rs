use std::collections::HashSet;
use tokensync_common::Warning;
use tracing::debug;

/// Deduplication engine for warnings collected across stages
pub struct WarningDeduplicator;

impl WarningDeduplicator {
    /// Drops repeated warnings (same kind and message), keeping the first occurrence in place.
    pub fn deduplicate(warnings: &mut Vec<Warning>) {
        let initial_count = warnings.len();
        let mut seen = HashSet::new();
        warnings.retain(|w| seen.insert((w.kind, w.message.clone())));

        if initial_count > warnings.len() {
            debug!("Deduplicated {} warnings", initial_count - warnings.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokensync_common::WarningKind;

    #[test]
    fn test_keeps_first_in_order() {
        let mut warnings = vec![
            Warning::new(WarningKind::Cycle, "a"),
            Warning::new(WarningKind::Lint, "b"),
            Warning::new(WarningKind::Cycle, "a"),
            Warning::new(WarningKind::Lint, "a"),
        ];
        WarningDeduplicator::deduplicate(&mut warnings);
        let keys: Vec<(WarningKind, &str)> = warnings.iter().map(|w| (w.kind, w.message.as_str())).collect();
        assert_eq!(
            keys,
            vec![(WarningKind::Cycle, "a"), (WarningKind::Lint, "b"), (WarningKind::Lint, "a")]
        );
    }
}
