//! Full module graph differ

use crate::domain::{ModuleChange, ResolvedDependencies};

/// Modules whose selected version differs between two resolutions, or that
/// are only present in `current`.
///
/// Catches transitive upgrades that never show up as a go.mod edit. Both
/// maps are treated as opaque path-to-version tables. Output is sorted by
/// module path.
pub fn diff_resolutions(
    baseline: &ResolvedDependencies,
    current: &ResolvedDependencies,
) -> Vec<ModuleChange> {
    current
        .iter()
        .filter_map(|(path, version)| match baseline.version(path) {
            Some(old) if old == version => None,
            old => Some(ModuleChange::new(path, old.map(str::to_string), version)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution(entries: &[(&str, &str)]) -> ResolvedDependencies {
        entries
            .iter()
            .map(|(p, v)| (p.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_transitive_upgrade_is_reported() {
        let baseline = resolution(&[("ext/lib", "v1.0.0"), ("ext/deep", "v0.3.0")]);
        let current = resolution(&[("ext/lib", "v1.0.0"), ("ext/deep", "v0.4.0")]);

        assert_eq!(
            diff_resolutions(&baseline, &current),
            vec![ModuleChange::new("ext/deep", Some("v0.3.0".to_string()), "v0.4.0")]
        );
    }

    #[test]
    fn test_new_module_is_reported() {
        let baseline = resolution(&[]);
        let current = resolution(&[("ext/new", "v1.0.0")]);

        assert_eq!(
            diff_resolutions(&baseline, &current),
            vec![ModuleChange::new("ext/new", None, "v1.0.0")]
        );
    }

    #[test]
    fn test_dropped_module_is_not_reported() {
        let baseline = resolution(&[("ext/gone", "v1.0.0")]);
        let current = resolution(&[]);

        assert!(diff_resolutions(&baseline, &current).is_empty());
    }

    #[test]
    fn test_identical_resolutions_yield_nothing() {
        let both = resolution(&[("a", "v1"), ("b", "v2")]);
        assert!(diff_resolutions(&both, &both.clone()).is_empty());
    }
}
