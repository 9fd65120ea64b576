//! Reverse import graph and impact propagation
//!
//! Edges run from an imported path to each package importing it, so a
//! breadth-first walk from the changed identifiers visits everything that
//! depends on them, directly or transitively. Project packages and external
//! module paths share one string-keyed namespace.

use crate::domain::Unit;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// How changed identifiers are matched against import paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropagationMode {
    /// A changed identifier only matches an identical import path
    #[default]
    Exact,
    /// A changed module also matches import paths of its sub-packages
    /// (`<module>/...`)
    ModulePrefix,
}

/// Import path -> packages importing it (ordinary, test and external test
/// imports combined)
#[derive(Debug, Clone, Default)]
pub struct ReverseGraph {
    dependents: BTreeMap<String, Vec<String>>,
}

impl ReverseGraph {
    /// Builds the reverse graph over the whole inventory
    pub fn build(units: &[Unit]) -> Self {
        let mut dependents: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for unit in units {
            for import in unit.all_imports() {
                let list = dependents.entry(import.to_string()).or_default();
                // a unit may import the same path from several import classes
                if list.last() != Some(&unit.import_path) {
                    list.push(unit.import_path.clone());
                }
            }
        }

        Self { dependents }
    }

    /// Packages importing `import_path`, in inventory order
    pub fn dependents(&self, import_path: &str) -> &[String] {
        self.dependents
            .get(import_path)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Import paths lying strictly under `module` (`<module>/...`)
    fn paths_under<'g>(&'g self, module: &str) -> impl Iterator<Item = &'g String> + 'g {
        let prefix = format!("{}/", module);
        self.dependents
            .range(prefix.clone()..)
            .map(|(path, _)| path)
            .take_while(move |path| path.starts_with(&prefix))
    }

    /// Paths a changed identifier matches besides itself: the imported
    /// sub-package paths in `ModulePrefix` mode, none in `Exact` mode
    pub fn seed_expansion(&self, seed: &str, mode: PropagationMode) -> Vec<&String> {
        match mode {
            PropagationMode::Exact => Vec::new(),
            PropagationMode::ModulePrefix => self.paths_under(seed).collect(),
        }
    }

    /// Transitive closure of `seeds` under "is imported by".
    ///
    /// The result contains every seed plus every package reachable from one
    /// through reverse edges. Each node is enqueued at most once, so import
    /// cycles terminate.
    pub fn propagate<'s, I>(&self, seeds: I, mode: PropagationMode) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut affected: BTreeSet<String> = BTreeSet::new();
        let mut frontier: VecDeque<String> = VecDeque::new();

        for seed in seeds {
            if affected.insert(seed.to_string()) {
                frontier.push_back(seed.to_string());
            }
            for path in self.seed_expansion(seed, mode) {
                if affected.insert(path.clone()) {
                    frontier.push_back(path.clone());
                }
            }
        }

        while let Some(current) = frontier.pop_front() {
            for dependent in self.dependents(&current) {
                if affected.insert(dependent.clone()) {
                    frontier.push_back(dependent.clone());
                }
            }
        }

        affected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ImportClass;

    fn unit(path: &str, imports: &[&str]) -> Unit {
        Unit::new(path, format!("/repo/{}", path))
            .with_imports(ImportClass::Ordinary, imports.iter().copied())
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_chain_is_fully_closed() {
        let units = vec![unit("m/a", &[]), unit("m/b", &["m/a"]), unit("m/c", &["m/b"])];
        let graph = ReverseGraph::build(&units);

        let affected = graph.propagate(["m/a"], PropagationMode::Exact);
        assert_eq!(affected, set(&["m/a", "m/b", "m/c"]));
    }

    #[test]
    fn test_propagation_only_moves_towards_importers() {
        let units = vec![unit("m/a", &[]), unit("m/b", &["m/a"]), unit("m/c", &["m/b"])];
        let graph = ReverseGraph::build(&units);

        let affected = graph.propagate(["m/b"], PropagationMode::Exact);
        assert_eq!(affected, set(&["m/b", "m/c"]));
    }

    #[test]
    fn test_test_imports_are_edges() {
        let units = vec![
            unit("m/a", &[]),
            Unit::new("m/b", "/repo/b").with_imports(ImportClass::Test, ["m/a"]),
            Unit::new("m/c", "/repo/c").with_imports(ImportClass::XTest, ["m/a"]),
        ];
        let graph = ReverseGraph::build(&units);

        let affected = graph.propagate(["m/a"], PropagationMode::Exact);
        assert_eq!(affected, set(&["m/a", "m/b", "m/c"]));
    }

    #[test]
    fn test_duplicate_imports_collapse() {
        let units = vec![Unit::new("m/b", "/repo/b")
            .with_imports(ImportClass::Ordinary, ["m/a"])
            .with_imports(ImportClass::Test, ["m/a"])];
        let graph = ReverseGraph::build(&units);

        assert_eq!(graph.dependents("m/a"), ["m/b".to_string()]);
    }

    #[test]
    fn test_cycles_terminate() {
        let units = vec![unit("m/a", &["m/b"]), unit("m/b", &["m/a"])];
        let graph = ReverseGraph::build(&units);

        let affected = graph.propagate(["m/a"], PropagationMode::Exact);
        assert_eq!(affected, set(&["m/a", "m/b"]));
    }

    #[test]
    fn test_unreferenced_units_are_never_affected() {
        let units = vec![unit("m/a", &[]), unit("m/lonely", &[]), unit("m/b", &["m/a"])];
        let graph = ReverseGraph::build(&units);

        let affected = graph.propagate(["m/a"], PropagationMode::Exact);
        assert!(!affected.contains("m/lonely"));
    }

    #[test]
    fn test_external_module_seed() {
        let units = vec![unit("m/x", &["ext/lib"]), unit("m/y", &["m/x"])];
        let graph = ReverseGraph::build(&units);

        let affected = graph.propagate(["ext/lib"], PropagationMode::Exact);
        assert_eq!(affected, set(&["ext/lib", "m/x", "m/y"]));
    }

    #[test]
    fn test_exact_mode_misses_subpackage_imports() {
        let units = vec![unit("m/x", &["ext/lib/sub"])];
        let graph = ReverseGraph::build(&units);

        let affected = graph.propagate(["ext/lib"], PropagationMode::Exact);
        assert_eq!(affected, set(&["ext/lib"]));
    }

    #[test]
    fn test_prefix_mode_catches_subpackage_imports() {
        let units = vec![
            unit("m/x", &["ext/lib/sub"]),
            unit("m/y", &["ext/library"]),
            unit("m/z", &["m/x"]),
        ];
        let graph = ReverseGraph::build(&units);

        let affected = graph.propagate(["ext/lib"], PropagationMode::ModulePrefix);
        assert_eq!(affected, set(&["ext/lib", "ext/lib/sub", "m/x", "m/z"]));
    }

    #[test]
    fn test_seed_expansion_by_mode() {
        let units = vec![unit("m/x", &["ext/lib/sub", "ext/lib/sub/deep", "ext/library"])];
        let graph = ReverseGraph::build(&units);

        assert!(graph
            .seed_expansion("ext/lib", PropagationMode::Exact)
            .is_empty());
        assert_eq!(
            graph.seed_expansion("ext/lib", PropagationMode::ModulePrefix),
            vec!["ext/lib/sub", "ext/lib/sub/deep"]
        );
    }

    #[test]
    fn test_disjoint_seeds_union() {
        let units = vec![
            unit("m/a", &[]),
            unit("m/a2", &["m/a"]),
            unit("m/b", &[]),
            unit("m/b2", &["m/b"]),
        ];
        let graph = ReverseGraph::build(&units);

        let affected = graph.propagate(["m/a", "m/b"], PropagationMode::Exact);
        assert_eq!(affected, set(&["m/a", "m/a2", "m/b", "m/b2"]));
    }

    #[test]
    fn test_no_seeds_no_impact() {
        let graph = ReverseGraph::build(&[unit("m/b", &["m/a"])]);
        assert!(graph
            .propagate(std::iter::empty::<&str>(), PropagationMode::Exact)
            .is_empty());
    }
}
