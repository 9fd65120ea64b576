//! Flat module resolution maps (`go list -m all`)

use std::collections::BTreeMap;

/// Every module linked into the build with its selected version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDependencies {
    modules: BTreeMap<String, String>,
}

impl ResolvedDependencies {
    /// Parses `go list -m all` output.
    ///
    /// Each line is `path version [=> replacement ...]`; lines with fewer
    /// than two fields (the main module) are skipped.
    pub fn parse(output: &str) -> Self {
        output
            .lines()
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                match (fields.next(), fields.next()) {
                    (Some(path), Some(version)) => Some((path.to_string(), version.to_string())),
                    _ => None,
                }
            })
            .collect()
    }

    pub fn version(&self, path: &str) -> Option<&str> {
        self.modules.get(path).map(String::as_str)
    }

    /// Modules in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.modules.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl FromIterator<(String, String)> for ResolvedDependencies {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            modules: iter.into_iter().collect(),
        }
    }
}
