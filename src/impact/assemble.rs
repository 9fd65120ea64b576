//! Final affected list assembly

use crate::domain::{AffectedUnit, Manifest};

/// Classifies every identifier of the closure and returns them unique and
/// sorted byte-wise by import path.
///
/// An identifier is indirect when it lies outside the module namespace of
/// `manifest`. The ordering is part of the output contract.
pub fn assemble_affected<I>(closure: I, manifest: &Manifest) -> Vec<AffectedUnit>
where
    I: IntoIterator<Item = String>,
{
    let mut affected: Vec<AffectedUnit> = closure
        .into_iter()
        .map(|id| {
            let indirect = !manifest.owns(&id);
            AffectedUnit::new(id, indirect)
        })
        .collect();

    affected.sort_by(|a, b| a.import_path.cmp(&b.import_path));
    affected.dedup_by(|a, b| a.import_path == b.import_path);
    affected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(units: &[AffectedUnit]) -> Vec<&str> {
        units.iter().map(|u| u.import_path.as_str()).collect()
    }

    #[test]
    fn test_sorted_and_unique() {
        let manifest = Manifest::new("m");
        let closure = vec!["m/c", "m/a", "m/b", "m/a"]
            .into_iter()
            .map(String::from);

        let affected = assemble_affected(closure, &manifest);
        assert_eq!(ids(&affected), vec!["m/a", "m/b", "m/c"]);
    }

    #[test]
    fn test_byte_wise_order() {
        let manifest = Manifest::new("m");
        let closure = vec!["m/b", "m/B", "m/a-x", "m/a"]
            .into_iter()
            .map(String::from);

        let affected = assemble_affected(closure, &manifest);
        assert_eq!(ids(&affected), vec!["m/B", "m/a", "m/a-x", "m/b"]);
    }

    #[test]
    fn test_indirect_classification() {
        let manifest = Manifest::new("example.com/m");
        let closure = vec![
            "example.com/m",
            "example.com/m/pkg",
            "example.com/mono",
            "github.com/ext/lib",
        ]
        .into_iter()
        .map(String::from);

        let affected = assemble_affected(closure, &manifest);
        let flags: Vec<_> = affected
            .iter()
            .map(|u| (u.import_path.as_str(), u.indirect))
            .collect();
        assert_eq!(
            flags,
            vec![
                ("example.com/m", false),
                ("example.com/m/pkg", false),
                ("example.com/mono", true),
                ("github.com/ext/lib", true),
            ]
        );
    }

    #[test]
    fn test_empty_closure() {
        assert!(assemble_affected(Vec::<String>::new(), &Manifest::new("m")).is_empty());
    }
}
