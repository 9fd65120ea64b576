//! Direct requirement differ

use crate::domain::{Manifest, ModuleChange, Requirement};
use std::collections::HashMap;

/// Requirements of `current` that are new or pinned to a different version
/// than in `baseline`.
///
/// Requirements dropped since the baseline are not reported: nothing in the
/// current tree can depend on them. Output follows `current`'s declaration
/// order.
pub fn diff_manifests(baseline: &Manifest, current: &Manifest) -> Vec<ModuleChange> {
    let previous: HashMap<&str, &Requirement> = baseline
        .requirements
        .iter()
        .map(|r| (r.path.as_str(), r))
        .collect();

    current
        .requirements
        .iter()
        .filter_map(|req| match previous.get(req.path.as_str()) {
            Some(old) if old.same_pin(req) => None,
            Some(old) => Some(ModuleChange::new(
                req.path.as_str(),
                Some(old.version.clone()),
                req.version.as_str(),
            )),
            None => Some(ModuleChange::new(req.path.as_str(), None, req.version.as_str())),
        })
        .collect()
}
