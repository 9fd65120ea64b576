//! ripple - change impact analysis for Go modules
//!
//! Given a baseline revision and the working tree, this library works out
//! which packages must be rebuilt or retested:
//! - Source files changed since the baseline
//! - Requirements added or re-pinned in go.mod
//! - Dependencies whose resolved version moved in the module graph
//!
//! Every changed identifier is then propagated through the reverse import
//! graph to collect all of its dependents.

pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod external;
pub mod impact;
pub mod manifest;
pub mod output;
pub mod progress;
