//! Core domain models for ripple
//!
//! This module contains the fundamental types used throughout the application:
//! - go.mod snapshots and their requirements
//! - Units (packages) of the current inventory
//! - Change records produced by the change signals
//! - Affected units and the final report

mod affected;
mod change;
mod manifest;
mod report;
mod resolved;
mod unit;

pub use affected::AffectedUnit;
pub use change::{ChangeReason, ChangeRecord, ChangeSet, ModuleChange};
pub use manifest::{Manifest, ModuleVersion, Replace, Requirement};
pub use report::Report;
pub use resolved::ResolvedDependencies;
pub use unit::{ImportClass, Unit};
