//! Target derivation and validation: which output files a run may request.
//!
//! Everything here is a pure function of the run configuration and mode.

pub mod catalog;
pub mod mode;
pub mod naming;
pub mod validator;

pub use catalog::{default_vaxrank_targets, derive_catalog, somatic_vcf_targets, TargetSet};
pub use mode::{resolve_mode, ModeFlags, RunMode};
pub use validator::select_targets;
