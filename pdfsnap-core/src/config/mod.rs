//! Run description and tool settings

pub mod run_info;
pub mod settings;

pub use run_info::{DocRef, RunInfo, RunMode, SpecialDocConfig};
pub use settings::Settings;
