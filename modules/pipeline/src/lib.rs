//! Job-pipeline compilation: layered parameter merging, plan assembly and
//! YAML serialization for the scanner's automation framework.

mod compile;
mod plan;
mod preset;

pub use compile::{build_plan, layered_merge, write_plan};
pub use plan::{Context, Env, EnvParameters, Job, JobKind, Params, Plan, PolicyDefinition, Rule};
pub use preset::{load_preset, Overrides, ScanPreset, SqliRule};
