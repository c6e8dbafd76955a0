//! Report normalization: JSON encoding repair, risk normalization and
//! 0-100 security scoring of raw scanner output.

mod model;
mod repair;
mod risk;
mod score;

pub use model::{
    load_report, normalize, Finding, InstanceDetail, Report, SummaryEntry, ZapAlert,
    ZapInstance, ZapReport, ZapSite,
};
pub use repair::repair_run_dir;
pub use risk::Risk;
pub use score::{grade, score, Grade};
