//! Risk levels normalized from locale-mixed scanner descriptors.

use serde::Serialize;

/// Normalized alert severity, ordered from most to least severe so that
/// sorting findings by risk puts the worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Risk {
    High,
    Medium,
    Low,
    Informational,
}

impl Risk {
    /// Parse a raw `riskdesc` field. The scanner emits these in the UI
    /// locale, so both the English words and the Japanese single-character
    /// forms must be recognized. Anything unrecognized is informational.
    pub fn from_descriptor(desc: &str) -> Risk {
        if desc.contains('高') || desc.contains("High") {
            Risk::High
        } else if desc.contains('中') || desc.contains("Medium") {
            Risk::Medium
        } else if desc.contains('低') || desc.contains("Low") {
            Risk::Low
        } else {
            Risk::Informational
        }
    }

    /// Score penalty charged per finding of this level.
    pub fn penalty(self) -> u32 {
        match self {
            Risk::High => 20,
            Risk::Medium => 3,
            Risk::Low => 1,
            Risk::Informational => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Risk::High => "High",
            Risk::Medium => "Medium",
            Risk::Low => "Low",
            Risk::Informational => "Informational",
        }
    }
}
