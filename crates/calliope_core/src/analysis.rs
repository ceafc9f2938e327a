//! Niche market analysis artifact.

use serde::{Deserialize, Serialize};

/// Structured market analysis for a niche.
///
/// Produced by a single structured-output model call at the start of a
/// run and immutable afterwards. All three fields are required; a
/// response missing any of them is a contract violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisData {
    /// Short competitor descriptions, most relevant first
    pub competitors: Vec<String>,
    /// Current content trends in the niche
    pub trends: Vec<String>,
    /// Short strategy summary
    pub summary: String,
}
