//! Content plan aggregate and run parameters.

use crate::{AnalysisData, Post, PostStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Planning horizon of one generation run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Seven daily posts
    Week,
    /// Thirty daily posts
    Month,
}

impl Period {
    /// Number of days covered by this period.
    pub fn days(&self) -> u32 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
        }
    }
}

/// Stylistic voice applied to both text and image instructions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Polished, businesslike voice
    Professional,
    /// Warm, conversational voice
    Friendly,
    /// Light, joke-forward voice
    Playful,
    /// Motivational, aspirational voice
    Inspirational,
    /// Direct, contrarian voice
    Bold,
}

/// Marketing objective of one generation run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    /// Maximize comments, saves, and shares
    Engagement,
    /// Drive direct purchases or bookings
    Sales,
    /// Grow the follower base
    Followers,
    /// Build brand recognition
    Awareness,
}

/// One generation run's output: analysis plus the ordered post sequence.
///
/// Created once analysis and plan text are both available, mutated in
/// place by image-stage completions and by edit/approve/publish
/// operations, and discarded when a new run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPlan {
    /// Target niche
    pub niche: String,
    /// Planning horizon
    pub period: Period,
    /// Stylistic voice
    pub tone: Tone,
    /// Marketing objective
    pub goal: Goal,
    /// Market analysis artifact, present once the analysis stage completes
    pub analysis: Option<AnalysisData>,
    /// Posts ordered by day ascending
    pub posts: Vec<Post>,
}

impl ContentPlan {
    /// Look up a post by id.
    pub fn post(&self, id: Uuid) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Look up a post by id for mutation.
    pub fn post_mut(&mut self, id: Uuid) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == id)
    }

    /// Posts currently in the given lifecycle state, in day order.
    pub fn posts_with_status(&self, status: PostStatus) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.status == status).collect()
    }
}
