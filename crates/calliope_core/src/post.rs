//! Post entity and its lifecycle.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content format of a post.
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
pub enum PostType {
    /// Static feed post
    Post,
    /// Short vertical video
    Reels,
    /// Ephemeral story
    Story,
}

impl PostType {
    /// Whether this format carries a spoken-video script.
    pub fn has_script(&self) -> bool {
        matches!(self, PostType::Reels)
    }
}

/// Lifecycle state of a post.
///
/// Transitions are linear: `Pending → Approved → Published`. An edit
/// returns a post to `Pending` from any state. `Published` is reachable
/// only through a successful batch publish of approved posts.
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
pub enum PostStatus {
    /// Generated, awaiting review
    Pending,
    /// Reviewed and cleared for publishing
    Approved,
    /// Delivered to the publish channel
    Published,
}

/// Raw plan-generation record as returned by the model.
///
/// This is the wire shape of one element of the generated plan array.
/// `day` values are passed through as-is; the generator does not renumber
/// or dedupe them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    /// Post headline
    pub title: String,
    /// Content format
    #[serde(rename = "type")]
    pub post_type: PostType,
    /// Body text
    pub content: String,
    /// Optional spoken-video script
    #[serde(default)]
    pub script: Option<String>,
    /// 1-based day index within the period
    pub day: u32,
    /// English scene directive for image generation
    #[serde(rename = "imagePrompt")]
    pub image_prompt: String,
}

impl PostDraft {
    /// Normalize a raw draft into a canonical [`Post`].
    ///
    /// Assigns a fresh id, derives the display date from the run start
    /// (`start + day - 1`), and initializes the lifecycle fields.
    pub fn normalize(self, start: NaiveDate) -> Post {
        let date = start
            .checked_add_days(Days::new(u64::from(self.day.saturating_sub(1))))
            .unwrap_or(start);
        Post {
            id: Uuid::new_v4(),
            title: self.title,
            post_type: self.post_type,
            content: self.content,
            script: self.script,
            day: self.day,
            date,
            image_prompt: self.image_prompt,
            image_url: String::new(),
            status: PostStatus::Pending,
            edit_count: 0,
        }
    }
}

/// One content item within a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier within the plan
    pub id: Uuid,
    /// Post headline
    pub title: String,
    /// Content format
    pub post_type: PostType,
    /// Body text
    pub content: String,
    /// Optional spoken-video script
    pub script: Option<String>,
    /// 1-based day index within the period
    pub day: u32,
    /// Display date, derived from run start + day - 1
    pub date: NaiveDate,
    /// English scene directive for image generation
    pub image_prompt: String,
    /// Image reference: empty until the image stage completes, then a
    /// data URI or a deterministic placeholder URL
    pub image_url: String,
    /// Lifecycle state
    pub status: PostStatus,
    /// Number of successful edits, monotonically non-decreasing
    pub edit_count: u32,
}

impl Post {
    /// Apply a partial update, replacing only the supplied fields.
    pub fn apply(&mut self, patch: PostPatch) {
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(script) = patch.script {
            self.script = Some(script);
        }
        if let Some(image_prompt) = patch.image_prompt {
            self.image_prompt = image_prompt;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if patch.bump_edit_count {
            self.edit_count += 1;
        }
    }
}

/// Partial update merged into exactly one post by id.
///
/// Used by the image pipeline (writing `image_url`), by approve
/// (`status`), and by edit (content fields plus an edit-count bump).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    /// Replacement body text
    pub content: Option<String>,
    /// Replacement video script
    pub script: Option<String>,
    /// Replacement image directive
    pub image_prompt: Option<String>,
    /// Replacement image reference
    pub image_url: Option<String>,
    /// Replacement lifecycle state
    pub status: Option<PostStatus>,
    /// Increment the edit counter as part of this patch
    pub bump_edit_count: bool,
}

impl PostPatch {
    /// Patch that records a completed image generation.
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            image_url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Patch that moves a post to a new lifecycle state.
    pub fn status(status: PostStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(day: u32) -> PostDraft {
        PostDraft {
            title: "Latte art basics".to_string(),
            post_type: PostType::Post,
            content: "Start with a smooth microfoam.".to_string(),
            script: None,
            day,
            image_prompt: "A latte with a rosetta pattern".to_string(),
        }
    }

    #[test]
    fn normalize_derives_date_from_day() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let post = draft(1).normalize(start);
        assert_eq!(post.date, start);

        let post = draft(7).normalize(start);
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
    }

    #[test]
    fn normalize_initializes_lifecycle() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let post = draft(3).normalize(start);
        assert_eq!(post.status, PostStatus::Pending);
        assert_eq!(post.edit_count, 0);
        assert!(post.image_url.is_empty());
    }

    #[test]
    fn apply_merges_only_supplied_fields() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut post = draft(2).normalize(start);
        let title = post.title.clone();

        post.apply(PostPatch::image("data:image/png;base64,abc"));
        assert_eq!(post.image_url, "data:image/png;base64,abc");
        assert_eq!(post.title, title);
        assert_eq!(post.status, PostStatus::Pending);
    }

    #[test]
    fn apply_bumps_edit_count() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut post = draft(2).normalize(start);
        post.status = PostStatus::Approved;

        post.apply(PostPatch {
            content: Some("Revised body".to_string()),
            status: Some(PostStatus::Pending),
            bump_edit_count: true,
            ..PostPatch::default()
        });
        assert_eq!(post.content, "Revised body");
        assert_eq!(post.status, PostStatus::Pending);
        assert_eq!(post.edit_count, 1);
    }

    #[test]
    fn draft_parses_model_field_names() {
        let json = r#"{
            "title": "Morning rush",
            "type": "Reels",
            "content": "Behind the counter at 7am.",
            "script": "Open on the espresso machine...",
            "day": 2,
            "imagePrompt": "A busy cafe counter at dawn"
        }"#;
        let draft: PostDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.post_type, PostType::Reels);
        assert_eq!(draft.day, 2);
        assert!(draft.script.is_some());
    }
}
