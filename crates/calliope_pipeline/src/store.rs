//! Observable plan state.

use calliope_core::{ContentPlan, PostPatch, PostStatus};
use calliope_error::{CalliopeResult, PlanError, PlanErrorKind};
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

/// Holds the single active content plan, or none.
///
/// Built on a `watch` channel: every mutation replaces the observed
/// value atomically, so subscribers and `snapshot()` callers never see a
/// partially-updated post. Mutations are whole-post merges performed
/// under the channel's internal lock; the last write for a given post id
/// wins, which is the documented policy for the one real race in the
/// system (single-post regeneration overlapping the background fill).
pub struct PlanStateStore {
    tx: watch::Sender<Option<ContentPlan>>,
}

impl PlanStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Replace the whole plan. Used once per run, after the analysis and
    /// plan-text stages have both completed.
    pub fn initialize(&self, plan: ContentPlan) {
        debug!(posts = plan.posts.len(), niche = %plan.niche, "Initializing plan");
        self.tx.send_replace(Some(plan));
    }

    /// Discard the active plan.
    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    /// Clone of the current plan, if one is loaded.
    pub fn snapshot(&self) -> Option<ContentPlan> {
        self.tx.borrow().clone()
    }

    /// Subscribe to plan changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<ContentPlan>> {
        self.tx.subscribe()
    }

    /// Merge fields into exactly one post by id.
    pub fn patch_post(&self, id: Uuid, patch: PostPatch) -> CalliopeResult<()> {
        let mut outcome = Err(PlanErrorKind::NoPlan);

        self.tx.send_if_modified(|plan| {
            let Some(plan) = plan.as_mut() else {
                return false;
            };
            let Some(post) = plan.post_mut(id) else {
                outcome = Err(PlanErrorKind::PostNotFound(id.to_string()));
                return false;
            };
            post.apply(patch.clone());
            outcome = Ok(());
            true
        });

        outcome.map_err(|kind| PlanError::new(kind).into())
    }

    /// Move one post from `from` to `to`, if it is currently in `from`.
    ///
    /// Returns whether a transition happened. A post in any other state
    /// is left untouched.
    pub fn transition_post(&self, id: Uuid, from: PostStatus, to: PostStatus) -> CalliopeResult<bool> {
        let mut outcome = Err(PlanErrorKind::NoPlan);

        self.tx.send_if_modified(|plan| {
            let Some(plan) = plan.as_mut() else {
                return false;
            };
            let Some(post) = plan.post_mut(id) else {
                outcome = Err(PlanErrorKind::PostNotFound(id.to_string()));
                return false;
            };
            if post.status != from {
                outcome = Ok(false);
                return false;
            }
            post.status = to;
            outcome = Ok(true);
            true
        });

        outcome.map_err(|kind| PlanError::new(kind).into())
    }

    /// Batch transition: every post currently in `from` moves to `to`.
    ///
    /// Returns the number of posts that moved.
    pub fn set_status_for_all(&self, from: PostStatus, to: PostStatus) -> usize {
        let mut moved = 0;

        self.tx.send_if_modified(|plan| {
            let Some(plan) = plan.as_mut() else {
                return false;
            };
            for post in plan.posts.iter_mut().filter(|p| p.status == from) {
                post.status = to;
                moved += 1;
            }
            moved > 0
        });

        moved
    }
}

impl Default for PlanStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calliope_core::{AnalysisData, Goal, Period, Post, PostType, Tone};
    use chrono::NaiveDate;

    fn post(day: u32) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: format!("Day {day}"),
            post_type: PostType::Post,
            content: "Body".to_string(),
            script: None,
            day,
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            image_prompt: "Scene".to_string(),
            image_url: String::new(),
            status: PostStatus::Pending,
            edit_count: 0,
        }
    }

    fn plan(posts: Vec<Post>) -> ContentPlan {
        ContentPlan {
            niche: "coffee shop".to_string(),
            period: Period::Week,
            tone: Tone::Friendly,
            goal: Goal::Engagement,
            analysis: Some(AnalysisData {
                competitors: vec![],
                trends: vec![],
                summary: "ok".to_string(),
            }),
            posts,
        }
    }

    #[test]
    fn patch_targets_exactly_one_post() {
        let store = PlanStateStore::new();
        let posts = vec![post(1), post(2)];
        let target = posts[0].id;
        store.initialize(plan(posts));

        store.patch_post(target, PostPatch::image("data:x")).unwrap();

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.post(target).unwrap().image_url, "data:x");
        assert!(snapshot.posts[1].image_url.is_empty());
    }

    #[test]
    fn patch_without_plan_is_an_error() {
        let store = PlanStateStore::new();
        let result = store.patch_post(Uuid::new_v4(), PostPatch::image("data:x"));
        assert!(result.is_err());
    }

    #[test]
    fn patch_unknown_id_is_an_error() {
        let store = PlanStateStore::new();
        store.initialize(plan(vec![post(1)]));
        let result = store.patch_post(Uuid::new_v4(), PostPatch::image("data:x"));
        assert!(result.is_err());
    }

    #[test]
    fn transition_respects_the_source_state() {
        let store = PlanStateStore::new();
        let posts = vec![post(1)];
        let id = posts[0].id;
        store.initialize(plan(posts));

        assert!(store
            .transition_post(id, PostStatus::Pending, PostStatus::Approved)
            .unwrap());
        // Already approved: a second approve is a no-op
        assert!(!store
            .transition_post(id, PostStatus::Pending, PostStatus::Approved)
            .unwrap());
        assert_eq!(
            store.snapshot().unwrap().posts[0].status,
            PostStatus::Approved
        );
    }

    #[test]
    fn batch_transition_moves_only_matching_posts() {
        let store = PlanStateStore::new();
        let mut posts = vec![post(1), post(2), post(3)];
        posts[0].status = PostStatus::Approved;
        posts[2].status = PostStatus::Approved;
        store.initialize(plan(posts));

        let moved = store.set_status_for_all(PostStatus::Approved, PostStatus::Published);
        assert_eq!(moved, 2);

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.posts[0].status, PostStatus::Published);
        assert_eq!(snapshot.posts[1].status, PostStatus::Pending);
        assert_eq!(snapshot.posts[2].status, PostStatus::Published);
    }

    #[tokio::test]
    async fn subscribers_observe_initialization() {
        let store = PlanStateStore::new();
        let mut rx = store.subscribe();
        assert!(rx.borrow().is_none());

        store.initialize(plan(vec![post(1)]));
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_some());
    }
}
