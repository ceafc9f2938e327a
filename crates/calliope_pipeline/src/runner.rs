//! Pipeline orchestration.

use crate::{ImagePipeline, NicheAnalyzer, PlanGenerator, PlanStateStore, Publisher, titles_for_niche};
use calliope_core::{
    ContentPlan, Goal, HistoryEntry, Period, Post, PostPatch, PostStatus, ReferenceImage, Tone,
};
use calliope_error::{CalliopeResult, PlanError, PlanErrorKind};
use calliope_history::HistoryStore;
use calliope_models::{ImageModel, TextModel};
use calliope_rate_limit::RetryPolicies;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Parameters of one generation run.
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Target niche
    pub niche: String,
    /// Planning horizon
    pub period: Period,
    /// Stylistic voice
    pub tone: Tone,
    /// Marketing objective
    pub goal: Goal,
    /// Run start date; post dates derive from it
    pub start_date: NaiveDate,
    /// Ground the analysis with live web search
    pub web_search: bool,
}

/// User edit of one post.
///
/// Only supplied fields change. A successful edit always resets the
/// post to `Pending` and bumps its edit counter.
#[derive(Debug, Clone, Default)]
pub struct EditRequest {
    /// Replacement body text
    pub content: Option<String>,
    /// Replacement video script
    pub script: Option<String>,
    /// Replacement image directive
    pub image_prompt: Option<String>,
    /// Replacement image reference
    pub image_url: Option<String>,
}

/// Background image fill in flight.
struct FillTask {
    handle: JoinHandle<()>,
    cancel: Arc<AtomicBool>,
}

/// Orchestrates the generation stages and the plan operations.
///
/// A run is a mutual-exclusion gate: starting a new run while any stage
/// of the previous one is still active (including the background image
/// fill) is rejected. Stage-fatal errors bubble to the caller with the
/// underlying error text; the store is left at its last committed
/// stage.
pub struct PipelineRunner<T, I> {
    text_model: Arc<T>,
    image: Arc<ImagePipeline<I>>,
    policies: RetryPolicies,
    store: Arc<PlanStateStore>,
    history: HistoryStore,
    active: Arc<AtomicBool>,
    fill: Mutex<Option<FillTask>>,
}

impl<T, I> PipelineRunner<T, I>
where
    T: TextModel + 'static,
    I: ImageModel + 'static,
{
    /// Create a runner.
    ///
    /// `image_rpm` and `image_throttle` shape the image stage: a
    /// per-minute cap on calls plus the fixed inter-post delay.
    pub fn new(
        text_model: Arc<T>,
        image_model: Arc<I>,
        policies: RetryPolicies,
        store: Arc<PlanStateStore>,
        history: HistoryStore,
        image_rpm: Option<u32>,
        image_throttle: Duration,
    ) -> Self {
        let image = Arc::new(ImagePipeline::new(
            image_model,
            &policies,
            image_rpm,
            image_throttle,
        ));
        Self {
            text_model,
            image,
            policies,
            store,
            history,
            active: Arc::new(AtomicBool::new(false)),
            fill: Mutex::new(None),
        }
    }

    /// The shared plan state store.
    pub fn store(&self) -> &Arc<PlanStateStore> {
        &self.store
    }

    /// Whether any stage of a run is currently active.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Execute a generation run.
    ///
    /// Returns once the plan text is committed to the store; images
    /// continue filling in the background. The previous plan, if any,
    /// is discarded when the run starts.
    pub async fn run(
        &self,
        params: RunParams,
        references: Vec<ReferenceImage>,
    ) -> CalliopeResult<()> {
        if params.niche.trim().is_empty() {
            return Err(calliope_error::ConfigError::new("niche must not be empty").into());
        }
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PlanError::new(PlanErrorKind::RunActive).into());
        }

        match self.run_stages(&params).await {
            Ok(()) => {
                self.spawn_fill(params.tone, references);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Generation run failed");
                self.active.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Analysis and plan-text stages, strictly sequential.
    async fn run_stages(&self, params: &RunParams) -> CalliopeResult<()> {
        self.store.clear();

        let history = match self.history.load() {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "Could not load history, continuing without dedup hint");
                Vec::new()
            }
        };
        let excluded = titles_for_niche(&history, &params.niche);

        let analyzer = NicheAnalyzer::new(self.text_model.clone(), &self.policies, params.web_search);
        let analysis = analyzer.analyze(&params.niche, params.goal).await?;

        let generator = PlanGenerator::new(self.text_model.clone(), &self.policies);
        let posts = generator
            .generate(
                &params.niche,
                params.period,
                params.tone,
                params.goal,
                &analysis,
                &excluded,
                params.start_date,
            )
            .await?;

        let entries: Vec<HistoryEntry> = posts
            .iter()
            .map(|p| HistoryEntry::new(params.niche.clone(), p.title.clone()))
            .collect();

        self.store.initialize(ContentPlan {
            niche: params.niche.clone(),
            period: params.period,
            tone: params.tone,
            goal: params.goal,
            analysis: Some(analysis),
            posts,
        });

        // History write failure must not abort a run that already produced a plan
        if let Err(e) = self.history.append(entries) {
            warn!(error = %e, "Could not record titles in history");
        }

        Ok(())
    }

    /// Start the background image fill and release the run gate when it
    /// finishes.
    fn spawn_fill(&self, tone: Tone, references: Vec<ReferenceImage>) {
        let pipeline = self.image.clone();
        let store = self.store.clone();
        let active = self.active.clone();
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_flag = cancel.clone();

        let handle = tokio::spawn(async move {
            pipeline
                .fill_plan(&store, tone, &references, &cancel_flag)
                .await;
            active.store(false, Ordering::SeqCst);
        });

        *self.fill.lock().unwrap() = Some(FillTask { handle, cancel });
    }

    /// Wait for the background image fill to complete.
    pub async fn wait_for_images(&self) {
        let task = { self.fill.lock().unwrap().take() };
        if let Some(task) = task {
            if let Err(e) = task.handle.await {
                warn!(error = %e, "Image fill task aborted");
            }
        }
    }

    /// Request cancellation of the background image fill.
    ///
    /// The fill checks the flag between posts; the in-flight call is
    /// allowed to finish.
    pub fn cancel_fill(&self) {
        if let Some(task) = self.fill.lock().unwrap().as_ref() {
            task.cancel.store(true, Ordering::SeqCst);
            info!("Image fill cancellation requested");
        }
    }

    /// Approve a post: `Pending → Approved`.
    ///
    /// A post in any other state is left untouched; returns whether the
    /// transition happened.
    pub fn approve(&self, id: Uuid) -> CalliopeResult<bool> {
        self.store
            .transition_post(id, PostStatus::Pending, PostStatus::Approved)
    }

    /// Apply a user edit to one post.
    ///
    /// Committed as a single atomic patch: on any failure the post
    /// keeps its prior content. Success resets the post to `Pending`
    /// (from any state) and bumps its edit counter.
    pub fn edit(&self, id: Uuid, edit: EditRequest) -> CalliopeResult<()> {
        let patch = PostPatch {
            content: edit.content,
            script: edit.script,
            image_prompt: edit.image_prompt,
            image_url: edit.image_url,
            status: Some(PostStatus::Pending),
            bump_edit_count: true,
        };
        self.store.patch_post(id, patch)
    }

    /// Regenerate the image for a single post.
    ///
    /// Runs independently of any background fill still in flight; both
    /// write whole-post patches keyed by id, so the last write for this
    /// id wins. That race is intentional and documented, not guarded.
    pub async fn regenerate_image(
        &self,
        id: Uuid,
        references: &[ReferenceImage],
    ) -> CalliopeResult<String> {
        let plan = self
            .store
            .snapshot()
            .ok_or_else(|| PlanError::new(PlanErrorKind::NoPlan))?;
        let post = plan
            .post(id)
            .cloned()
            .ok_or_else(|| PlanError::new(PlanErrorKind::PostNotFound(id.to_string())))?;

        let url = self
            .image
            .generate_for_post(&post, plan.tone, references, true)
            .await;
        self.store.patch_post(id, PostPatch::image(url.clone()))?;
        Ok(url)
    }

    /// Publish every approved post through the given channel.
    ///
    /// All-or-nothing: a successful call flips every approved post to
    /// `Published` and returns the count; a failed call leaves the plan
    /// unchanged.
    pub async fn publish(&self, publisher: &dyn Publisher) -> CalliopeResult<usize> {
        let plan = self
            .store
            .snapshot()
            .ok_or_else(|| PlanError::new(PlanErrorKind::NoPlan))?;

        let approved: Vec<Post> = plan
            .posts
            .iter()
            .filter(|p| p.status == PostStatus::Approved)
            .cloned()
            .collect();

        if approved.is_empty() {
            return Err(PlanError::new(PlanErrorKind::NothingToPublish).into());
        }

        info!(count = approved.len(), "Publishing approved posts");
        publisher.publish(&approved).await?;

        Ok(self
            .store
            .set_status_for_all(PostStatus::Approved, PostStatus::Published))
    }
}
