//! Image generation stage.

use crate::PlanStateStore;
use calliope_core::{Post, PostPatch, ReferenceImage, Tone};
use calliope_models::{ImageModel, ImageRequest};
use calliope_rate_limit::{CallClass, RequestLimiter, RetryPolicies, RetryingInvoker};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Maximum content excerpt length embedded in an image directive.
const EXCERPT_CHARS: usize = 200;

/// Generates one image per post, with throttling and graceful fallback.
///
/// Image-stage failure must never abort a run or surface to the user:
/// every failure, including retry exhaustion, is downgraded to a
/// deterministic placeholder keyed on the post id. The batch fill is
/// strictly sequential with a fixed inter-post delay, a deliberate
/// throttle against provider rate limits rather than a correctness
/// requirement.
pub struct ImagePipeline<M> {
    model: Arc<M>,
    invoker: RetryingInvoker,
    limiter: RequestLimiter,
    throttle: Duration,
}

impl<M: ImageModel> ImagePipeline<M> {
    /// Create an image pipeline.
    ///
    /// `rpm` bounds image calls per minute on top of the fixed
    /// `throttle` between batch posts.
    pub fn new(
        model: Arc<M>,
        policies: &RetryPolicies,
        rpm: Option<u32>,
        throttle: Duration,
    ) -> Self {
        Self {
            model,
            invoker: RetryingInvoker::new(policies.for_class(CallClass::Image)),
            limiter: RequestLimiter::new(rpm),
            throttle,
        }
    }

    /// Deterministic placeholder reference for a post.
    ///
    /// The same post id always yields the same URL within and across
    /// runs.
    pub fn placeholder_url(id: Uuid) -> String {
        let digest = Sha256::digest(id.as_bytes());
        let seed: String = digest.iter().take(6).map(|b| format!("{b:02x}")).collect();
        format!("https://picsum.photos/seed/{seed}/1024/1024")
    }

    /// Select a reference image for a post.
    ///
    /// The batch fill pins the first reference so a plan has a coherent
    /// look; single-post regeneration varies the pick by post id.
    fn select_reference<'a>(
        references: &'a [ReferenceImage],
        id: Uuid,
        randomize: bool,
    ) -> Option<&'a ReferenceImage> {
        if references.is_empty() {
            return None;
        }
        if !randomize {
            return references.first();
        }
        let digest = Sha256::digest(id.as_bytes());
        let index = usize::from(digest[0]) % references.len();
        references.get(index)
    }

    /// Compose the image-model directive for a post.
    fn compose_directive(post: &Post, tone: Tone, with_reference: bool) -> String {
        let excerpt: String = post.content.chars().take(EXCERPT_CHARS).collect();
        let mut directive = format!(
            "Generate a single social media image for this post.\n\
             Post title: {title}\n\
             Post excerpt: {excerpt}\n\
             Scene: {prompt}\n\
             Visual tone: {tone}.\n\
             Hard constraints: no text, no words, no letters, no logos, \
             no watermarks, no distorted faces.",
            title = post.title,
            prompt = post.image_prompt,
        );
        if with_reference {
            directive.push_str(
                "\nMatch the color palette and mood of the attached reference image.",
            );
        }
        directive
    }

    /// Generate an image reference for one post.
    ///
    /// Infallible by design: returns either a data URI of the generated
    /// image or the post's placeholder URL.
    pub async fn generate_for_post(
        &self,
        post: &Post,
        tone: Tone,
        references: &[ReferenceImage],
        randomize_reference: bool,
    ) -> String {
        let reference = Self::select_reference(references, post.id, randomize_reference);
        let directive = Self::compose_directive(post, tone, reference.is_some());

        let request = ImageRequest {
            directive,
            reference: reference.cloned(),
            model: None,
        };

        let result = self
            .invoker
            .invoke(|| async {
                self.limiter.until_ready().await;
                self.model.generate_image(&request).await
            })
            .await;

        match result {
            Ok(image) => image.to_data_uri(),
            Err(e) => {
                warn!(post_id = %post.id, error = %e, "Image generation failed, using placeholder");
                Self::placeholder_url(post.id)
            }
        }
    }

    /// Fill images for every post in the active plan, sequentially.
    ///
    /// A fixed delay precedes each call except the very first. The
    /// `cancelled` flag is checked between posts; it is the cancellation
    /// slot for the background fill task.
    pub async fn fill_plan(
        &self,
        store: &PlanStateStore,
        tone: Tone,
        references: &[ReferenceImage],
        cancelled: &AtomicBool,
    ) {
        let Some(plan) = store.snapshot() else {
            return;
        };

        info!(posts = plan.posts.len(), "Starting image fill");

        for (index, post) in plan.posts.iter().enumerate() {
            if cancelled.load(Ordering::SeqCst) {
                info!(completed = index, "Image fill cancelled");
                return;
            }
            if index > 0 {
                tokio::time::sleep(self.throttle).await;
            }

            let url = self.generate_for_post(post, tone, references, false).await;
            if let Err(e) = store.patch_post(post.id, PostPatch::image(url)) {
                // Plan was cleared mid-fill; nothing left to write into
                warn!(post_id = %post.id, error = %e, "Dropping image result");
                return;
            }
        }

        info!("Image fill complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calliope_core::PostType;
    use chrono::NaiveDate;

    fn post() -> Post {
        Post {
            id: Uuid::new_v4(),
            title: "Latte art basics".to_string(),
            post_type: PostType::Post,
            content: "Start with a smooth microfoam, then pour slowly.".to_string(),
            script: None,
            day: 1,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            image_prompt: "A latte with a rosetta pattern".to_string(),
            image_url: String::new(),
            status: calliope_core::PostStatus::Pending,
            edit_count: 0,
        }
    }

    #[test]
    fn placeholder_is_deterministic_per_id() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert_eq!(
            ImagePipeline::<calliope_models::GeminiClient>::placeholder_url(id),
            ImagePipeline::<calliope_models::GeminiClient>::placeholder_url(id)
        );
        assert_ne!(
            ImagePipeline::<calliope_models::GeminiClient>::placeholder_url(id),
            ImagePipeline::<calliope_models::GeminiClient>::placeholder_url(other)
        );
    }

    #[test]
    fn placeholder_is_never_empty() {
        let url = ImagePipeline::<calliope_models::GeminiClient>::placeholder_url(Uuid::nil());
        assert!(url.starts_with("https://"));
    }

    #[test]
    fn directive_embeds_post_fields_and_constraints() {
        let directive = ImagePipeline::<calliope_models::GeminiClient>::compose_directive(
            &post(),
            Tone::Friendly,
            false,
        );
        assert!(directive.contains("Latte art basics"));
        assert!(directive.contains("rosetta"));
        assert!(directive.contains("friendly"));
        assert!(directive.contains("no logos"));
        assert!(!directive.contains("reference image"));
    }

    #[test]
    fn directive_mentions_reference_when_present() {
        let directive = ImagePipeline::<calliope_models::GeminiClient>::compose_directive(
            &post(),
            Tone::Bold,
            true,
        );
        assert!(directive.contains("reference image"));
    }

    #[test]
    fn directive_truncates_long_content() {
        let mut long_post = post();
        long_post.content = "x".repeat(5_000);
        let directive = ImagePipeline::<calliope_models::GeminiClient>::compose_directive(
            &long_post,
            Tone::Friendly,
            false,
        );
        assert!(directive.len() < 1_000);
    }

    #[test]
    fn batch_fill_pins_the_first_reference() {
        let references = vec![
            ReferenceImage::new(vec![1], "image/png"),
            ReferenceImage::new(vec![2], "image/png"),
        ];
        let picked = ImagePipeline::<calliope_models::GeminiClient>::select_reference(
            &references,
            Uuid::new_v4(),
            false,
        );
        assert_eq!(picked, references.first());
    }

    #[test]
    fn regeneration_pick_is_stable_per_id() {
        let references = vec![
            ReferenceImage::new(vec![1], "image/png"),
            ReferenceImage::new(vec![2], "image/png"),
            ReferenceImage::new(vec![3], "image/png"),
        ];
        let id = Uuid::new_v4();
        let first = ImagePipeline::<calliope_models::GeminiClient>::select_reference(
            &references,
            id,
            true,
        );
        let second = ImagePipeline::<calliope_models::GeminiClient>::select_reference(
            &references,
            id,
            true,
        );
        assert_eq!(first, second);
    }
}
