//! Plan-text generation stage.

use crate::extraction::{extract_json, parse_json};
use calliope_core::{AnalysisData, Goal, Period, Post, PostDraft, Tone};
use calliope_error::CalliopeResult;
use calliope_models::{TextModel, TextRequest};
use calliope_rate_limit::{CallClass, RetryPolicies, RetryingInvoker};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Produces the ordered post sequence for a run.
///
/// Issues one structured-output request expecting a JSON array of draft
/// records, then normalizes each into a canonical [`Post`]. `day` values
/// from the model are passed through without renumbering or deduping;
/// incomplete coverage of the period is logged, not repaired.
pub struct PlanGenerator<M> {
    model: Arc<M>,
    invoker: RetryingInvoker,
}

impl<M: TextModel> PlanGenerator<M> {
    /// Create a generator with the text-class retry budget.
    pub fn new(model: Arc<M>, policies: &RetryPolicies) -> Self {
        Self {
            model,
            invoker: RetryingInvoker::new(policies.for_class(CallClass::Text)),
        }
    }

    /// Run the plan-text stage.
    ///
    /// `excluded_titles` is the dedup hint from prior runs for this
    /// niche; `start` anchors the derived per-post dates.
    #[allow(clippy::too_many_arguments)]
    pub async fn generate(
        &self,
        niche: &str,
        period: Period,
        tone: Tone,
        goal: Goal,
        analysis: &AnalysisData,
        excluded_titles: &[String],
        start: NaiveDate,
    ) -> CalliopeResult<Vec<Post>> {
        info!(niche, %period, days = period.days(), "Generating content plan");

        let instruction = Self::instruction(niche, period, tone, goal, analysis, excluded_titles);
        let request = TextRequest::new(instruction).with_json();

        let text = self.invoker.invoke(|| self.model.generate(&request)).await?;

        let json = extract_json(&text)?;
        let drafts: Vec<PostDraft> = parse_json(&json)?;

        Self::check_day_coverage(&drafts, period);

        let mut posts: Vec<Post> = drafts.into_iter().map(|d| d.normalize(start)).collect();
        posts.sort_by_key(|p| p.day);

        info!(count = posts.len(), "Content plan generated");
        Ok(posts)
    }

    /// Warn when model-provided days do not cover the period exactly.
    ///
    /// Days are passed through as-is either way; the operator should see
    /// the gap rather than have it silently repaired.
    fn check_day_coverage(drafts: &[PostDraft], period: Period) {
        let days: Vec<u32> = drafts.iter().map(|d| d.day).collect();
        let unique: HashSet<u32> = days.iter().copied().collect();

        if unique.len() != days.len() {
            warn!("Model returned duplicate day values, passing through");
        }
        let missing: Vec<u32> = (1..=period.days()).filter(|d| !unique.contains(d)).collect();
        if !missing.is_empty() {
            warn!(?missing, "Model left days uncovered, passing through");
        }
        if let Some(&day) = days.iter().find(|d| **d < 1 || **d > period.days()) {
            warn!(day, "Model returned day outside the period");
        }
    }

    fn instruction(
        niche: &str,
        period: Period,
        tone: Tone,
        goal: Goal,
        analysis: &AnalysisData,
        excluded_titles: &[String],
    ) -> String {
        let days = period.days();
        let mut instruction = format!(
            "You are a social media content planner. Create a {days}-day content plan \
             for a \"{niche}\" account. The voice is {tone} and the primary goal is {goal}.\n\
             Market analysis to build on:\n\
             - Competitors: {competitors}\n\
             - Trends: {trends}\n\
             - Strategy: {summary}\n\
             Respond with ONLY a valid JSON array of exactly {days} objects, one per day, \
             each with these fields:\n\
             - \"title\": a short post headline\n\
             - \"type\": one of \"Post\", \"Reels\", \"Story\"\n\
             - \"content\": the full body text, ready to publish\n\
             - \"script\": a spoken-video script (only for \"Reels\", otherwise omit)\n\
             - \"day\": the 1-based day number, covering 1 through {days}\n\
             - \"imagePrompt\": an English description of the visual scene for this post\n\
             Do not include any text outside the JSON array.",
            competitors = analysis.competitors.join("; "),
            trends = analysis.trends.join("; "),
            summary = analysis.summary,
        );

        if !excluded_titles.is_empty() {
            instruction.push_str(&format!(
                "\nThese titles were already used for this niche, do NOT repeat them:\n{}",
                excluded_titles.join("\n")
            ));
        }

        instruction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedModel {
        response: String,
        requests: Mutex<Vec<TextRequest>>,
    }

    impl CannedModel {
        fn new(response: &str) -> Self {
            Self {
                response: response.to_string(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextModel for CannedModel {
        async fn generate(&self, req: &TextRequest) -> CalliopeResult<String> {
            self.requests.lock().unwrap().push(req.clone());
            Ok(self.response.clone())
        }
    }

    fn analysis() -> AnalysisData {
        AnalysisData {
            competitors: vec!["Blue Bottle".to_string()],
            trends: vec!["latte art reels".to_string()],
            summary: "Lean into craft.".to_string(),
        }
    }

    fn drafts_json(days: &[u32]) -> String {
        let items: Vec<String> = days
            .iter()
            .map(|day| {
                format!(
                    r#"{{"title": "Day {day} topic", "type": "Post", "content": "Body {day}", "day": {day}, "imagePrompt": "Scene {day}"}}"#
                )
            })
            .collect();
        format!("[{}]", items.join(","))
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn normalizes_drafts_into_posts() {
        let model = Arc::new(CannedModel::new(&drafts_json(&[1, 2, 3, 4, 5, 6, 7])));
        let generator = PlanGenerator::new(model, &RetryPolicies::default());

        let posts = generator
            .generate(
                "coffee shop",
                Period::Week,
                Tone::Friendly,
                Goal::Engagement,
                &analysis(),
                &[],
                start(),
            )
            .await
            .unwrap();

        assert_eq!(posts.len(), 7);
        assert_eq!(posts[0].day, 1);
        assert_eq!(posts[0].date, start());
        assert_eq!(
            posts[6].date,
            NaiveDate::from_ymd_opt(2025, 6, 7).unwrap()
        );
        assert!(posts.iter().all(|p| p.image_url.is_empty()));
        assert!(posts.iter().all(|p| p.edit_count == 0));
    }

    #[tokio::test]
    async fn posts_are_ordered_by_day() {
        let model = Arc::new(CannedModel::new(&drafts_json(&[3, 1, 2])));
        let generator = PlanGenerator::new(model, &RetryPolicies::default());

        let posts = generator
            .generate(
                "coffee shop",
                Period::Week,
                Tone::Friendly,
                Goal::Engagement,
                &analysis(),
                &[],
                start(),
            )
            .await
            .unwrap();

        let days: Vec<u32> = posts.iter().map(|p| p.day).collect();
        assert_eq!(days, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn duplicate_days_pass_through() {
        let model = Arc::new(CannedModel::new(&drafts_json(&[1, 2, 2])));
        let generator = PlanGenerator::new(model, &RetryPolicies::default());

        let posts = generator
            .generate(
                "coffee shop",
                Period::Week,
                Tone::Playful,
                Goal::Sales,
                &analysis(),
                &[],
                start(),
            )
            .await
            .unwrap();

        let days: Vec<u32> = posts.iter().map(|p| p.day).collect();
        assert_eq!(days, vec![1, 2, 2]);
    }

    #[tokio::test]
    async fn dedup_hint_is_embedded_verbatim() {
        let model = Arc::new(CannedModel::new(&drafts_json(&[1])));
        let generator = PlanGenerator::new(model.clone(), &RetryPolicies::default());

        generator
            .generate(
                "coffee shop",
                Period::Week,
                Tone::Friendly,
                Goal::Engagement,
                &analysis(),
                &["Latte art basics".to_string()],
                start(),
            )
            .await
            .unwrap();

        let requests = model.requests.lock().unwrap();
        assert!(requests[0].instruction.contains("Latte art basics"));
        assert!(requests[0].instruction.contains("do NOT repeat"));
    }

    #[tokio::test]
    async fn empty_hint_emits_no_exclusion_instruction() {
        let model = Arc::new(CannedModel::new(&drafts_json(&[1])));
        let generator = PlanGenerator::new(model.clone(), &RetryPolicies::default());

        generator
            .generate(
                "coffee shop",
                Period::Week,
                Tone::Friendly,
                Goal::Engagement,
                &analysis(),
                &[],
                start(),
            )
            .await
            .unwrap();

        let requests = model.requests.lock().unwrap();
        assert!(!requests[0].instruction.contains("do NOT repeat"));
    }

    #[tokio::test]
    async fn unparseable_response_is_fatal() {
        let model = Arc::new(CannedModel::new("I could not produce a plan today."));
        let generator = PlanGenerator::new(model, &RetryPolicies::default());

        let result = generator
            .generate(
                "coffee shop",
                Period::Week,
                Tone::Friendly,
                Goal::Engagement,
                &analysis(),
                &[],
                start(),
            )
            .await;
        assert!(result.is_err());
    }
}
