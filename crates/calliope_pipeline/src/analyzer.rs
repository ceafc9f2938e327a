//! Niche market analysis stage.

use crate::extraction::{extract_json, parse_json};
use calliope_core::{AnalysisData, Goal};
use calliope_error::CalliopeResult;
use calliope_models::{TextModel, TextRequest};
use calliope_rate_limit::{CallClass, RetryPolicies, RetryingInvoker};
use std::sync::Arc;
use tracing::info;

/// Produces a structured market analysis from a niche and goal.
///
/// Issues exactly one structured-output request per run. A response that
/// is empty or fails shape validation is fatal to the run and propagates
/// to the caller; only rate-limit errors are retried, inside the
/// invoker's budget.
pub struct NicheAnalyzer<M> {
    model: Arc<M>,
    invoker: RetryingInvoker,
    web_search: bool,
}

impl<M: TextModel> NicheAnalyzer<M> {
    /// Create an analyzer.
    ///
    /// When `web_search` is on, the request instructs the model to
    /// ground competitor and trend findings with live search, and the
    /// larger search-class retry budget applies.
    pub fn new(model: Arc<M>, policies: &RetryPolicies, web_search: bool) -> Self {
        let class = if web_search {
            CallClass::Search
        } else {
            CallClass::Text
        };
        Self {
            model,
            invoker: RetryingInvoker::new(policies.for_class(class)),
            web_search,
        }
    }

    /// Run the analysis stage.
    pub async fn analyze(&self, niche: &str, goal: Goal) -> CalliopeResult<AnalysisData> {
        info!(niche, %goal, "Running niche analysis");

        let mut request = TextRequest::new(Self::instruction(niche, goal)).with_json();
        if self.web_search {
            request = request.with_search();
        }

        let text = self.invoker.invoke(|| self.model.generate(&request)).await?;

        let json = extract_json(&text)?;
        let analysis: AnalysisData = parse_json(&json)?;

        info!(
            competitors = analysis.competitors.len(),
            trends = analysis.trends.len(),
            "Niche analysis complete"
        );
        Ok(analysis)
    }

    fn instruction(niche: &str, goal: Goal) -> String {
        format!(
            "You are a social media marketing analyst. Analyze the \"{niche}\" niche \
             for an account whose primary goal is {goal}.\n\
             Respond with ONLY a valid JSON object with exactly these fields:\n\
             - \"competitors\": an array of 3-5 short descriptions of strong accounts in this niche\n\
             - \"trends\": an array of 3-5 current content trends in this niche\n\
             - \"summary\": a short content strategy summary (2-3 sentences)\n\
             Do not include any other fields or any text outside the JSON object."
        )
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

    #[tokio::test]
    async fn parses_well_shaped_analysis() {
        let model = Arc::new(CannedModel::new(
            r#"{"competitors": ["Blue Bottle"], "trends": ["latte art reels"], "summary": "Lean into craft."}"#,
        ));
        let analyzer = NicheAnalyzer::new(model, &RetryPolicies::default(), false);

        let analysis = analyzer.analyze("coffee shop", Goal::Engagement).await.unwrap();
        assert_eq!(analysis.competitors, vec!["Blue Bottle"]);
        assert_eq!(analysis.summary, "Lean into craft.");
    }

    #[tokio::test]
    async fn shape_mismatch_is_fatal() {
        let model = Arc::new(CannedModel::new(r#"{"competitors": "not an array"}"#));
        let analyzer = NicheAnalyzer::new(model, &RetryPolicies::default(), false);

        assert!(analyzer.analyze("coffee shop", Goal::Sales).await.is_err());
    }

    #[tokio::test]
    async fn search_flag_reaches_the_request() {
        let model = Arc::new(CannedModel::new(
            r#"{"competitors": [], "trends": [], "summary": "ok"}"#,
        ));
        let analyzer = NicheAnalyzer::new(model.clone(), &RetryPolicies::default(), true);

        analyzer.analyze("coffee shop", Goal::Awareness).await.unwrap();

        let requests = model.requests.lock().unwrap();
        assert!(requests[0].web_search);
        assert!(requests[0].json_response);
    }
}
