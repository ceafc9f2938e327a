//! Plan command handler.

use crate::cli::PlanArgs;
use crate::settings::CalliopeConfig;
use calliope_core::{ContentPlan, ReferenceImage};
use calliope_error::{CalliopeResult, ConfigError, JsonError, PlanError, PlanErrorKind};
use calliope_history::HistoryStore;
use calliope_models::GeminiClient;
use calliope_pipeline::{PipelineRunner, PlanStateStore, RunParams};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Generate a content plan and wait for its images.
pub async fn run_plan(args: PlanArgs) -> CalliopeResult<()> {
    let config = CalliopeConfig::load()?;

    let client = Arc::new(
        GeminiClient::new()?
            .with_text_model(&config.models.text)
            .with_image_model(&config.models.image),
    );

    let store = Arc::new(PlanStateStore::new());
    let history = HistoryStore::at_default_path()?;
    let runner = PipelineRunner::new(
        client.clone(),
        client,
        config.retry,
        store.clone(),
        history,
        config.image.rpm,
        Duration::from_secs(config.image.throttle_secs),
    );

    let references = load_references(&args.reference)?;
    let params = RunParams {
        niche: args.niche.clone(),
        period: args.period,
        tone: args.tone,
        goal: args.goal,
        start_date: chrono::Local::now().date_naive(),
        web_search: args.search || config.analysis.web_search,
    };

    runner.run(params, references).await?;

    let plan = store
        .snapshot()
        .ok_or_else(|| PlanError::new(PlanErrorKind::NoPlan))?;
    info!(posts = plan.posts.len(), "Plan text ready, generating images");
    println!(
        "Plan for \"{}\": {} posts. Generating images, this takes a while...",
        plan.niche,
        plan.posts.len()
    );

    runner.wait_for_images().await;

    let plan = store
        .snapshot()
        .ok_or_else(|| PlanError::new(PlanErrorKind::NoPlan))?;
    if args.json {
        let rendered = serde_json::to_string_pretty(&plan)
            .map_err(|e| JsonError::new(format!("Failed to render plan: {}", e)))?;
        println!("{rendered}");
    } else {
        print_plan(&plan);
    }

    Ok(())
}

/// Read reference images from disk, inferring mime from the extension.
fn load_references(paths: &[std::path::PathBuf]) -> CalliopeResult<Vec<ReferenceImage>> {
    paths
        .iter()
        .map(|path| {
            let mime = mime_for(path)?;
            let bytes = std::fs::read(path).map_err(|e| {
                ConfigError::new(format!("Failed to read {}: {}", path.display(), e))
            })?;
            Ok(ReferenceImage::new(bytes, mime))
        })
        .collect()
}

fn mime_for(path: &Path) -> CalliopeResult<&'static str> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => Ok("image/png"),
        Some("jpg") | Some("jpeg") => Ok("image/jpeg"),
        Some("webp") => Ok("image/webp"),
        _ => Err(ConfigError::new(format!(
            "Unsupported reference image type: {}",
            path.display()
        ))
        .into()),
    }
}

fn print_plan(plan: &ContentPlan) {
    if let Some(analysis) = &plan.analysis {
        println!("\nStrategy: {}", analysis.summary);
        println!("Trends: {}", analysis.trends.join(", "));
    }
    for post in &plan.posts {
        println!("\n--- Day {} · {} · {} ---", post.day, post.date, post.post_type);
        println!("{}", post.title);
        println!("{}", post.content);
        if let Some(script) = &post.script {
            println!("Script: {script}");
        }
        let image = if post.image_url.len() > 64 {
            let head: String = post.image_url.chars().take(64).collect();
            format!("{head}... ({} chars)", post.image_url.len())
        } else {
            post.image_url.clone()
        };
        println!("Image: {image}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_follows_the_extension() {
        assert_eq!(mime_for(Path::new("ref.png")).unwrap(), "image/png");
        assert_eq!(mime_for(Path::new("ref.jpeg")).unwrap(), "image/jpeg");
        assert!(mime_for(Path::new("ref.gif")).is_err());
    }
}
