use super::context::AppContext;
use super::ui;
use crate::output::Output;
use crate::ToolsCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use pawflix_core::latest::{self, PAGE_LIMIT_CHECKPOINTS};
use serde_json::json;
use tracing::info;

/// Endpoints tried by `tools inspect` when none are given.
const DEFAULT_INSPECT_URLS: &[&str] = &[
    "https://vidsrc.xyz/movies/latest/page-1.json",
    "https://vidsrc.to/vapi/movie/new",
];

fn default_image_candidates(id: &str) -> Vec<String> {
    vec![
        format!("https://vidsrc.me/images/{}.jpg", id),
        format!("https://img.vidsrc.me/image/{}", id),
        format!("https://vidsrc.xyz/images/{}.jpg", id),
        format!("https://image.tmdb.org/t/p/w500/{}.jpg", id),
    ]
}

pub async fn run_tools(cmd: ToolsCommands, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    match cmd {
        ToolsCommands::ProbeLimit => probe_limit(&ctx, output).await,
        ToolsCommands::Inspect { urls } => inspect(&ctx, urls, output).await,
        ToolsCommands::FetchLatest { pages, out } => {
            let pages = pages.unwrap_or(ctx.config.feed.pages);
            let out = out.unwrap_or_else(|| ctx.paths.latest_movies_file());
            fetch_latest(&ctx, pages, &out, output).await
        }
        ToolsCommands::BackfillPosters { file } => {
            let file = file.unwrap_or_else(|| ctx.paths.latest_movies_file());
            backfill(&ctx, &file, output).await
        }
        ToolsCommands::ProbeImages { id, urls } => {
            let urls = if urls.is_empty() { default_image_candidates(&id) } else { urls };
            probe_images(&ctx, urls, output).await
        }
    }
}

async fn probe_limit(ctx: &AppContext, output: &Output) -> Result<()> {
    let feed = ctx.feed();
    output.info("Checking page limits...");

    let spinner = ui::spinner("Probing feed pages...");
    let report = latest::find_page_limit(&feed).await;
    spinner.finish_and_clear();

    output.data(&report);
    for page in &report.existing {
        output.println(format!("Page {} exists.", page));
    }
    for (page, exists) in &report.checkpoints {
        let state = if *exists {
            "Exists".green().to_string()
        } else {
            "Does not exist".red().to_string()
        };
        output.println(format!("Page {}: {}", page, state));
    }
    match report.deepest() {
        Some(page) => output.success(format!(
            "Deepest page found by doubling: {} (checked {:?})",
            page, PAGE_LIMIT_CHECKPOINTS
        )),
        None => output.warn("The feed did not serve page 1"),
    }
    Ok(())
}

async fn inspect(ctx: &AppContext, urls: Vec<String>, output: &Output) -> Result<()> {
    let urls = if urls.is_empty() {
        DEFAULT_INSPECT_URLS.iter().map(|u| u.to_string()).collect()
    } else {
        urls
    };

    match latest::inspect_endpoints(&ctx.feed(), &urls).await {
        Some(report) => {
            output.data(&report);
            output.success(format!("Success from {}", report.url));
            output.println(format!("Keys: {}", report.keys.join(", ")));
            if let Some(sample) = &report.sample {
                output.println(format!(
                    "Sample: {}",
                    serde_json::to_string_pretty(sample).unwrap_or_default()
                ));
            }
        }
        None => output.error("All endpoints failed."),
    }
    Ok(())
}

async fn fetch_latest(ctx: &AppContext, pages: u32, out: &std::path::Path, output: &Output) -> Result<()> {
    let feed = ctx.feed();
    output.info(format!("Fetching {} pages of movies...", pages));

    let pb = ui::progress_bar(u64::from(pages), "Fetching pages");
    let movies = latest::bake_latest(&feed, pages, |page, outcome| {
        pb.inc(1);
        match outcome {
            Ok(count) => info!(page, count, "Fetched feed page"),
            Err(e) => pb.println(format!("Error fetching page {}: {}", page, e)),
        }
    })
    .await;
    pb.finish_and_clear();

    latest::write_baked(out, &movies).map_err(|e| eyre!("{}", e))?;
    output.data(&json!({ "count": movies.len(), "file": out.display().to_string() }));
    output.success(format!("Saved {} movies to {}", movies.len(), out.display()));
    Ok(())
}

async fn backfill(ctx: &AppContext, file: &std::path::Path, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let mut movies = latest::read_baked(file).map_err(|e| eyre!("{}", e))?;
    let candidates = movies.iter().filter(|m| m.id.starts_with("tt")).count();
    output.info(format!(
        "Found {} movies ({} with IMDb ids). Updating images...",
        movies.len(),
        candidates
    ));

    let pb = ui::progress_bar(candidates as u64, "Looking up posters");
    let updated = latest::backfill_posters(&catalog, &ctx.images(), &mut movies, |found| {
        pb.inc(1);
        if !found {
            pb.set_message("Looking up posters (some missing)");
        }
    })
    .await;
    pb.finish_and_clear();

    latest::write_baked(file, &movies).map_err(|e| eyre!("{}", e))?;
    output.data(&json!({ "updated": updated, "total": movies.len() }));
    output.success(format!("Updated {} images.", updated));
    Ok(())
}

async fn probe_images(ctx: &AppContext, urls: Vec<String>, output: &Output) -> Result<()> {
    let found = latest::probe_image_urls(&ctx.feed(), &urls).await;
    output.data(&json!({ "tried": urls, "found": found }));
    match found {
        Some(url) => output.success(format!("FOUND! {}", url)),
        None => output.warn("No working image URL found."),
    }
    Ok(())
}
