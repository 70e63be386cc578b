use super::context::AppContext;
use super::ui;
use crate::output::Output;
use color_eyre::Result;
use pawflix_core::{browse_movies, fetch_listing, home_trending, trending, Card, ImageUrls, Listing, HOME_TRENDING_LIMIT};
use pawflix_models::{CatalogItem, MediaType, GENRES};
use serde_json::json;
use tracing::warn;

fn to_cards(items: &[CatalogItem], fallback: MediaType, images: &ImageUrls) -> Vec<Card> {
    items.iter().map(|item| Card::from_item(item, fallback, images)).collect()
}

fn print_cards(title: &str, cards: &[Card], empty_message: &str, output: &Output) {
    output.println(ui::header(title));
    if cards.is_empty() {
        output.info(empty_message);
    } else {
        output.println(ui::card_table(cards).to_string());
    }
}

pub async fn run_home(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let catalog = ctx.catalog()?;

    let spinner = ui::spinner("Loading trending movies...");
    let result = home_trending(&catalog, HOME_TRENDING_LIMIT).await;
    spinner.finish_and_clear();

    let items = result.unwrap_or_else(|e| {
        warn!("Failed to load trending movies: {}", e);
        Vec::new()
    });
    let cards = to_cards(&items, MediaType::Movie, &ctx.images());

    output.data(&json!({ "section": "trending", "results": cards }));
    print_cards("Trending Now", &cards, "Nothing is trending right now", output);
    Ok(())
}

pub async fn run_trending(today: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let catalog = ctx.catalog()?;

    let items = trending(&catalog, today).await.unwrap_or_else(|e| {
        warn!("Failed to load trending movies: {}", e);
        Vec::new()
    });
    let cards = to_cards(&items, MediaType::Movie, &ctx.images());
    let title = if today { "Trending Today" } else { "Trending This Week" };

    output.data(&json!({ "section": title, "results": cards }));
    print_cards(title, &cards, "Nothing is trending right now", output);
    Ok(())
}

pub async fn run_movies(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let catalog = ctx.catalog()?;
    let images = ctx.images();

    let spinner = ui::spinner("Loading movies...");
    let sections = browse_movies(&catalog).await;
    spinner.finish_and_clear();

    let popular = to_cards(&sections.popular, MediaType::Movie, &images);
    let top_rated = to_cards(&sections.top_rated, MediaType::Movie, &images);
    let upcoming = to_cards(&sections.upcoming, MediaType::Movie, &images);

    output.data(&json!({
        "popular": popular,
        "top_rated": top_rated,
        "upcoming": upcoming,
    }));
    print_cards("Popular Movies", &popular, "Could not load popular movies", output);
    print_cards("Top Rated Movies", &top_rated, "Could not load top rated movies", output);
    print_cards("Upcoming Movies", &upcoming, "Could not load upcoming movies", output);
    Ok(())
}

pub async fn run_listing(listing: Listing, page: u32, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let catalog = ctx.catalog()?;

    let spinner = ui::spinner(format!("Loading {}...", listing.title()));
    let result = fetch_listing(&catalog, &listing, page, ctx.max_pages()).await;
    spinner.finish_and_clear();

    let page = match result {
        Ok(page) => page,
        Err(e) => {
            warn!("Failed to load {}: {}", listing.title(), e);
            output.error(format!("Could not load {}", listing.title()));
            return Ok(());
        }
    };

    let cards = to_cards(&page.results, listing.media_type(), &ctx.images());
    output.data(&json!({
        "title": listing.title(),
        "page": page.page,
        "total_pages": page.total_pages,
        "total_results": page.total_results,
        "results": cards,
    }));

    let empty = match &listing {
        Listing::Search { query, .. } => format!("No results found for \"{}\"", query),
        _ => "No results found".to_string(),
    };
    print_cards(&listing.title(), &cards, &empty, output);
    if !cards.is_empty() {
        output.println(format!("Page {} of {}", page.page, page.total_pages));
    }
    Ok(())
}

pub async fn run_genres(genre: Option<u32>, page: u32, output: &Output) -> Result<()> {
    match genre {
        Some(id) => run_listing(Listing::Genre(id), page, output).await,
        None => {
            let genres: Vec<_> = GENRES
                .iter()
                .map(|(id, name)| json!({ "id": id, "name": name }))
                .collect();
            output.data(&genres);

            let mut table = ui::new_table();
            table.set_header(vec!["ID", "Genre"]);
            for (id, name) in GENRES {
                table.add_row(vec![id.to_string(), name.to_string()]);
            }
            output.println(ui::header("Genres"));
            output.println(table.to_string());
            output.println("Use 'pawflix genres --genre <ID>' to browse a genre");
            Ok(())
        }
    }
}

pub async fn run_search(query: String, multi: bool, page: u32, output: &Output) -> Result<()> {
    if query.trim().is_empty() {
        output.warn("Enter something to search for");
        return Ok(());
    }
    run_listing(Listing::Search { query, multi }, page, output).await
}
