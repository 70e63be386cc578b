use super::context::AppContext;
use super::ui;
use crate::output::Output;
use color_eyre::Result;
use comfy_table::Cell;
use owo_colors::OwoColorize;
use pawflix_core::{load_details, rating_label, Card, Details, ImageUrls, Player};
use pawflix_models::{Genre, MediaType, MovieDetails, SeasonDetails, TvDetails};
use pawflix_sources::CatalogError;
use serde_json::json;
use tracing::warn;

const CAST_LIMIT: usize = 10;
const SIMILAR_LIMIT: usize = 8;

fn media_type(tv: bool) -> MediaType {
    if tv {
        MediaType::Tv
    } else {
        MediaType::Movie
    }
}

fn genre_names(genres: &[Genre]) -> String {
    genres.iter().map(|g| g.name.as_str()).collect::<Vec<_>>().join(", ")
}

fn year_of(date: Option<&str>) -> String {
    date.and_then(|d| d.get(..4)).unwrap_or("----").to_string()
}

pub async fn run_details(id: u64, tv: bool, season: Option<u32>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let catalog = ctx.catalog()?;
    let media = media_type(tv);

    let spinner = ui::spinner("Loading details...");
    let result = load_details(&catalog, media, id, season).await;
    spinner.finish_and_clear();

    let details = match result {
        Ok(details) => details,
        Err(CatalogError::NotFound) => {
            output.error("Content not found");
            return Ok(());
        }
        Err(e) => {
            warn!("Failed to load details for {}: {}", id, e);
            output.error("Content not found");
            return Ok(());
        }
    };

    let status = ctx.list_store().check_list_status(id);
    let player = ctx.player();
    let images = ctx.images();
    let play_url = match &details {
        Details::Movie(_) => player.embed_url(MediaType::Movie, id, None, None),
        Details::Tv { season: selected, .. } => {
            let number = selected.as_ref().map(|s| s.season_number).or(season);
            player.embed_url(MediaType::Tv, id, number, None)
        }
    };

    output.data(&json!({
        "details": details,
        "list": status,
        "play_url": play_url,
    }));

    if output.is_human() && !output.is_quiet() {
        match &details {
            Details::Movie(movie) => print_movie(movie, &images, output),
            Details::Tv { show, season } => print_show(show, season.as_ref(), &images, output),
        }
        if let Some(list) = status {
            output.println(format!("In your list: {}", list.label().green()));
        }
        output.println(format!("{} {}", "▶ Play:".bold(), play_url));
    }
    Ok(())
}

fn print_movie(movie: &MovieDetails, images: &ImageUrls, output: &Output) {
    output.println(ui::header(&format!("{} ({})", movie.title, year_of(movie.release_date.as_deref()))));
    if let Some(tagline) = movie.tagline.as_deref().filter(|t| !t.is_empty()) {
        output.println(tagline.italic().to_string());
    }

    let mut facts = ui::new_table();
    facts.add_row(vec![Cell::new("Rating"), Cell::new(rating_label(movie.vote_average))]);
    if let Some(runtime) = movie.runtime.filter(|r| *r > 0) {
        facts.add_row(vec![Cell::new("Runtime"), Cell::new(format!("{}h {}m", runtime / 60, runtime % 60))]);
    }
    facts.add_row(vec![Cell::new("Genres"), Cell::new(genre_names(&movie.genres))]);
    facts.add_row(vec![Cell::new("Poster"), Cell::new(images.url(movie.poster_path.as_deref(), "original"))]);
    if let Some(trailer) = movie.trailer() {
        facts.add_row(vec![
            Cell::new("Trailer"),
            Cell::new(format!("https://www.youtube.com/watch?v={}", trailer.key)),
        ]);
    }
    output.println(facts.to_string());

    if !movie.overview.is_empty() {
        output.println(&movie.overview);
    }

    if let Some(credits) = movie.credits.as_ref().filter(|c| !c.cast.is_empty()) {
        let cast = credits
            .cast
            .iter()
            .take(CAST_LIMIT)
            .map(|member| match member.character.as_deref().filter(|c| !c.is_empty()) {
                Some(character) => format!("{} as {}", member.name, character),
                None => member.name.clone(),
            })
            .collect::<Vec<_>>();
        output.println(ui::header("Cast"));
        output.println(cast.join("\n"));
    }

    if let Some(similar) = movie.similar.as_ref().filter(|p| !p.results.is_empty()) {
        let cards: Vec<Card> = similar
            .results
            .iter()
            .filter(|item| item.has_poster())
            .take(SIMILAR_LIMIT)
            .map(|item| Card::from_item(item, MediaType::Movie, images))
            .collect();
        output.println(ui::header("More Like This"));
        output.println(ui::card_table(&cards).to_string());
    }
}

fn print_show(show: &TvDetails, season: Option<&SeasonDetails>, images: &ImageUrls, output: &Output) {
    output.println(ui::header(&format!("{} ({})", show.name, year_of(show.first_air_date.as_deref()))));

    let mut facts = ui::new_table();
    facts.add_row(vec![Cell::new("Rating"), Cell::new(rating_label(show.vote_average))]);
    if let Some(seasons) = show.number_of_seasons {
        facts.add_row(vec![Cell::new("Seasons"), Cell::new(seasons)]);
    }
    facts.add_row(vec![Cell::new("Genres"), Cell::new(genre_names(&show.genres))]);
    facts.add_row(vec![Cell::new("Poster"), Cell::new(images.url(show.poster_path.as_deref(), "original"))]);
    output.println(facts.to_string());

    if !show.overview.is_empty() {
        output.println(&show.overview);
    }

    let mut seasons = ui::new_table();
    seasons.set_header(vec!["Season", "Name", "Episodes"]);
    for summary in show.seasons.iter().filter(|s| s.season_number > 0) {
        seasons.add_row(vec![
            summary.season_number.to_string(),
            summary.name.clone(),
            summary.episode_count.to_string(),
        ]);
    }
    output.println(seasons.to_string());

    match season {
        Some(season) => {
            output.println(ui::header(&season.name));
            let mut episodes = ui::new_table();
            episodes.set_header(vec!["#", "Episode"]);
            for episode in &season.episodes {
                episodes.add_row(vec![episode.episode_number.to_string(), episode.name.clone()]);
            }
            output.println(episodes.to_string());
        }
        None => output.warn("Episodes for this season could not be loaded"),
    }
}

/// Prints the player URL. No catalog request is needed.
pub fn run_play(id: u64, tv: bool, season: Option<u32>, episode: Option<u32>, output: &Output) -> Result<()> {
    let player = match AppContext::load() {
        Ok(ctx) => ctx.player(),
        Err(e) => {
            warn!("Using the default player: {}", e);
            Player::default()
        }
    };
    let media = media_type(tv);
    let url = player.embed_url(media, id, season, episode);

    output.data(&json!({
        "id": id,
        "media_type": media,
        "url": url,
    }));
    output.println(url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_of() {
        assert_eq!(year_of(Some("1999-10-15")), "1999");
        assert_eq!(year_of(None), "----");
    }

    #[test]
    fn test_genre_names() {
        let genres = vec![
            Genre { id: 18, name: "Drama".to_string() },
            Genre { id: 53, name: "Thriller".to_string() },
        ];
        assert_eq!(genre_names(&genres), "Drama, Thriller");
    }
}
