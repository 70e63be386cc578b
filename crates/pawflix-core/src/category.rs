use pawflix_models::{CatalogItem, DisplayCategory, MediaType, ANIMATION_GENRE_ID};

/// Card category from the item's own `media_type`.
pub fn derive_category(item: &CatalogItem) -> DisplayCategory {
    derive_category_with(item, None)
}

/// Like [`derive_category`], using `fallback` when the item carries no
/// `media_type` (discover and TV listings omit it).
pub fn derive_category_with(item: &CatalogItem, fallback: Option<MediaType>) -> DisplayCategory {
    let media_type = item
        .media_type
        .and_then(|kind| kind.media_type())
        .or(fallback);

    match media_type {
        Some(MediaType::Tv) if item.is_from("KR") => DisplayCategory::Drama,
        Some(MediaType::Tv) if item.is_from("JP") && item.genre_ids.contains(&ANIMATION_GENRE_ID) => {
            DisplayCategory::Anime
        }
        Some(MediaType::Tv) => DisplayCategory::TvShow,
        Some(MediaType::Movie) | None => DisplayCategory::Movie,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawflix_models::ResultKind;

    fn tv(countries: &[&str], genres: &[u32]) -> CatalogItem {
        CatalogItem {
            id: 1,
            name: Some("Show".to_string()),
            media_type: Some(ResultKind::Tv),
            origin_country: Some(countries.iter().map(|c| c.to_string()).collect()),
            genre_ids: genres.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn test_korean_tv_is_drama() {
        assert_eq!(derive_category(&tv(&["KR"], &[18])), DisplayCategory::Drama);
        // Korean animation still reads as drama
        assert_eq!(derive_category(&tv(&["KR"], &[16])), DisplayCategory::Drama);
    }

    #[test]
    fn test_japanese_animation_is_anime() {
        assert_eq!(derive_category(&tv(&["JP"], &[16, 10759])), DisplayCategory::Anime);
        assert_eq!(derive_category(&tv(&["JP"], &[18])), DisplayCategory::TvShow);
    }

    #[test]
    fn test_other_tv_is_tv_show() {
        assert_eq!(derive_category(&tv(&["US"], &[16])), DisplayCategory::TvShow);
        let mut no_country = tv(&[], &[]);
        no_country.origin_country = None;
        assert_eq!(derive_category(&no_country), DisplayCategory::TvShow);
    }

    #[test]
    fn test_movies_and_untyped_items() {
        let movie = CatalogItem {
            id: 550,
            title: Some("Fight Club".to_string()),
            media_type: Some(ResultKind::Movie),
            origin_country: Some(vec!["KR".to_string()]),
            ..Default::default()
        };
        assert_eq!(derive_category(&movie), DisplayCategory::Movie);

        let untyped = CatalogItem {
            id: 2,
            origin_country: Some(vec!["KR".to_string()]),
            ..Default::default()
        };
        assert_eq!(derive_category(&untyped), DisplayCategory::Movie);
        assert_eq!(
            derive_category_with(&untyped, Some(MediaType::Tv)),
            DisplayCategory::Drama
        );
    }
}
