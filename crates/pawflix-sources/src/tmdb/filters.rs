use pawflix_models::{CatalogItem, CatalogPage};

/// Listings only show titles that have artwork.
pub fn with_posters(page: CatalogPage) -> CatalogPage {
    page.retain(CatalogItem::has_poster)
}

pub fn with_posters_vec(items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    items.into_iter().filter(CatalogItem::has_poster).collect()
}

/// Mixed search keeps movies and TV with artwork, drops people.
pub fn movies_and_tv(page: CatalogPage) -> CatalogPage {
    page.retain(|item| {
        item.has_poster()
            && item
                .media_type
                .and_then(|kind| kind.media_type())
                .is_some()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawflix_models::ResultKind;

    fn item(id: u64, poster: Option<&str>, kind: Option<ResultKind>) -> CatalogItem {
        CatalogItem {
            id,
            poster_path: poster.map(str::to_string),
            media_type: kind,
            ..Default::default()
        }
    }

    #[test]
    fn test_with_posters_drops_missing_and_empty() {
        let page = CatalogPage {
            page: 1,
            results: vec![item(1, Some("/a.jpg"), None), item(2, None, None), item(3, Some(""), None)],
            total_pages: 3,
            total_results: 60,
        };
        let filtered = with_posters(page);
        assert_eq!(filtered.results.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(filtered.total_results, 60);
    }

    #[test]
    fn test_movies_and_tv_drops_people() {
        let page = CatalogPage {
            page: 1,
            results: vec![
                item(1, Some("/a.jpg"), Some(ResultKind::Movie)),
                item(2, Some("/b.jpg"), Some(ResultKind::Tv)),
                item(3, Some("/c.jpg"), Some(ResultKind::Person)),
                item(4, None, Some(ResultKind::Tv)),
                item(5, Some("/e.jpg"), None),
            ],
            total_pages: 1,
            total_results: 5,
        };
        let filtered = movies_and_tv(page);
        assert_eq!(filtered.results.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2]);
    }
}
