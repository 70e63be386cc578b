use serde::{Deserialize, Serialize};
use std::fmt;

/// Label shown on a result card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DisplayCategory {
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
    Drama,
    Anime,
}

impl DisplayCategory {
    pub fn label(&self) -> &'static str {
        match self {
            DisplayCategory::Movie => "Movie",
            DisplayCategory::TvShow => "TV Show",
            DisplayCategory::Drama => "Drama",
            DisplayCategory::Anime => "Anime",
        }
    }
}

impl fmt::Display for DisplayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
