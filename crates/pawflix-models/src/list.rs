use crate::media::MediaType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four mutually exclusive user lists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ListName {
    Watched,
    Watching,
    Pending,
    Favourites,
}

impl ListName {
    /// Scan order used for status lookups.
    pub const ALL: [ListName; 4] = [
        ListName::Watched,
        ListName::Watching,
        ListName::Pending,
        ListName::Favourites,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListName::Watched => "watched",
            ListName::Watching => "watching",
            ListName::Pending => "pending",
            ListName::Favourites => "favourites",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListName::Watched => "Watched",
            ListName::Watching => "Watching",
            ListName::Pending => "Pending",
            ListName::Favourites => "Favourites",
        }
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListItem {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: String,
    pub media_type: MediaType,
    #[serde(default)]
    pub vote_average: f64,
}

/// The persisted list record. Serializes as an object with the four list
/// names as keys, each holding items in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Lists {
    #[serde(default)]
    pub watched: Vec<ListItem>,
    #[serde(default)]
    pub watching: Vec<ListItem>,
    #[serde(default)]
    pub pending: Vec<ListItem>,
    #[serde(default)]
    pub favourites: Vec<ListItem>,
}

impl Lists {
    pub fn get(&self, name: ListName) -> &[ListItem] {
        match name {
            ListName::Watched => &self.watched,
            ListName::Watching => &self.watching,
            ListName::Pending => &self.pending,
            ListName::Favourites => &self.favourites,
        }
    }

    pub fn get_mut(&mut self, name: ListName) -> &mut Vec<ListItem> {
        match name {
            ListName::Watched => &mut self.watched,
            ListName::Watching => &mut self.watching,
            ListName::Pending => &mut self.pending,
            ListName::Favourites => &mut self.favourites,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ListName, &[ListItem])> {
        ListName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }

    pub fn total_items(&self) -> usize {
        self.iter().map(|(_, items)| items.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_serialize_with_four_keys() {
        let lists = Lists::default();
        let json = serde_json::to_value(&lists).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        for name in ListName::ALL {
            assert!(json[name.as_str()].as_array().unwrap().is_empty());
        }
    }
}
