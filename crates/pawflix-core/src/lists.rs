use crate::storage::KeyValueStore;
use anyhow::Result;
use pawflix_models::{ListItem, ListName, Lists};
use tracing::{debug, info, warn};

/// Storage key holding the serialized list record.
pub const LISTS_STORAGE_KEY: &str = "userLists";

/// The four disjoint user lists, persisted through a [`KeyValueStore`]
/// after every mutation.
pub struct ListStore<S: KeyValueStore> {
    storage: S,
    lists: Lists,
}

impl<S: KeyValueStore> ListStore<S> {
    /// Read the stored record, falling back to four empty lists when the
    /// key is absent or its value does not parse.
    pub fn load(storage: S) -> Self {
        let lists = match storage.get(LISTS_STORAGE_KEY) {
            Some(raw) => match serde_json::from_str::<Lists>(&raw) {
                Ok(lists) => {
                    debug!("Loaded {} list items from storage", lists.total_items());
                    lists
                }
                Err(e) => {
                    warn!("Stored lists are malformed ({}), starting with empty lists", e);
                    Lists::default()
                }
            },
            None => {
                debug!("No stored lists, starting empty");
                Lists::default()
            }
        };

        Self { storage, lists }
    }

    pub fn lists(&self) -> &Lists {
        &self.lists
    }

    pub fn list(&self, name: ListName) -> &[ListItem] {
        self.lists.get(name)
    }

    pub fn len(&self) -> usize {
        self.lists.total_items()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move `item` into `name`. Any entry with the same id is removed from
    /// every list first, so an id lives in at most one list.
    pub fn add_to_list(&mut self, item: ListItem, name: ListName) -> Result<()> {
        for list in ListName::ALL {
            self.lists.get_mut(list).retain(|existing| existing.id != item.id);
        }
        info!("Adding {} ({}) to {}", item.title, item.id, name);
        self.lists.get_mut(name).push(item);
        self.persist()
    }

    /// Remove `id` from `name` only. Absent ids are a no-op.
    pub fn remove_from_list(&mut self, id: u64, name: ListName) -> Result<()> {
        let list = self.lists.get_mut(name);
        let before = list.len();
        list.retain(|existing| existing.id != id);
        if list.len() != before {
            info!("Removed {} from {}", id, name);
        }
        self.persist()
    }

    /// The list holding `id`, scanning watched, watching, pending, favourites.
    pub fn check_list_status(&self, id: u64) -> Option<ListName> {
        self.lists
            .iter()
            .find(|(_, items)| items.iter().any(|item| item.id == id))
            .map(|(name, _)| name)
    }

    /// Drop every list and the stored record.
    pub fn clear(&mut self) -> Result<()> {
        self.lists = Lists::default();
        self.storage.remove(LISTS_STORAGE_KEY)?;
        info!("Cleared all lists");
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.lists)?;
        self.storage.set(LISTS_STORAGE_KEY, json)
    }
}
