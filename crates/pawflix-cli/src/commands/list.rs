use super::context::AppContext;
use super::ui;
use crate::output::Output;
use crate::ListCommands;
use clap::ValueEnum;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Color};
use pawflix_core::rating_label;
use pawflix_models::{ListItem, ListName, MediaType};
use pawflix_sources::{Catalog, CatalogError};
use serde_json::json;

/// List name as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListArg {
    Watched,
    Watching,
    Pending,
    #[value(alias = "favorites")]
    Favourites,
}

impl From<ListArg> for ListName {
    fn from(arg: ListArg) -> Self {
        match arg {
            ListArg::Watched => ListName::Watched,
            ListArg::Watching => ListName::Watching,
            ListArg::Pending => ListName::Pending,
            ListArg::Favourites => ListName::Favourites,
        }
    }
}

fn require_login(ctx: &AppContext, output: &Output) -> Result<bool> {
    if ctx.sessions()?.has_session() {
        return Ok(true);
    }
    output.warn("Sign in to manage your lists: pawflix account login");
    Ok(false)
}

pub async fn run_list(cmd: ListCommands, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    match cmd {
        ListCommands::Show { name } => {
            show_lists(&ctx, name.map(ListName::from), output)
        }
        ListCommands::Add { id, name, tv } => {
            let name = ListName::from(name);
            if !require_login(&ctx, output)? {
                return Ok(());
            }
            let media = if tv { MediaType::Tv } else { MediaType::Movie };
            let catalog = ctx.catalog()?;
            let item = match list_item(&catalog, id, media).await {
                Ok(item) => item,
                Err(CatalogError::NotFound) => {
                    output.error("Content not found");
                    return Ok(());
                }
                Err(e) => return Err(eyre!("Failed to look up {}: {}", id, e)),
            };

            let title = item.title.clone();
            let mut store = ctx.list_store();
            store
                .add_to_list(item, name)
                .map_err(|e| eyre!("Failed to save lists: {}", e))?;
            output.data(&json!({ "id": id, "list": name }));
            output.success(format!("Added {} to {}", title, name.label()));
            Ok(())
        }
        ListCommands::Remove { id, name } => {
            let name = ListName::from(name);
            if !require_login(&ctx, output)? {
                return Ok(());
            }
            let mut store = ctx.list_store();
            if store.check_list_status(id) != Some(name) {
                output.warn(format!("{} is not in {}", id, name.label()));
                return Ok(());
            }
            store
                .remove_from_list(id, name)
                .map_err(|e| eyre!("Failed to save lists: {}", e))?;
            output.data(&json!({ "id": id, "removed_from": name }));
            output.success(format!("Removed {} from {}", id, name.label()));
            Ok(())
        }
        ListCommands::Status { id } => {
            let status = ctx.list_store().check_list_status(id);
            output.data(&json!({ "id": id, "list": status }));
            match status {
                Some(name) => output.info(format!("{} is in {}", id, name.label())),
                None => output.info(format!("{} is not in any list", id)),
            }
            Ok(())
        }
    }
}

async fn list_item(catalog: &dyn Catalog, id: u64, media: MediaType) -> Result<ListItem, CatalogError> {
    let item = match media {
        MediaType::Movie => {
            let movie = catalog.movie_details(id).await?;
            ListItem {
                id,
                title: movie.title,
                poster_path: movie.poster_path.unwrap_or_default(),
                media_type: media,
                vote_average: movie.vote_average,
            }
        }
        MediaType::Tv => {
            let show = catalog.tv_details(id).await?;
            ListItem {
                id,
                title: show.name,
                poster_path: show.poster_path.unwrap_or_default(),
                media_type: media,
                vote_average: show.vote_average,
            }
        }
    };
    Ok(item)
}

fn show_lists(ctx: &AppContext, name: Option<ListName>, output: &Output) -> Result<()> {
    let store = ctx.list_store();
    let names: Vec<ListName> = match name {
        Some(name) => vec![name],
        None => ListName::ALL.to_vec(),
    };

    if name.is_some() {
        output.data(&json!({ "list": name, "items": store.list(names[0]) }));
    } else {
        output.data(store.lists());
    }

    for list in names {
        let items = store.list(list);
        output.println(ui::header(&format!("{} ({})", list.label(), items.len())));
        if items.is_empty() {
            output.println("  Nothing here yet");
            continue;
        }
        let mut table = ui::new_table();
        table.set_header(vec!["ID", "Title", "Type", "Rating"]);
        for item in items {
            table.add_row(vec![
                Cell::new(item.id),
                Cell::new(&item.title),
                Cell::new(item.media_type.as_str()).fg(Color::Cyan),
                Cell::new(rating_label(item.vote_average)),
            ]);
        }
        output.println(table.to_string());
    }
    Ok(())
}
