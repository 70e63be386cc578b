use super::prompts;
use super::ui;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use owo_colors::OwoColorize;
use pawflix_config::{Config, PathManager};
use serde_json::json;
use std::path::PathBuf;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    match cmd {
        ConfigCommands::Show { full } => show_config(&paths, full, output),
        ConfigCommands::Init { force } => init_config(&paths, force, output),
        ConfigCommands::SetTmdbKey { key } => {
            let key = prompts::value_or_prompt(key, "TMDB API key")?;
            set_key(&paths, output, "Catalog API key", |config| config.catalog.api_key = key)
        }
        ConfigCommands::SetIdentityKey { key } => {
            let key = prompts::value_or_prompt(key, "Identity provider API key")?;
            set_key(&paths, output, "Identity API key", |config| config.identity.api_key = key)
        }
    }
}

/// Config as stored on disk, without environment overrides, so that saving
/// never persists a key that came from the environment.
fn load_stored(path: &PathBuf) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    Config::load_from_file(path).map_err(|e| eyre!("Failed to load config from {}: {}", path.display(), e))
}

fn save(config: &Config, path: &PathBuf) -> Result<()> {
    config
        .validate()
        .map_err(|e| eyre!("Configuration is invalid: {}", e))?;
    config
        .save_to_file(path)
        .map_err(|e| eyre!("Failed to save config to {}: {}", path.display(), e))
}

fn set_key(paths: &PathManager, output: &Output, label: &str, apply: impl FnOnce(&mut Config)) -> Result<()> {
    let config_file = paths.config_file();
    let mut config = load_stored(&config_file)?;
    apply(&mut config);
    save(&config, &config_file)?;
    output.success(format!("{} saved to {}", label, config_file.display()));
    Ok(())
}

fn init_config(paths: &PathManager, force: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        output.warn(format!(
            "Configuration already exists at {} (use --force to overwrite)",
            config_file.display()
        ));
        return Ok(());
    }
    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;
    save(&Config::default(), &config_file)?;
    output.success(format!("Wrote default configuration to {}", config_file.display()));
    output.info("Next: pawflix config set-tmdb-key && pawflix config set-identity-key");
    Ok(())
}

fn show_config(paths: &PathManager, full: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Defaults are in effect. Run 'pawflix config init' to write them out.");
    }
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    let key = |value: &str| if full { value.to_string() } else { mask_string(value) };

    output.data(&json!({
        "config_file": config_file.display().to_string(),
        "data_dir": paths.data_dir().display().to_string(),
        "catalog": {
            "api_key": key(&config.catalog.api_key),
            "base_url": config.catalog.base_url,
            "image_base_url": config.catalog.image_base_url,
            "max_pages": config.catalog.max_pages,
            "timeout_secs": config.catalog.timeout_secs,
        },
        "identity": {
            "api_key": key(&config.identity.api_key),
            "base_url": config.identity.base_url,
            "token_url": config.identity.token_url,
        },
        "player": { "embed_base_url": config.player.embed_base_url },
        "feed": { "base_url": config.feed.base_url, "pages": config.feed.pages },
    }));

    if !output.is_human() || output.is_quiet() {
        return Ok(());
    }

    output.println(ui::header("Configuration"));
    let mut locations = ui::new_table();
    locations.add_row(vec![Cell::new("Config File").add_attribute(Attribute::Bold), Cell::new(config_file.display())]);
    locations.add_row(vec![Cell::new("Data Dir").add_attribute(Attribute::Bold), Cell::new(paths.data_dir().display())]);
    output.println(locations.to_string());

    let configured = |ok: bool| {
        if ok {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        }
    };

    let mut catalog = section_table("Catalog (TMDB)");
    catalog.add_row(vec![Cell::new("Configured"), Cell::new(configured(config.is_catalog_configured()))]);
    catalog.add_row(vec![Cell::new("API Key"), Cell::new(key(&config.catalog.api_key))]);
    catalog.add_row(vec![Cell::new("Base URL"), Cell::new(&config.catalog.base_url)]);
    catalog.add_row(vec![Cell::new("Images"), Cell::new(&config.catalog.image_base_url)]);
    catalog.add_row(vec![Cell::new("Max Pages"), Cell::new(config.catalog.max_pages)]);
    output.println(catalog.to_string());

    let mut identity = section_table("Identity Provider");
    identity.add_row(vec![Cell::new("Configured"), Cell::new(configured(config.is_identity_configured()))]);
    identity.add_row(vec![Cell::new("API Key"), Cell::new(key(&config.identity.api_key))]);
    identity.add_row(vec![Cell::new("Base URL"), Cell::new(&config.identity.base_url)]);
    output.println(identity.to_string());

    let mut other = section_table("Player & Feed");
    other.add_row(vec![Cell::new("Embed URL"), Cell::new(&config.player.embed_base_url)]);
    other.add_row(vec![Cell::new("Feed URL"), Cell::new(&config.feed.base_url)]);
    other.add_row(vec![Cell::new("Feed Pages"), Cell::new(config.feed.pages)]);
    output.println(other.to_string());
    Ok(())
}

fn section_table(title: &str) -> comfy_table::Table {
    let mut table = ui::new_table();
    table.set_header(vec![Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold)]);
    table
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s == "YOUR_API_KEY" {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("abcd"), "****");
        assert_eq!(mask_string("b7662c4f807bfab9"), "b7***b9");
    }
}
