use clap::{ArgAction, Parser, Subcommand};
use commands::{account, catalog, config, details, list, tools};
use pawflix_config::{Config, PathManager};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "pawflix")]
#[command(about = "Pawflix - discover movies and shows, keep your lists, press play")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trending this week
    Home,
    /// Trending movies
    Trending {
        /// Today's trending instead of this week's
        #[arg(long, action = ArgAction::SetTrue)]
        today: bool,
    },
    /// Popular, top rated and upcoming movies side by side
    Movies,
    /// Popular movies
    Popular {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Top rated movies
    TopRated {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Upcoming movies
    Upcoming {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Popular TV series
    WebSeries {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Korean dramas
    Dramas {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Japanese animation
    Anime {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Browse movies by genre
    #[command(long_about = "Without --genre, lists the available genres. With --genre, shows popular movies of that genre.")]
    Genres {
        /// Genre id (see `pawflix genres`)
        #[arg(long)]
        genre: Option<u32>,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search the catalog
    Search {
        query: String,

        /// Include TV shows (people are never included)
        #[arg(long, action = ArgAction::SetTrue)]
        multi: bool,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show details of a movie or TV show
    Details {
        id: u64,

        /// Treat the id as a TV show
        #[arg(long, action = ArgAction::SetTrue)]
        tv: bool,

        /// Season to list episodes for (TV only)
        #[arg(long)]
        season: Option<u32>,
    },
    /// Print the embeddable player URL
    Play {
        id: u64,

        #[arg(long, action = ArgAction::SetTrue)]
        tv: bool,

        #[arg(long)]
        season: Option<u32>,

        #[arg(long)]
        episode: Option<u32>,
    },
    /// Manage your watched, watching, pending and favourites lists
    List {
        #[command(subcommand)]
        cmd: ListCommands,
    },
    /// Sign up, sign in and manage your profile
    Account {
        #[command(subcommand)]
        cmd: AccountCommands,
    },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Maintenance tools for the latest-movies feed
    Tools {
        #[command(subcommand)]
        cmd: ToolsCommands,
    },
}

#[derive(Subcommand)]
pub enum ListCommands {
    /// Show one list, or all four
    Show {
        #[arg(value_enum)]
        name: Option<list::ListArg>,
    },
    /// Add a title to a list (moving it out of any other list)
    Add {
        id: u64,

        #[arg(value_enum)]
        name: list::ListArg,

        #[arg(long, action = ArgAction::SetTrue)]
        tv: bool,
    },
    /// Remove a title from a list
    Remove {
        id: u64,

        #[arg(value_enum)]
        name: list::ListArg,
    },
    /// Which list a title is in
    Status { id: u64 },
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create an account (a verification email is sent)
    Register {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Update name, username or bio
    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        bio: Option<String>,
    },
    /// Resend the verification email
    #[command(long_about = "Resend the verification email. When signed out, --email prompts for the password of an account that has not been verified yet.")]
    Verify {
        #[arg(long)]
        email: Option<String>,
    },
    /// Permanently delete the account and local lists
    Delete {
        /// Skip the confirmation prompt
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks API keys)
    Show {
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Set the catalog (TMDB) API key
    SetTmdbKey {
        /// API key (if not provided, will prompt)
        key: Option<String>,
    },
    /// Set the identity provider API key
    SetIdentityKey {
        key: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ToolsCommands {
    /// Find how many pages the latest-movies feed serves
    ProbeLimit,
    /// Describe the first reachable feed endpoint
    Inspect {
        /// Endpoints to try in order
        urls: Vec<String>,
    },
    /// Bake feed pages into a local movie file
    FetchLatest {
        /// Pages to fetch (default from config)
        #[arg(long)]
        pages: Option<u32>,

        /// Output file (default: <data dir>/latest_movies.json)
        #[arg(long)]
        out: Option<std::path::PathBuf>,
    },
    /// Replace placeholder images in the baked file with catalog posters
    BackfillPosters {
        #[arg(long)]
        file: Option<std::path::PathBuf>,
    },
    /// HEAD-probe candidate image URLs
    ProbeImages {
        /// Catalog id used to build the default candidates
        #[arg(long, default_value = "1295179")]
        id: String,

        /// Explicit URLs to probe instead of the defaults
        urls: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let paths = PathManager::default();
    let logging_config = Config::load_or_default(&paths.config_file())
        .ok()
        .and_then(|c| c.logging)
        .unwrap_or_default();
    logging::init_logging(cli.verbose, cli.quiet, &logging_config.level, logging_config.file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Home => catalog::run_home(&output).await,
        Commands::Trending { today } => catalog::run_trending(today, &output).await,
        Commands::Movies => catalog::run_movies(&output).await,
        Commands::Popular { page } => catalog::run_listing(pawflix_core::Listing::Popular, page, &output).await,
        Commands::TopRated { page } => catalog::run_listing(pawflix_core::Listing::TopRated, page, &output).await,
        Commands::Upcoming { page } => catalog::run_listing(pawflix_core::Listing::Upcoming, page, &output).await,
        Commands::WebSeries { page } => catalog::run_listing(pawflix_core::Listing::WebSeries, page, &output).await,
        Commands::Dramas { page } => catalog::run_listing(pawflix_core::Listing::Dramas, page, &output).await,
        Commands::Anime { page } => catalog::run_listing(pawflix_core::Listing::Anime, page, &output).await,
        Commands::Genres { genre, page } => catalog::run_genres(genre, page, &output).await,
        Commands::Search { query, multi, page } => catalog::run_search(query, multi, page, &output).await,
        Commands::Details { id, tv, season } => details::run_details(id, tv, season, &output).await,
        Commands::Play { id, tv, season, episode } => details::run_play(id, tv, season, episode, &output),
        Commands::List { cmd } => list::run_list(cmd, &output).await,
        Commands::Account { cmd } => account::run_account(cmd, &output).await,
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, &output)
        }
        Commands::Tools { cmd } => tools::run_tools(cmd, &output).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use list::ListArg;

    #[test]
    fn test_list_names_are_parsed_by_clap() {
        let cli = Cli::try_parse_from(["pawflix", "list", "add", "550", "favorites"]).unwrap();
        match cli.command {
            Commands::List {
                cmd: ListCommands::Add { id, name, tv },
            } => {
                assert_eq!(id, 550);
                assert_eq!(name, ListArg::Favourites);
                assert!(!tv);
            }
            _ => panic!("expected list add"),
        }

        let cli = Cli::try_parse_from(["pawflix", "list", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::List {
                cmd: ListCommands::Show { name: None }
            }
        ));
    }

    #[test]
    fn test_unknown_list_name_is_rejected() {
        let err = Cli::try_parse_from(["pawflix", "list", "remove", "550", "later"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
