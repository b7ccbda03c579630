use std::{path::PathBuf, sync::Arc};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spexcli::{cli, config, error, types::PkceToken, utils};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Export playlist or library tracks to spreadsheet files
    Export(ExportOptions),

    /// List your playlists
    Playlists(PlaylistsOptions),

    /// Some helper information about attributes and authentication
    Info(InfoOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Export playlist or library tracks to spreadsheet files")]
pub struct ExportOptions {
    /// Playlist name or share URL; omit for your Liked Songs
    pub playlist: Option<String>,

    /// Comma-separated attribute paths to export
    #[clap(
        long,
        default_value = utils::DEFAULT_ATTRIBUTES,
        value_parser = utils::parse_attribute_paths
    )]
    pub attrs: utils::AttributePaths,

    /// Output file; defaults to the --update file, or spotify-export.csv
    #[clap(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Previous export to reconcile against (adds missing/newly-added sheets)
    #[clap(long)]
    pub update: Option<PathBuf>,

    /// Keep entries without track metadata as blank rows instead of skipping them
    #[clap(long)]
    pub keep_missing_tracks: bool,

    /// Match playlist names case-insensitively
    #[clap(long)]
    pub ignore_case: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Search for playlists
    #[clap(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct InfoOptions {
    /// Show the known attribute paths and column expansion
    #[clap(long)]
    attributes: bool,

    /// Show authentication status
    #[clap(long)]
    auth: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }

        Command::Export(opt) => {
            cli::export(
                opt.playlist,
                opt.attrs,
                opt.output,
                opt.update,
                opt.keep_missing_tracks,
                opt.ignore_case,
            )
            .await
        }

        Command::Playlists(opt) => cli::list_playlists(opt.search).await,

        Command::Info(opt) => cli::info(opt.attributes, opt.auth).await,

        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
