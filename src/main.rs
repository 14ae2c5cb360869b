use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tunesmith::{cli, config, error};

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
    /// Run the recommendation HTTP server
    Serve,

    /// Connect a user's Spotify account
    Connect(ConnectOptions),

    /// Generate recommendations from the terminal
    Recommend(RecommendOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ConnectOptions {
    /// User identifier to attach the Spotify account to
    #[clap(long)]
    pub user: String,

    /// Email stored on a newly created user record
    #[clap(long)]
    pub email: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct RecommendOptions {
    /// User identifier of a connected account
    #[clap(long)]
    pub user: String,

    /// What kind of music to look for
    #[clap(long)]
    pub prompt: String,

    /// Number of tracks to resolve
    #[clap(long, default_value_t = 12)]
    pub count: usize,

    /// Also create a playlist with this name from the resolved tracks
    #[clap(long)]
    pub save: Option<String>,
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
        Command::Serve => cli::serve().await,
        Command::Connect(opt) => cli::connect(opt.user, opt.email).await,
        Command::Recommend(opt) => {
            cli::recommend(opt.user, opt.prompt, opt.count, opt.save).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
