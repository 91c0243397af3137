use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use watchmon::config::Config;

#[derive(Parser)]
#[command(name = "watchmon")]
#[command(about = "Terminal history viewer for watch executions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// View the trailing hour of execution history for a watch
    History {
        /// Watch ID
        watch_id: String,
        /// Server URL to connect to (overrides config)
        #[arg(short, long)]
        url: Option<String>,
        /// Authentication token (overrides config)
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

/// Shell completion variants
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum CompletionShell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::PowerShell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "watchmon=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::History {
            watch_id,
            url,
            token,
        } => cmd_history(&watch_id, url.as_deref(), token.as_deref()).await?,
        Commands::Completions { shell } => cmd_completions(shell)?,
    }

    Ok(())
}

async fn cmd_history(
    watch_id: &str,
    url: Option<&str>,
    token: Option<&str>,
) -> anyhow::Result<()> {
    let config = Config::load();
    let url = url.unwrap_or(&config.server.url);
    let token = token.or(config.server.token.as_deref());
    watchmon::tui::run_history(url, token, watch_id).await
}

/// Generate shell completions
fn cmd_completions(shell: CompletionShell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    let shell: Shell = shell.into();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
