use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tunebridge::{
    config::{self, SpotifyConfig},
    error, info,
    management::spawn_refresh_task,
    server,
    spotify::SpotifyClient,
    warning,
};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeOptions),

    /// Print the Spotify consent URL
    AuthUrl,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Open the login page in the default browser once the server is up
    #[clap(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn load_config() -> SpotifyConfig {
    match SpotifyConfig::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(opt) => {
            let config = load_config();
            let addr = config.server_addr;
            let refresh_interval = config.refresh_interval;
            let client = Arc::new(SpotifyClient::new(config));

            match refresh_interval {
                Some(interval) => {
                    spawn_refresh_task(Arc::clone(&client), interval);
                }
                None => info!("Automatic token refresh disabled."),
            }

            if opt.open {
                let login_url = format!("http://{}/login", addr);
                tokio::spawn(async move {
                    // give the listener a moment to bind
                    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
                    if webbrowser::open(&login_url).is_err() {
                        warning!(
                            "Failed to open browser. Please navigate to the following URL manually:\n{}",
                            login_url
                        )
                    }
                });
            }

            if let Err(e) = server::start_api_server(client, addr).await {
                error!("Server stopped: {}", e);
            }
        }
        Command::AuthUrl => {
            let client = SpotifyClient::new(load_config());
            println!("{}", client.authorization_url());
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
