use anyhow::{Context, Result};
use clap::Parser;
use restclient::commands::{self, Command};
use restclient::{ClientConfig, RestClient};

/// restclient - JSON REST client
///
/// Send GET, POST and DELETE requests to a JSON API and print the result.
///
/// Examples:
///   restclient --base-url http://localhost:5000/api/ get widgets
///   restclient --base-url http://localhost:5000/api/ post widgets --data '{"name":"gear"}'
#[derive(Parser, Debug)]
#[command(author, version = env!("RESTCLIENT_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base address of the API (scheme://host:port[/path])
    #[arg(
        long = "base-url",
        short = 'b',
        env = "RESTCLIENT_BASE_URL",
        value_name = "URL",
        global = true
    )]
    pub base_url: Option<String>,

    /// Request timeout in seconds (defaults to 30)
    #[arg(
        long,
        short = 't',
        env = "RESTCLIENT_TIMEOUT",
        value_name = "SECS",
        global = true
    )]
    pub timeout: Option<u64>,

    /// Read and write JSON as whole strings instead of streaming it
    #[arg(long, global = true)]
    pub buffered: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Fetch a collection of resources
    Get(GetArgs),

    /// Create a resource
    Post(PostArgs),

    /// Delete a resource
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// Resource path, resolved against the base URL
    #[arg(value_name = "PATH")]
    pub path: String,
}

#[derive(clap::Args, Debug)]
pub struct PostArgs {
    /// Resource path, resolved against the base URL
    #[arg(value_name = "PATH")]
    pub path: String,

    /// JSON document to send
    #[arg(long, short = 'd', value_name = "JSON")]
    pub data: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Resource path, resolved against the base URL
    #[arg(value_name = "PATH")]
    pub path: String,
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig> {
        let base_url = self
            .base_url
            .as_deref()
            .context("No base URL given; pass --base-url or set RESTCLIENT_BASE_URL")?;

        let mut config = ClientConfig::new(base_url).with_use_streams(!self.buffered);
        if let Some(secs) = self.timeout {
            config = config.with_timeout(secs);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let client = RestClient::with_config(cli.client_config()?)?;

    let command = match cli.command {
        Commands::Get(args) => Command::Get { path: args.path },
        Commands::Post(args) => Command::Post {
            path: args.path,
            data: args.data,
        },
        Commands::Delete(args) => Command::Delete { path: args.path },
    };

    commands::run(&client, command, &mut std::io::stdout().lock()).await
}
