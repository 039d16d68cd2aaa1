use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;
use wg_nord::api::DirectoryClient;
use wg_nord::store::ConfigStore;
use wg_nord::{keys, profile, Config};

#[derive(Parser)]
#[command(name = "wg-nord")]
#[command(about = "NordVPN WireGuard profile generator and tunnel manager")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding saved profiles (overrides the config file)
    #[arg(long, global = true)]
    profile_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List countries with available servers
    Countries,
    /// List recommended servers
    Servers {
        /// Two-letter country code filter
        #[arg(short, long)]
        country: Option<String>,
        /// Maximum number of servers to fetch
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Generate a profile for the best recommended server
    Generate {
        /// Two-letter country code filter
        #[arg(short, long)]
        country: Option<String>,
        /// DNS servers for the profile (comma-separated)
        #[arg(long)]
        dns: Option<String>,
        /// Profile name (defaults to the server hostname minus domain)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List saved profiles
    List,
    /// Activate a saved profile with wg-quick
    Up {
        /// Profile name as shown by `list`
        name: String,
    },
    /// Deactivate the running tunnel
    Down,
    /// Show tunnel status
    Status,
    /// Generate default config file
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set up logging on stderr so stdout stays script-friendly
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match Config::load(&Config::default_path()) {
        Ok(config) => config,
        Err(e) => {
            debug!("Using default settings ({})", e);
            Config::default()
        }
    };
    let profile_dir = cli.profile_dir.unwrap_or_else(|| config.profile_dir.clone());

    match cli.command {
        Commands::Countries => {
            let client = DirectoryClient::with_base_url(&config.api_base);
            let countries = client.countries_or_empty().await;
            if countries.is_empty() {
                println!("Failed to fetch countries list");
            } else {
                println!("Available countries:");
                for country in &countries {
                    println!("{}: {}", country.code, country.name);
                }
            }
        }
        Commands::Servers { country, limit } => {
            let client = DirectoryClient::with_base_url(&config.api_base);
            let servers = client.servers_or_empty(country.as_deref(), limit).await;
            if servers.is_empty() {
                println!("No servers found");
            } else {
                for server in &servers {
                    let location = server
                        .locations
                        .first()
                        .map(|l| l.country.name.as_str())
                        .unwrap_or("Unknown");
                    println!("{}  load {:>3}%  {}", server.hostname, server.load, location);
                }
            }
        }
        Commands::Generate {
            country,
            dns,
            output,
        } => {
            let client = DirectoryClient::with_base_url(&config.api_base);
            let servers = client.servers_or_empty(country.as_deref(), Some(1)).await;
            let Some(server) = servers.first() else {
                println!("No servers available");
                std::process::exit(1);
            };
            info!("Selected {} (load {}%)", server.hostname, server.load);

            // Key generation is a precondition for everything downstream
            let pair = match keys::generate_key_pair(keys::WG_COMMAND) {
                Ok(pair) => pair,
                Err(e) => {
                    error!("Key generation failed: {}", e);
                    std::process::exit(1);
                }
            };

            let dns = dns.as_deref().unwrap_or(&config.dns);
            let rendered = profile::render(server, &pair.private_key, dns)?;
            let name = output.unwrap_or_else(|| profile::profile_name(&server.hostname));

            std::fs::create_dir_all(&profile_dir)?;
            let store = ConfigStore::new(&profile_dir);
            let path = store.config_path(&name);
            profile::save(&rendered, &path)?;

            println!("Saved profile {} to {}", name, path.display());
            println!("Client public key: {}", pair.public_key);
        }
        Commands::List => {
            std::fs::create_dir_all(&profile_dir)?;
            let store = ConfigStore::new(&profile_dir);
            let configs = store.list_configs()?;
            if configs.is_empty() {
                println!("No saved profiles");
            } else {
                for name in configs {
                    println!("{}", name);
                }
            }
        }
        Commands::Up { name } => {
            let mut store = ConfigStore::new(&profile_dir);
            if store.activate(&name) {
                println!("Activated {}", name);
            } else {
                println!("Failed to activate {}", name);
                std::process::exit(1);
            }
        }
        Commands::Down => {
            let mut store = ConfigStore::new(&profile_dir);
            if store.deactivate() {
                println!("Tunnel deactivated");
            } else {
                println!("Failed to deactivate tunnel");
                std::process::exit(1);
            }
        }
        Commands::Status => {
            let store = ConfigStore::new(&profile_dir);
            let status = store.status();
            if status.active {
                print!("{}", status.details);
            } else {
                println!("{}", status.details);
            }
        }
        Commands::Init => {
            info!("Generating default config...");
            let config = Config::default();
            let path = Config::default_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            config.save(&path)?;
            println!("Created default config: {}", path.display());
        }
    }

    Ok(())
}
