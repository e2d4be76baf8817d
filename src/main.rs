use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ossindex::{Config, OssIndexClient, PackageQuery, PackageRef};
use serde::Serialize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit codes for scripting
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const NOT_FOUND: u8 = 2;
}

#[derive(Parser)]
#[command(name = "ossindex")]
#[command(
    author,
    version,
    about = "Query OSS Index for package, source control, CPE and CVE data"
)]
struct Cli {
    /// Service endpoint: production, local, or a base URL (overrides the config file)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Log requests and responses to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the best matching artifact for one package
    Package {
        /// Package manager (npm, maven, pypi, ...)
        package_manager: String,
        name: String,
        version: Option<String>,
    },

    /// Look up several packages at once (pm:name[@version])
    Packages {
        #[arg(required = true)]
        packages: Vec<PackageQuery>,

        /// One request per package instead of a single bulk request
        #[arg(long)]
        sequential: bool,
    },

    /// Fetch source control records by OSS Index id
    Scm {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Fetch the source control record for a repository URI
    ScmUri { uri: String },

    /// Fetch platform details for CPE URIs (cpe:/part:vendor:product)
    Cpe {
        #[arg(required = true)]
        uris: Vec<String>,
    },

    /// Fetch CVE details by OSS Index id
    Cve {
        #[arg(required = true)]
        ids: Vec<String>,

        /// One request per id instead of a single bulk request
        #[arg(long)]
        sequential: bool,
    },

    /// Fetch packages with their vulnerabilities (pm:name)
    Vulns {
        #[arg(required = true)]
        packages: Vec<PackageRef>,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "ossindex=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<u8> {
    let command = match cli.command {
        Commands::Config { init, path } => {
            handle_config(cli.endpoint, init, path)?;
            return Ok(exit_codes::SUCCESS);
        }
        command => command,
    };

    let config = load_config(cli.endpoint)?;
    let client = OssIndexClient::from_config(&config)?;

    match command {
        Commands::Package {
            package_manager,
            name,
            version,
        } => {
            let found = client
                .lookup_package(&package_manager, &name, version.as_deref())
                .await?;
            print_found(found.as_ref())
        }
        Commands::Packages {
            packages,
            sequential,
        } => {
            let results = if sequential {
                client.lookup_packages_sequential(&packages).await?
            } else {
                client.lookup_packages_bulk(&packages).await?
            };
            let any_found = results.iter().any(Option::is_some);
            print_json(&results)?;
            Ok(found_code(any_found))
        }
        Commands::Scm { ids } => print_all(&client.lookup_scm_by_ids(&ids).await?),
        Commands::ScmUri { uri } => print_found(client.lookup_scm_by_uri(&uri).await?.as_ref()),
        Commands::Cpe { uris } => print_all(&client.lookup_cpe_details(&uris).await?),
        Commands::Cve { ids, sequential } => {
            let details = if sequential {
                client.lookup_cve_details_sequential(&ids).await?
            } else {
                client.lookup_cve_details(&ids).await?
            };
            print_all(&details)
        }
        Commands::Vulns { packages } => {
            match client.lookup_packages_with_vulnerabilities(&packages).await {
                Ok(body) => {
                    print_json(&body)?;
                    Ok(exit_codes::SUCCESS)
                }
                Err(e) => match e.payload() {
                    Some(payload) => {
                        eprintln!("{}", serde_json::to_string_pretty(&payload)?);
                        Ok(exit_codes::ERROR)
                    }
                    None => Err(e.into()),
                },
            }
        }
        Commands::Config { .. } => unreachable!("handled above"),
    }
}

/// Loads the config file, with `--endpoint` taking precedence over it.
fn load_config(endpoint: Option<String>) -> Result<Config> {
    let mut config = Config::load().context("Failed to load config file")?;
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
    }
    Ok(config)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_found<T: Serialize>(found: Option<&T>) -> Result<u8> {
    print_json(&found)?;
    Ok(found_code(found.is_some()))
}

fn print_all<T: Serialize>(records: &[T]) -> Result<u8> {
    print_json(records)?;
    Ok(found_code(!records.is_empty()))
}

fn found_code(found: bool) -> u8 {
    if found {
        exit_codes::SUCCESS
    } else {
        exit_codes::NOT_FOUND
    }
}

fn handle_config(endpoint: Option<String>, init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        Config::default().save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        println!("Config file: {}", config_path.display());
    } else {
        println!("No config file at {}", config_path.display());
        println!("Run 'ossindex config --init' to create one.");
    }
    println!();

    // Shows what a lookup would actually use, --endpoint included.
    let config = load_config(endpoint)?;
    println!("{}", config.describe()?);

    Ok(())
}
