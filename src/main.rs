use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use platform_router::api::BaseService;
use platform_router::config::{Config, LogFormat, ServiceKind};
use platform_router::definitions::load_definition;
use platform_router::domain::Crn;
use platform_router::logs_router::{self, LogsRouterClient};
use platform_router::metrics_router::{self, MetricsRouterClient};
use platform_router::observability::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "platform-router")]
#[command(about = "Manage IBM Cloud Logs Router and Metrics Router configuration")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the endpoint for a region
    RegionUrl { region: String },

    #[command(subcommand)]
    Targets(TargetCommand),

    #[command(subcommand)]
    Routes(RouteCommand),

    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Show which targets receive events from the given CRNs (logs only)
    Destinations {
        #[arg(required = true)]
        crns: Vec<String>,
    },

    /// Run a migration action (logs only)
    Migrate { action: String },

    /// Compute locally where events from a CRN would be delivered
    Preview { crn: String },
}

#[derive(Debug, Subcommand)]
enum TargetCommand {
    List,
    Get { id: String },
    Delete { id: String },
    /// Re-check write credentials (metrics only)
    Validate { id: String },
}

#[derive(Debug, Subcommand)]
enum RouteCommand {
    List,
    Get { id: String },
    /// Create a route from a YAML definition
    Create { file: PathBuf },
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum SettingsCommand {
    Get,
    /// Apply a YAML settings definition
    Apply { file: PathBuf },
}

enum Client {
    Logs(LogsRouterClient),
    Metrics(MetricsRouterClient),
}

impl Client {
    fn connect(config: &Config) -> anyhow::Result<Self> {
        let options = config
            .service_options()
            .context("failed to configure service client")?;
        let client = match config.service {
            ServiceKind::Logs => Client::Logs(LogsRouterClient::new(options)?),
            ServiceKind::Metrics => Client::Metrics(MetricsRouterClient::new(options)?),
        };
        Ok(client)
    }

    fn kind(&self) -> ServiceKind {
        match self {
            Client::Logs(_) => ServiceKind::Logs,
            Client::Metrics(_) => ServiceKind::Metrics,
        }
    }

    fn service(&self) -> &BaseService {
        match self {
            Client::Logs(c) => c.service(),
            Client::Metrics(c) => c.service(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config;

    init_tracing(&config.log_level, config.log_format == LogFormat::Json);
    debug!(service = ?config.service, "Starting platform-router");

    if let Command::RegionUrl { region } = &cli.command {
        return print_region_url(config.service, region);
    }

    let client = Client::connect(&config)?;
    info!(
        service = client.service().service_name(),
        url = client.service().service_url(),
        "Client ready"
    );

    let result = run(&client, cli.command).await;

    if config.print_metrics {
        eprint!(
            "{}",
            client
                .service()
                .metrics()
                .to_prometheus(client.service().service_name())
        );
    }
    result
}

async fn run(client: &Client, command: Command) -> anyhow::Result<()> {
    match (client, command) {
        (_, Command::RegionUrl { region }) => print_region_url(client.kind(), &region),

        (Client::Logs(c), Command::Targets(cmd)) => match cmd {
            TargetCommand::List => print_json(&c.list_targets().await?),
            TargetCommand::Get { id } => print_json(&c.get_target(&id).await?),
            TargetCommand::Delete { id } => {
                c.delete_target(&id).await?;
                print_json(&serde_json::json!({ "deleted": id }))
            }
            TargetCommand::Validate { .. } => {
                bail!("target validation is only available for the metrics service")
            }
        },
        (Client::Metrics(c), Command::Targets(cmd)) => match cmd {
            TargetCommand::List => print_json(&c.list_targets().await?),
            TargetCommand::Get { id } => print_json(&c.get_target(&id).await?),
            TargetCommand::Delete { id } => match c.delete_target(&id).await? {
                Some(report) => print_json(&report),
                None => print_json(&serde_json::json!({ "deleted": id })),
            },
            TargetCommand::Validate { id } => print_json(&c.validate_target(&id).await?),
        },

        (Client::Logs(c), Command::Routes(cmd)) => match cmd {
            RouteCommand::List => print_json(&c.list_routes().await?),
            RouteCommand::Get { id } => print_json(&c.get_route(&id).await?),
            RouteCommand::Create { file } => {
                let options: logs_router::CreateRouteOptions = load_definition(&file)
                    .with_context(|| format!("failed to load {}", file.display()))?;
                print_json(&c.create_route(&options).await?)
            }
            RouteCommand::Delete { id } => {
                c.delete_route(&id).await?;
                print_json(&serde_json::json!({ "deleted": id }))
            }
        },
        (Client::Metrics(c), Command::Routes(cmd)) => match cmd {
            RouteCommand::List => print_json(&c.list_routes().await?),
            RouteCommand::Get { id } => print_json(&c.get_route(&id).await?),
            RouteCommand::Create { file } => {
                let options: metrics_router::CreateRouteOptions = load_definition(&file)
                    .with_context(|| format!("failed to load {}", file.display()))?;
                print_json(&c.create_route(&options).await?)
            }
            RouteCommand::Delete { id } => {
                c.delete_route(&id).await?;
                print_json(&serde_json::json!({ "deleted": id }))
            }
        },

        (Client::Logs(c), Command::Settings(cmd)) => match cmd {
            SettingsCommand::Get => print_json(&c.get_settings().await?),
            SettingsCommand::Apply { file } => {
                let options: logs_router::UpdateSettingsOptions = load_definition(&file)
                    .with_context(|| format!("failed to load {}", file.display()))?;
                print_json(&c.update_settings(&options).await?)
            }
        },
        (Client::Metrics(c), Command::Settings(cmd)) => match cmd {
            SettingsCommand::Get => print_json(&c.get_settings().await?),
            SettingsCommand::Apply { file } => {
                let options: metrics_router::ReplaceSettingsOptions = load_definition(&file)
                    .with_context(|| format!("failed to load {}", file.display()))?;
                print_json(&c.replace_settings(&options).await?)
            }
        },

        (Client::Logs(c), Command::Destinations { crns }) => {
            let options = logs_router::QueryDestinationsOptions::new(crns);
            print_json(&c.query_destinations(&options).await?)
        }
        (Client::Logs(c), Command::Migrate { action }) => {
            let options = logs_router::MigrateActionsOptions::new(action);
            print_json(&c.migrate(&options).await?)
        }
        (Client::Metrics(_), Command::Destinations { .. } | Command::Migrate { .. }) => {
            bail!("this command is only available for the logs service")
        }

        (Client::Logs(c), Command::Preview { crn }) => {
            let crn = Crn::parse(crn)?;
            let (routes, settings) = tokio::try_join!(c.list_routes(), c.get_settings())?;
            print_json(&logs_router::preview(&routes.routes, &settings, &crn))
        }
        (Client::Metrics(c), Command::Preview { crn }) => {
            let crn = Crn::parse(crn)?;
            let (routes, settings) = tokio::try_join!(c.list_routes(), c.get_settings())?;
            print_json(&metrics_router::preview(&routes.routes, &settings, &crn))
        }
    }
}

fn print_region_url(service: ServiceKind, region: &str) -> anyhow::Result<()> {
    let url = service.region_url(region)?;
    print_json(&serde_json::json!({ "region": region, "url": url }))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
