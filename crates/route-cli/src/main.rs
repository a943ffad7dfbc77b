mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    client::ClientSubcommand, config::ConfigSubcommand, habit::HabitSubcommand,
    kpi::KpiSubcommand, profile::ProfileSubcommand, project::ProjectSubcommand,
    resource::ResourceSubcommand, roadmap::RoadmapSubcommand, slot::SlotSubcommand,
    spend::SpendSubcommand, task::TaskSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "route",
    about = "Founder's Route: clients, habits, projects, roadmap and an AI companion in one local workspace",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from .route/ or .git/)
    #[arg(long, global = true, env = "ROUTE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .route/, write a config and seed every feature slot
    Init {
        /// Workspace name (default: the root directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Manage clients
    Client {
        #[command(subcommand)]
        subcommand: ClientSubcommand,
    },

    /// Track daily habits
    Habit {
        #[command(subcommand)]
        subcommand: HabitSubcommand,
    },

    /// Notes, links and documents
    Resource {
        #[command(subcommand)]
        subcommand: ResourceSubcommand,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },

    /// Manage tasks, globally or inside a project
    Task {
        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Quarterly roadmap milestones
    Roadmap {
        #[command(subcommand)]
        subcommand: RoadmapSubcommand,
    },

    /// Key performance indicators
    Kpi {
        #[command(subcommand)]
        subcommand: KpiSubcommand,
    },

    /// Income and expenses
    Spend {
        #[command(subcommand)]
        subcommand: SpendSubcommand,
    },

    /// Search projects, clients, resources, inspirations and tasks
    Search {
        /// Search text (omit for the first few items)
        query: Vec<String>,
    },

    /// Ask the AI companion one question about your workspace
    Chat {
        #[arg(required = true)]
        message: Vec<String>,

        /// Ask through a running `route serve` at this URL
        #[arg(long, env = "ROUTE_SERVER")]
        server: Option<String>,
    },

    /// Check an invite or founder code
    Access { code: String },

    /// The founder's display name
    Profile {
        #[command(subcommand)]
        subcommand: ProfileSubcommand,
    },

    /// Inspect and edit raw slots
    Slot {
        #[command(subcommand)]
        subcommand: SlotSubcommand,
    },

    /// Show or validate the workspace config
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Serve the HTTP API
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3141")]
        port: u16,

        /// Open a browser once listening
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { name } => cmd::init::run(&root, name.as_deref(), cli.json),
        Commands::Client { subcommand } => cmd::client::run(&root, subcommand, cli.json),
        Commands::Habit { subcommand } => cmd::habit::run(&root, subcommand, cli.json),
        Commands::Resource { subcommand } => cmd::resource::run(&root, subcommand, cli.json),
        Commands::Project { subcommand } => cmd::project::run(&root, subcommand, cli.json),
        Commands::Task { subcommand } => cmd::task::run(&root, subcommand, cli.json),
        Commands::Roadmap { subcommand } => cmd::roadmap::run(&root, subcommand, cli.json),
        Commands::Kpi { subcommand } => cmd::kpi::run(&root, subcommand, cli.json),
        Commands::Spend { subcommand } => cmd::spend::run(&root, subcommand, cli.json),
        Commands::Search { query } => cmd::search::run(&root, &query.join(" "), cli.json),
        Commands::Chat { message, server } => {
            cmd::chat::run(&root, &message.join(" "), server.as_deref(), cli.json)
        }
        Commands::Access { code } => cmd::access::run(&root, &code, cli.json),
        Commands::Profile { subcommand } => cmd::profile::run(&root, subcommand, cli.json),
        Commands::Slot { subcommand } => cmd::slot::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Serve { port, open } => cmd::serve::run(&root, port, open),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
