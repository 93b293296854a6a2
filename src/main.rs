// ABOUTME: Entry point for the oess-cm operator CLI.
// ABOUTME: Parses arguments and dispatches to the adapter.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use oess_cm::adapter::{ConnectionManager, LabelType, OessConnectionManager};
use oess_cm::config::{self, Config};
use oess_cm::error::{Error, Result};
use oess_cm::types::CircuitId;
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { force } => {
            config::init_config(&cwd, force)?;
            println!("Wrote {}", config::CONFIG_FILENAME);
            Ok(())
        }
        Commands::Check => {
            let config = load_config(cli.config.as_deref(), &cwd)?;
            let manager = OessConnectionManager::from_config(&config).await?;
            let workgroup = manager.session().workgroup();
            println!("Backend: {}", manager.name());
            println!("Workgroup: {} (id {})", workgroup.name, workgroup.id);
            Ok(())
        }
        Commands::Path { from, to } => {
            let config = load_config(cli.config.as_deref(), &cwd)?;
            let manager = OessConnectionManager::from_config(&config).await?;
            let plan = manager.plan(&from, &to).await?;
            println!("Primary: {}", join_links(&plan.primary));
            if plan.has_backup() {
                println!("Backup:  {}", join_links(&plan.backup));
            } else {
                println!("Backup:  (none)");
            }
            Ok(())
        }
        Commands::Setup {
            source,
            dest,
            vlan,
            dest_vlan,
            bandwidth,
        } => {
            let config = load_config(cli.config.as_deref(), &cwd)?;
            let manager = OessConnectionManager::from_config(&config).await?;
            let label = LabelType::EthernetVlan;

            let source_target = manager.target_name(&source, &label, vlan)?;
            let dest_target = manager.target_name(&dest, &label, dest_vlan.unwrap_or(vlan))?;
            let connection_id = manager.allocate_connection_id(&source_target, &dest_target);

            println!("  → Setting up {} -> {}...", source_target, dest_target);
            manager
                .setup_link(&connection_id, &source_target, &dest_target, bandwidth)
                .await?;

            let circuit = manager
                .circuit(&connection_id)
                .ok_or_else(|| Error::InvalidConfig("setup completed without a circuit".to_string()))?;
            println!("  ✓ Circuit {} up (connection {})", circuit.circuit_id, connection_id);
            println!("    primary: {}", join_links(&circuit.plan.primary));
            println!("    backup:  {}", join_links(&circuit.plan.backup));
            Ok(())
        }
        Commands::Teardown { circuit_id } => {
            let config = load_config(cli.config.as_deref(), &cwd)?;
            let manager = OessConnectionManager::from_config(&config).await?;
            let circuit_id = CircuitId::new(circuit_id);
            manager.remove_circuit(&circuit_id).await?;
            println!("  ✓ Circuit {} removed", circuit_id);
            Ok(())
        }
    }
}

fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path),
        None => Config::discover(cwd),
    }
}

fn join_links(links: &[oess_cm::types::LinkId]) -> String {
    if links.is_empty() {
        return "(direct)".to_string();
    }
    links
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}
