// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oess-cm")]
#[command(about = "Provision NSI circuits on an OESS-controlled network")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: discover oess-cm.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter oess-cm.yml in the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Authenticate against OESS and resolve the workgroup
    Check,

    /// Show the primary and backup paths between two switches
    Path {
        /// Source switch
        from: String,
        /// Destination switch
        to: String,
    },

    /// Provision a circuit between two configured ports
    Setup {
        /// Source NSI port name
        source: String,
        /// Destination NSI port name
        dest: String,
        /// VLAN tag on the source port (and on the destination unless --dest-vlan is given)
        #[arg(long)]
        vlan: u32,
        /// VLAN tag on the destination port
        #[arg(long)]
        dest_vlan: Option<u32>,
        /// Requested bandwidth in Mbit/s (advisory)
        #[arg(long, default_value_t = 0)]
        bandwidth: u64,
    },

    /// Remove a circuit by its OESS circuit id
    Teardown {
        /// OESS circuit id
        circuit_id: String,
    },
}
