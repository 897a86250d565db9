use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::{ChildPayload, Role};

#[derive(Parser, Debug)]
#[command(name = "saferide")]
#[command(version = "0.1.0")]
#[command(about = "Guardian-side client for the SafeRide Kids school transport API", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Show connection target and session state
    Status,
    /// Log in and store the session token
    Login {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },
    /// Create a new account
    Register {
        /// Account email
        email: String,
        /// Account password
        password: String,
        /// Account role
        #[arg(long, value_enum, default_value_t = Role::Guardian)]
        role: Role,
    },
    /// Forget the stored session token
    Logout,
    /// Show the authenticated account
    Whoami,
    /// Check whether the backend is reachable
    Health,
    /// Manage registered children
    #[command(subcommand)]
    Children(ChildrenCommands),
}

#[derive(Subcommand, Debug)]
pub enum ChildrenCommands {
    /// List all children registered to this account
    List,
    /// Show one child
    Get {
        /// Child id
        id: String,
    },
    /// Register a child
    Add(ChildArgs),
    /// Update a registered child
    Update {
        /// Child id
        id: String,
        #[command(flatten)]
        args: ChildArgs,
    },
    /// Remove a registered child
    Delete {
        /// Child id
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct ChildArgs {
    /// Child's full name
    #[arg(long)]
    pub name: String,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub date_of_birth: NaiveDate,

    /// Home street address
    #[arg(long)]
    pub home_address: String,

    /// Home position as longitude,latitude
    // One comma-joined token per occurrence; allow_hyphen_values admits
    // negative longitudes without swallowing the flags that follow.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub home_coordinates: Option<Vec<f64>>,

    /// School name
    #[arg(long)]
    pub school_name: String,

    /// School street address
    #[arg(long)]
    pub school_address: String,

    /// School position as longitude,latitude
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub school_coordinates: Option<Vec<f64>>,

    /// Photo URL
    #[arg(long)]
    pub photo_url: Option<String>,

    /// Known allergies
    #[arg(long)]
    pub allergies: Option<String>,

    /// Free-form notes for the driver
    #[arg(long)]
    pub notes: Option<String>,
}

impl From<ChildArgs> for ChildPayload {
    fn from(args: ChildArgs) -> Self {
        ChildPayload {
            name: args.name,
            date_of_birth: args.date_of_birth,
            home_address: args.home_address,
            home_coordinates: args.home_coordinates,
            school_name: args.school_name,
            school_address: args.school_address,
            school_coordinates: args.school_coordinates,
            photo_url: args.photo_url,
            allergies: args.allergies,
            notes: args.notes,
        }
    }
}
