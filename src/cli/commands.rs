use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::{
    api::{ApiError, ApiResult, Gateway},
    app::{get_config_dir, init_config, Config},
    models::Child,
    session::FileTokenStore,
};

use super::{ChildrenCommands, Commands};

/// Handle CLI subcommands
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Init => {
            println!("Initializing SafeRide configuration...");
            init_config()?;
            println!("Configuration initialized successfully!");
            Ok(())
        }
        Commands::Status => show_status(config).await,
        Commands::Login { email, password } => {
            let gateway = connect(config)?;
            let outcome = finish(gateway.login(&email, &password).await, &gateway);
            let account = outcome
                .user
                .map(|user| user.email)
                .unwrap_or(email);
            println!("{} Logged in as {}", "[OK]".green(), account);
            Ok(())
        }
        Commands::Register {
            email,
            password,
            role,
        } => {
            let gateway = connect(config)?;
            let created = finish(gateway.register(&email, &password, role).await, &gateway);
            println!("{} {}", "[OK]".green(), created.message);
            println!("  • {} ({})", created.user.email, role);
            Ok(())
        }
        Commands::Logout => {
            let gateway = connect(config)?;
            finish(gateway.logout().await, &gateway);
            println!("{} Logged out", "[OK]".green());
            Ok(())
        }
        Commands::Whoami => {
            let gateway = connect(config)?;
            let profile = finish(gateway.profile().await, &gateway);
            println!("{} {}", "[OK]".green(), profile.user.email);
            if let Some(role) = profile.user.role {
                println!("      role: {}", role);
            }
            if let Some(id) = profile.user.id {
                println!("      id: {}", id);
            }
            if let Some(created_at) = profile.user.created_at {
                println!("      since: {}", created_at);
            }
            Ok(())
        }
        Commands::Health => {
            let gateway = connect(config)?;
            let health = finish(gateway.health().await, &gateway);
            println!(
                "{} Backend at {} is {}",
                "[OK]".green(),
                gateway.base_url(),
                health.status
            );
            if let Some(version) = health.version {
                println!("      version: {}", version);
            }
            if let Some(message) = health.message {
                println!("      {}", message);
            }
            Ok(())
        }
        Commands::Children(children) => handle_children(children, config).await,
    }
}

async fn handle_children(command: ChildrenCommands, config: &Config) -> Result<()> {
    let gateway = connect(config)?;
    match command {
        ChildrenCommands::List => {
            let children = finish(gateway.fetch_children().await, &gateway);
            if children.is_empty() {
                println!("No children registered yet");
                return Ok(());
            }
            println!("Registered children:");
            for child in &children {
                print_child(child);
            }
        }
        ChildrenCommands::Get { id } => {
            let child = finish(gateway.get_child(&id).await, &gateway);
            print_child(&child);
        }
        ChildrenCommands::Add(args) => {
            let child = finish(gateway.create_child(&args.into()).await, &gateway);
            println!("{} Registered {}", "[OK]".green(), child.name);
            println!("      id: {}", child.id);
        }
        ChildrenCommands::Update { id, args } => {
            let child = finish(gateway.update_child(&id, &args.into()).await, &gateway);
            println!("{} Updated {}", "[OK]".green(), child.name);
        }
        ChildrenCommands::Delete { id } => {
            finish(gateway.delete_child(&id).await, &gateway);
            println!("{} Removed child {}", "[OK]".green(), id);
        }
    }
    Ok(())
}

/// Show connection target, backend reachability, and session state
async fn show_status(config: &Config) -> Result<()> {
    println!("SafeRide Status:");
    println!();
    println!("  Target: {} ({})", config.api.target, config.api.base_url());

    let gateway = connect(config)?;
    match gateway.health().await {
        Ok(health) => println!("  [OK] Backend: {}", health.status),
        Err(err) => println!("  [ERROR] Backend: {}", err),
    }

    if gateway.is_authenticated().await {
        println!("  [OK] Session: Logged in");
    } else {
        println!("  [WARNING] Session: Not logged in");
    }

    let config_path = get_config_dir()?.join("config.toml");
    if config_path.exists() {
        println!("  [OK] Configuration: {}", config_path.display());
    } else {
        println!("  [WARNING] Configuration: Not found (using defaults)");
    }

    println!();
    Ok(())
}

/// Build the gateway every network command goes through, backed by the
/// on-disk session store.
fn connect(config: &Config) -> Result<Gateway> {
    let store = Arc::new(FileTokenStore::open_default()?);
    Gateway::new(&config.api, store)
}

/// Unwrap an operation result or print the failure and exit non-zero.
fn finish<T>(result: ApiResult<T>, gateway: &Gateway) -> T {
    match result {
        Ok(value) => value,
        Err(err) => fail(err, gateway.base_url()),
    }
}

/// Network-class failures get an extra hint naming the configured
/// target, since the message alone cannot say which side is down.
fn fail(err: ApiError, base_url: &str) -> ! {
    eprintln!("{} {}", "[ERROR]".red(), err);
    if err.is_network() {
        eprintln!("        Could not reach {}. Check your network and the configured target.", base_url);
    }
    std::process::exit(1);
}

fn print_child(child: &Child) {
    println!("  • {} ({})", child.name.green(), child.date_of_birth);
    println!("      id: {}", child.id);
    println!("      home: {}", child.home_address);
    println!("      school: {} - {}", child.school_name, child.school_address);
    if let Some(allergies) = &child.allergies {
        println!("      allergies: {}", allergies);
    }
    if let Some(notes) = &child.notes {
        println!("      notes: {}", notes);
    }
}
