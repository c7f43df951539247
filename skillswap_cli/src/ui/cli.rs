use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use skillswap_core::store::ProfileRepository;
use skillswap_core::{ConnectionGraphManager, Profile, UserId};
use skillswap_storage::{JsonFileStore, LocalBlobStore};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "skillswap", version = "0.1.0", subcommand_required = true)]
pub struct Args {
    /// Data directory of the server (defaults to the platform data dir)
    #[arg(long, env = "SKILLSWAP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Base URL photos are served from
    #[arg(long, env = "SKILLSWAP_PUBLIC_URL", default_value = "http://localhost:5000")]
    pub public_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every stored profile, private ones included
    Profiles,
    /// Print one user's profile as JSON
    Show {
        #[arg(long)]
        owner: UserId,
    },
    /// Show who is waiting on a user's approval
    Requests {
        #[arg(long)]
        owner: UserId,
    },
    /// Repair one-way connections left by an interrupted approval
    Reconcile {
        /// Only this user; every profile when omitted
        #[arg(long)]
        owner: Option<UserId>,
    },
}

pub async fn run_cli(args: Args) -> anyhow::Result<()> {
    let store = match &args.data_dir {
        Some(dir) => JsonFileStore::with_dir(dir),
        None => JsonFileStore::new(),
    }
    .context("Failed to open data directory")?;
    info!("Using data directory {:?}", store.root());

    let public_base = format!("{}/uploads", args.public_url.trim_end_matches('/'));
    let blobs = LocalBlobStore::new(store.root().join("uploads"), public_base)?;
    let store = Arc::new(store);
    let graph = ConnectionGraphManager::new(store.clone(), Arc::new(blobs));

    match args.command {
        Command::Profiles => {
            for profile in store.list().await? {
                print_row(&profile);
            }
        }
        Command::Show { owner } => {
            let profile = graph.get_profile(owner).await?;
            let json = serde_json::to_string_pretty(&profile).context("Failed to render profile")?;
            println!("{json}");
        }
        Command::Requests { owner } => {
            let requests = graph.get_incoming_requests(owner).await?;
            if requests.is_empty() {
                println!("No pending requests");
            }
            for request in requests {
                let name = request.name.as_deref().unwrap_or("(no profile)");
                println!("{}  {}", request.user, name);
            }
        }
        Command::Reconcile { owner } => {
            let owners = match owner {
                Some(owner) => vec![owner],
                None => store.list().await?.into_iter().map(|p| p.owner).collect(),
            };
            let mut repaired = 0;
            for owner in owners {
                let linked = graph.reconcile_connections(owner).await?;
                for peer in &linked {
                    println!("linked {peer} -> {owner}");
                }
                repaired += linked.len();
            }
            info!("Reconcile finished, {repaired} link(s) repaired");
        }
    }
    Ok(())
}

fn print_row(profile: &Profile) {
    println!(
        "{}  {:<24} {:<8} requests={} connections={}",
        profile.owner,
        profile.name,
        format!("{:?}", profile.visibility).to_lowercase(),
        profile.incoming_requests.len(),
        profile.connections.len(),
    );
}
