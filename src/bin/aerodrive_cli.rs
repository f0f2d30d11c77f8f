//! AeroDrive CLI — personal cloud drive over S3-compatible storage
//!
//! Usage:
//!   aerodrive-cli --user 1 ls [path]          List a folder
//!   aerodrive-cli --user 1 stat <path>        Show resource info
//!   aerodrive-cli --user 1 mkdir <path>       Create an empty folder
//!   aerodrive-cli --user 1 up <local> [dir]   Upload a local file
//!   aerodrive-cli --user 1 down <path>        Download a file or folder zip
//!   aerodrive-cli --user 1 mv <from> <to>     Move or rename
//!   aerodrive-cli --user 1 rm <path>          Delete recursively
//!   aerodrive-cli --user 1 search <query>     Search the namespace
//!
//! Connection settings come from --config <file> or AERODRIVE_* variables.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use aerodrive::store::s3::S3ObjectStore;
use aerodrive::{Drive, DriveConfig, ResourceDescriptor, ResourceKind, UploadFile, UserId};

#[derive(Parser)]
#[command(
    name = "aerodrive-cli",
    about = "AeroDrive CLI — personal cloud drive over S3-compatible storage",
    version
)]
struct Cli {
    /// Numeric id of the drive owner
    #[arg(long, global = true, default_value_t = 0)]
    user: u64,

    /// JSON config file (falls back to AERODRIVE_* environment variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a file or folder
    Stat {
        /// Drive path, e.g. docs/notes.txt or docs/
        path: String,
    },
    /// List a folder (no path lists the namespace root)
    Ls {
        #[arg(default_value = "")]
        path: String,
    },
    /// Create an empty folder
    Mkdir { path: String },
    /// Upload a local file into a drive folder
    Up {
        local: PathBuf,
        /// Target folder, ending with / (default: namespace root)
        #[arg(default_value = "")]
        folder: String,
    },
    /// Download a file, or a folder bundled as a zip archive
    Down {
        path: String,
        /// Local destination (default: the attachment file name)
        local: Option<PathBuf>,
    },
    /// Delete a file or folder recursively
    Rm { path: String },
    /// Move or rename a resource
    Mv { from: String, to: String },
    /// Search the whole namespace for a name substring
    Search { query: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DriveConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DriveConfig::from_env().context("reading AERODRIVE_* environment")?,
    };

    let drive = Drive::new(Arc::new(S3ObjectStore::new(config.into_s3_config())));
    let user = UserId(cli.user);

    match cli.command {
        Commands::Stat { path } => {
            print_descriptor(&drive.stat(user, &path).await?);
        }
        Commands::Ls { path } => {
            for descriptor in drive.list(user, &path).await? {
                print_descriptor(&descriptor);
            }
        }
        Commands::Mkdir { path } => {
            let created = drive.create_directory(user, &path).await?;
            print_descriptor(&created);
        }
        Commands::Up { local, folder } => {
            let data = std::fs::read(&local)
                .with_context(|| format!("reading {}", local.display()))?;
            let name = local
                .file_name()
                .and_then(|n| n.to_str())
                .context("local path has no usable file name")?
                .to_string();
            let content_type = mime_guess::from_path(&local)
                .first()
                .map(|m| m.essence_str().to_string());

            let stored = drive
                .upload(user, &folder, vec![UploadFile { name, content_type, data }])
                .await?;
            for descriptor in stored {
                print_descriptor(&descriptor);
            }
        }
        Commands::Down { path, local } => {
            let payload = drive.download(user, &path).await?;
            let target = local.unwrap_or_else(|| PathBuf::from(&payload.file_name));
            std::fs::write(&target, &payload.bytes)
                .with_context(|| format!("writing {}", target.display()))?;
            println!("{} ({} bytes)", target.display(), payload.bytes.len());
        }
        Commands::Rm { path } => {
            drive.delete(user, &path).await?;
            println!("deleted {}", path);
        }
        Commands::Mv { from, to } => {
            print_descriptor(&drive.move_or_rename(user, &from, &to).await?);
        }
        Commands::Search { query } => {
            for descriptor in drive.search(user, &query).await? {
                print_descriptor(&descriptor);
            }
        }
    }

    Ok(())
}

fn print_descriptor(descriptor: &ResourceDescriptor) {
    match descriptor.kind {
        ResourceKind::Directory => {
            println!("DIR  {:>10}  {}{}", "-", descriptor.parent_path, descriptor.name)
        }
        ResourceKind::File => println!(
            "FILE {:>10}  {}{}",
            descriptor.size.unwrap_or(0),
            descriptor.parent_path,
            descriptor.name
        ),
    }
}
