//! CLI Tooling
//!
//! Command-line interface over a [`Session`]. Listing and preview commands
//! need no password; mutating commands unlock the admin gate first, from
//! `--admin-password` or an interactive prompt.

use crate::auth::{sha256_hex, StaticAuthProvider};
use crate::config::{ConfigLoader, ShelfConfig, StorageBackend};
use crate::error::ApiError;
use crate::fetch::{ListingView, RefreshOutcome};
use crate::listing::{normalize_query, FilterType};
use crate::logging::LoggingConfig;
use crate::session::{Mutation, MutationOutcome, Session};
use crate::tooling::format::{
    format_listing_text, format_preview_text, format_purge_report, format_upload_report,
};
use crate::types::ListingContext;
use crate::upload::{UploadFile, UploadProgress};
use crate::view::{RenderFrame, ViewSink};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::info;

/// Cloudshelf CLI - project folders over object storage
#[derive(Parser)]
#[command(name = "cloudshelf")]
#[command(about = "Browse and manage project folders kept in object storage")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Object directory for the local backend (overrides storage.data_dir)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Admin password for mutating commands (prompted on a terminal when omitted)
    #[arg(long)]
    pub admin_password: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Layer the logging flags over the configured logging section.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut logging = base.clone();
        if let Some(ref level) = self.log_level {
            logging.level = level.clone();
        }
        if let Some(ref format) = self.log_format {
            logging.format = format.clone();
        }
        if let Some(ref output) = self.log_output {
            logging.output = output.clone();
        }
        if let Some(ref file) = self.log_file {
            logging.file = Some(file.clone());
        }
        logging
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List folders, or the files of one folder
    Ls {
        /// Folder id; lists the root when omitted
        folder: Option<String>,
        /// Type filter (all, folders, images, pdfs, models)
        #[arg(long, default_value = "all")]
        filter: String,
        /// Case-insensitive search text
        #[arg(long)]
        search: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Create a folder
    Mkdir { name: String },
    /// Change a folder's display name
    Rename { id: String, name: String },
    /// Upload an image and make it the folder cover
    Cover { id: String, file: PathBuf },
    /// Delete a folder and everything in it
    Rmdir {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Delete one file by storage path
    Rm { path: String },
    /// Upload files into a folder
    Upload {
        folder: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print a download URL
    Url { path: String },
    /// Show the preview chosen for a folder card
    Preview {
        id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the SHA-256 digest to store as admin.password_hash
    HashPassword { password: Option<String> },
}

/// Prints upload progress to stderr; listings are printed from outcomes.
#[derive(Default)]
struct TerminalSink {
    last_percent: AtomicU8,
}

impl ViewSink for TerminalSink {
    fn render(&self, _frame: &RenderFrame) {}

    fn upload_progress(&self, progress: &UploadProgress) {
        let previous = self.last_percent.swap(progress.percent, Ordering::Relaxed);
        if previous != progress.percent {
            eprintln!(
                "Uploading {} ({}/{} bytes) {}%",
                progress.file_name, progress.loaded_bytes, progress.total_bytes, progress.percent
            );
        }
    }
}

/// CLI context for executing commands
pub struct CliContext {
    config: ShelfConfig,
    session: Arc<Session>,
    admin_password: Option<String>,
}

impl CliContext {
    /// Load configuration and open storage for the given flags.
    pub fn new(cli: &Cli) -> Result<Self, ApiError> {
        let mut config = ConfigLoader::load(cli.config.as_deref())?;
        if let Some(ref dir) = cli.data_dir {
            config.storage.backend = StorageBackend::Local;
            config.storage.data_dir = Some(dir.clone());
        }
        Self::from_config(config, cli.admin_password.clone())
    }

    pub fn from_config(config: ShelfConfig, admin_password: Option<String>) -> Result<Self, ApiError> {
        let storage = config.storage.open()?;
        let session = Session::builder(storage)
            .layout(config.storage.layout())
            .ttl_ms(config.cache.ttl_ms)
            .admin_secret(config.admin.password_hash.clone())
            .auth(Arc::new(StaticAuthProvider::new(config.auth.accounts.clone())))
            .sink(Arc::new(TerminalSink::default()))
            .build();
        Ok(Self {
            config,
            session: Arc::new(session),
            admin_password,
        })
    }

    pub fn config(&self) -> &ShelfConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Execute a CLI command
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Ls {
                folder,
                filter,
                search,
                format,
            } => self.handle_ls(folder.as_deref(), filter, search.as_deref(), format).await,
            Commands::Mkdir { name } => {
                self.unlock().await?;
                match self.mutate(Mutation::CreateFolder { name: name.clone() }).await? {
                    MutationOutcome::FolderCreated { id } => Ok(format!("Created folder: {}", id)),
                    other => Ok(format!("{:?}", other)),
                }
            }
            Commands::Rename { id, name } => {
                self.unlock().await?;
                let outcome = self
                    .mutate(Mutation::RenameFolder {
                        id: id.clone(),
                        name: name.clone(),
                    })
                    .await?;
                match outcome {
                    MutationOutcome::FolderRenamed { changed: true, .. } => {
                        Ok(format!("Renamed {} to {}", id, name.trim()))
                    }
                    MutationOutcome::FolderRenamed { changed: false, .. } => {
                        Ok(format!("Name unchanged: {}", id))
                    }
                    other => Ok(format!("{:?}", other)),
                }
            }
            Commands::Cover { id, file } => {
                let upload = UploadFile::from_path(file).await?;
                self.unlock().await?;
                match self
                    .mutate(Mutation::SetFolderCover {
                        id: id.clone(),
                        file: upload,
                    })
                    .await?
                {
                    MutationOutcome::CoverSet { path, .. } => Ok(format!("Cover set: {}", path)),
                    other => Ok(format!("{:?}", other)),
                }
            }
            Commands::Rmdir { id, force } => self.handle_rmdir(id, *force).await,
            Commands::Rm { path } => {
                self.unlock().await?;
                self.mutate(Mutation::DeleteFile { path: path.clone() }).await?;
                Ok(format!("Deleted: {}", path))
            }
            Commands::Upload { folder, files } => {
                let mut uploads = Vec::with_capacity(files.len());
                for path in files {
                    uploads.push(UploadFile::from_path(path).await?);
                }
                self.unlock().await?;
                match self
                    .mutate(Mutation::Upload {
                        folder_id: Some(folder.clone()),
                        files: uploads,
                    })
                    .await?
                {
                    MutationOutcome::Uploaded(report) => Ok(format_upload_report(&report)),
                    other => Ok(format!("{:?}", other)),
                }
            }
            Commands::Url { path } => self.session.download_url(path).await,
            Commands::Preview { id, format } => {
                let preview = self.session.folder_preview(id).await;
                if format == "json" {
                    to_json(&preview)
                } else {
                    Ok(format_preview_text(id, &preview))
                }
            }
            Commands::HashPassword { password } => {
                let password = match password {
                    Some(p) => p.clone(),
                    None => prompt_new_password()?,
                };
                Ok(sha256_hex(&password))
            }
        }
    }

    async fn handle_ls(
        &self,
        folder: Option<&str>,
        filter: &str,
        search: Option<&str>,
        format: &str,
    ) -> Result<String, ApiError> {
        let filter: FilterType = filter.parse().map_err(ApiError::ConfigError)?;
        let context = match folder {
            Some(id) => ListingContext::Folder(id.to_string()),
            None => ListingContext::Root,
        };
        let view = ListingView {
            filter,
            query: normalize_query(search.unwrap_or("")),
            ..ListingView::default()
        };

        let mut items = match self
            .session
            .fetcher()
            .refresh(&context, &view, &TerminalSink::default())
            .await
        {
            RefreshOutcome::Committed { items, .. } => items,
            RefreshOutcome::Failed { error, .. } => return Err(ApiError::ListingFailure(error)),
            RefreshOutcome::Superseded { token } => {
                return Err(ApiError::ConfigError(format!(
                    "Listing {} was superseded (token {})",
                    context, token
                )))
            }
        };

        if context.is_root() {
            self.session.resolve_thumbnails(&mut items).await;
        }

        if format == "json" {
            to_json(&items)
        } else {
            Ok(format_listing_text(&context, &items))
        }
    }

    async fn handle_rmdir(&self, id: &str, force: bool) -> Result<String, ApiError> {
        if !force && std::io::stdin().is_terminal() {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt(format!("Delete folder '{}' and all of its files?", id))
                .interact()
                .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;

            if !confirmed {
                return Ok("Deletion cancelled".to_string());
            }
        }

        self.unlock().await?;
        match self.mutate(Mutation::DeleteFolder { id: id.to_string() }).await? {
            MutationOutcome::FolderPurged(report) => Ok(format_purge_report(id, &report)),
            other => Ok(format!("{:?}", other)),
        }
    }

    async fn mutate(&self, mutation: Mutation) -> Result<MutationOutcome, ApiError> {
        let outcome = self.session.on_mutate(mutation).await?;
        info!(outcome = ?outcome, "Mutation applied");
        Ok(outcome)
    }

    /// Open the admin gate from the flag, or by prompting on a terminal.
    async fn unlock(&self) -> Result<(), ApiError> {
        if self.session.gate().is_authorized() {
            return Ok(());
        }
        if !self.session.gate().is_configured() {
            return Err(ApiError::NotConfigured);
        }
        let attempt = match self.admin_password {
            Some(ref password) => password.clone(),
            None if std::io::stdin().is_terminal() => {
                use dialoguer::Password;
                Password::new()
                    .with_prompt("Admin password")
                    .interact()
                    .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?
            }
            None => {
                return Err(ApiError::AdminRequired {
                    not_configured: false,
                })
            }
        };
        self.session.authorize_admin(&attempt).await
    }
}

fn prompt_new_password() -> Result<String, ApiError> {
    use dialoguer::Password;
    Password::new()
        .with_prompt("Admin password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()
        .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::ConfigError(format!("Failed to serialize output: {}", e)))
}
