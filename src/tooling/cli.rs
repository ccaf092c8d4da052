//! CLI Tooling
//!
//! Command definitions and their execution. Every command returns its output
//! as a string so the binary only prints and sets the exit code.

use crate::catalog::{CatalogScanner, ScanResult};
use crate::config::{BridgeConfig, ConfigLoader, ImmichConfig};
use crate::error::ApiError;
use crate::logging::LoggingOverrides;
use crate::remote::{CatalogService, EagleClient, ImmichClient, ItemQuery};
use crate::report::{self, Section};
use crate::sidecar::SidecarWriter;
use crate::transfer::ImmichTransfer;
use crate::types::{FilterConfig, MediaType};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Eagle catalog bridge: scan libraries, write XMP sidecars, send media to Immich
#[derive(Parser)]
#[command(name = "eaglebridge")]
#[command(about = "Scan Eagle libraries, write XMP sidecars and send media to Immich")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (info level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

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
    pub fn logging_overrides(&self) -> LoggingOverrides {
        LoggingOverrides {
            verbose: self.verbose,
            level: self.log_level.clone(),
            format: self.log_format.clone(),
            output: self.log_output.clone(),
            file: self.log_file.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a library and classify every item folder
    Scan {
        /// Library root (defaults to catalog.path from config)
        catalog: Option<PathBuf>,
        /// Keep items that are in Eagle's trash
        #[arg(long)]
        include_deleted: bool,
        /// Media types to accept (repeatable)
        #[arg(long = "type", value_name = "TYPE")]
        types: Vec<MediaType>,
        /// Accept items carrying any of these tags (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        /// Section to print (accepted, skipped, errored, all)
        #[arg(long, default_value = "all")]
        show: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Scan folders on this many worker threads
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Write an XMP sidecar next to each accepted item
    Sidegen {
        catalog: Option<PathBuf>,
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        /// Report what would be written without writing
        #[arg(long)]
        dry: bool,
        /// Keep sidecars that already exist
        #[arg(long)]
        missing_only: bool,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Upload accepted items to an Immich server
    SendToImmich {
        catalog: Option<PathBuf>,
        /// Immich server URL (defaults to immich.url or IMMICH_URL)
        #[arg(long)]
        immich_url: Option<String>,
        /// Immich API key (defaults to immich.api_key or IMMICH_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        /// Maximum uploads in flight
        #[arg(long)]
        concurrency: Option<usize>,
        /// Report what would be uploaded without uploading
        #[arg(long)]
        dry: bool,
        /// Do not ping the server before uploading
        #[arg(long)]
        skip_check: bool,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Talk to the running Eagle app
    Eagle {
        #[arg(long, default_value = "text")]
        format: String,
        #[command(subcommand)]
        command: EagleCommands,
    },
}

#[derive(Subcommand)]
pub enum EagleCommands {
    /// Show application and library information
    Info,
    /// List folders
    Folders {
        /// Only recently used folders
        #[arg(long)]
        recent: bool,
    },
    /// Create a folder
    CreateFolder {
        name: String,
        #[arg(long)]
        parent: Option<String>,
    },
    /// Rename a folder
    RenameFolder { id: String, name: String },
    /// List items matching a filter
    Items {
        #[arg(long, default_value = "200")]
        limit: u32,
        #[arg(long, default_value = "0")]
        offset: u32,
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        ext: Option<String>,
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        #[arg(long = "folder", value_name = "FOLDER_ID")]
        folders: Vec<String>,
    },
    /// Move items to the trash
    Trash {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// CLI context holding the loaded configuration
pub struct CliContext {
    config: BridgeConfig,
}

impl CliContext {
    /// Create a new CLI context, loading configuration from files and environment.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self { config })
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Scan {
                catalog,
                include_deleted,
                types,
                tags,
                show,
                format,
                jobs,
            } => {
                let section: Section = show.parse()?;
                let format = report::parse_format(format)?;
                let filter = self.filter_for(*include_deleted, types, tags);
                let result = self.scan(catalog.as_ref(), filter, *jobs)?;
                if format == "json" {
                    report::format_scan_json(&result, section)
                } else {
                    Ok(report::format_scan_text(&result, section))
                }
            }
            Commands::Sidegen {
                catalog,
                tags,
                dry,
                missing_only,
                format,
            } => {
                let format = report::parse_format(format)?;
                let filter = self.filter_for(false, &[], tags);
                let result = self.scan(catalog.as_ref(), filter, None)?;
                let sidecars = SidecarWriter::new()
                    .dry_run(*dry)
                    .missing_only(*missing_only)
                    .generate(&result.accepted);
                report::format_sidecar_report(&sidecars, format)
            }
            Commands::SendToImmich {
                catalog,
                immich_url,
                api_key,
                tags,
                concurrency,
                dry,
                skip_check,
                format,
            } => {
                let format = report::parse_format(format)?;
                let immich_config = ImmichConfig {
                    url: immich_url.clone().or_else(|| self.config.immich.url.clone()),
                    api_key: api_key.clone().or_else(|| self.config.immich.api_key.clone()),
                    ..self.config.immich.clone()
                };
                let client = ImmichClient::from_config(&immich_config)?;
                let filter = self.filter_for(false, &[], tags);
                let result = self.scan(catalog.as_ref(), filter, None)?;
                let concurrency = concurrency.unwrap_or(immich_config.concurrency);

                let rt = runtime()?;
                let transfer = rt.block_on(async {
                    if !*skip_check && !*dry {
                        client.ping().await?;
                        info!(url = %client.base_url(), "Immich server reachable");
                    }
                    Ok::<_, ApiError>(
                        ImmichTransfer::new(&client)
                            .concurrency(concurrency)
                            .dry_run(*dry)
                            .run(&result.accepted)
                            .await,
                    )
                })?;
                report::format_transfer_report(&transfer, format)
            }
            Commands::Eagle { format, command } => {
                let format = report::parse_format(format)?;
                let client = EagleClient::from_config(&self.config.eagle)?;
                let rt = runtime()?;
                rt.block_on(run_eagle_command(&client, command, format))
            }
        }
    }

    fn resolve_catalog(&self, catalog: Option<&PathBuf>) -> Result<PathBuf, ApiError> {
        catalog
            .cloned()
            .or_else(|| self.config.catalog.path.clone())
            .ok_or_else(|| {
                ApiError::ConfigError(
                    "No catalog given (pass a path or set catalog.path in config)".to_string(),
                )
            })
    }

    /// Config filter with command-line flags layered on top.
    fn filter_for(&self, include_deleted: bool, types: &[MediaType], tags: &[String]) -> FilterConfig {
        let mut filter = self.config.filter_config();
        if include_deleted {
            filter.include_deleted = true;
        }
        if !types.is_empty() {
            filter.allowed_types = types.iter().copied().collect();
        }
        if !tags.is_empty() {
            filter = filter.with_tags(tags.iter().cloned());
        }
        filter
    }

    fn scan(
        &self,
        catalog: Option<&PathBuf>,
        filter: FilterConfig,
        jobs: Option<usize>,
    ) -> Result<ScanResult, ApiError> {
        let root = self.resolve_catalog(catalog)?;
        let scanner = CatalogScanner::new(root, filter);
        let result = match jobs {
            Some(workers) if workers > 1 => scanner.scan_parallel(workers)?,
            _ => scanner.scan()?,
        };
        info!("{}", report::format_scan_summary(&result));
        Ok(result)
    }
}

/// Run one `eagle` subcommand against a catalog service.
pub async fn run_eagle_command(
    service: &dyn CatalogService,
    command: &EagleCommands,
    format: &str,
) -> Result<String, ApiError> {
    match command {
        EagleCommands::Info => {
            let app = service.application_info().await?;
            let library = service.library_info().await?;
            report::format_eagle_info(&app, &library, format)
        }
        EagleCommands::Folders { recent } => {
            let folders = if *recent {
                service.list_recent_folders().await?
            } else {
                service.list_folders().await?
            };
            report::format_folders(&folders, format)
        }
        EagleCommands::CreateFolder { name, parent } => {
            let folder = service.create_folder(name, parent.as_deref()).await?;
            Ok(format!("Created folder {}", folder))
        }
        EagleCommands::RenameFolder { id, name } => {
            let folder = service.rename_folder(id, name).await?;
            Ok(format!("Renamed folder {}", folder))
        }
        EagleCommands::Items {
            limit,
            offset,
            keyword,
            ext,
            tags,
            folders,
        } => {
            let query = ItemQuery {
                limit: *limit,
                offset: *offset,
                keyword: keyword.clone(),
                ext: ext.clone(),
                tags: tags.clone(),
                folders: folders.clone(),
                ..ItemQuery::default()
            };
            let items = service.list_items(&query).await?;
            report::format_items(&items, format)
        }
        EagleCommands::Trash { ids } => {
            service.move_to_trash(ids).await?;
            Ok(format!("Moved {} item(s) to trash", ids.len()))
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, ApiError> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(ApiError::Runtime(
            "Cannot run remote commands from within an async runtime".to_string(),
        ));
    }
    tokio::runtime::Runtime::new()
        .map_err(|e| ApiError::Runtime(format!("Failed to create runtime: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use crate::remote::{ApplicationInfo, EagleFolder, EagleItem, LibraryInfo};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeEagle {
        trashed: Mutex<Vec<String>>,
        last_query: Mutex<Option<ItemQuery>>,
    }

    fn folder(id: &str, name: &str) -> EagleFolder {
        EagleFolder {
            id: id.to_string(),
            name: name.to_string(),
            ..EagleFolder::default()
        }
    }

    #[async_trait]
    impl CatalogService for FakeEagle {
        async fn application_info(&self) -> Result<ApplicationInfo, RemoteError> {
            Ok(ApplicationInfo {
                version: "4.0.0".to_string(),
                platform: "darwin".to_string(),
                ..ApplicationInfo::default()
            })
        }

        async fn library_info(&self) -> Result<LibraryInfo, RemoteError> {
            let mut root = folder("F1", "Travel");
            root.children.push(folder("F2", "Italy"));
            Ok(LibraryInfo {
                folders: vec![root],
                ..LibraryInfo::default()
            })
        }

        async fn list_folders(&self) -> Result<Vec<EagleFolder>, RemoteError> {
            Ok(vec![folder("F1", "Travel")])
        }

        async fn list_recent_folders(&self) -> Result<Vec<EagleFolder>, RemoteError> {
            Ok(vec![folder("F9", "Recent")])
        }

        async fn create_folder(
            &self,
            folder_name: &str,
            _parent_id: Option<&str>,
        ) -> Result<EagleFolder, RemoteError> {
            Ok(folder("NEW", folder_name))
        }

        async fn rename_folder(
            &self,
            folder_id: &str,
            new_name: &str,
        ) -> Result<EagleFolder, RemoteError> {
            Ok(folder(folder_id, new_name))
        }

        async fn list_items(&self, query: &ItemQuery) -> Result<Vec<EagleItem>, RemoteError> {
            *self.last_query.lock().unwrap() = Some(query.clone());
            Ok(vec![EagleItem {
                id: "I1".to_string(),
                name: "sunset".to_string(),
                ext: "jpg".to_string(),
                ..EagleItem::default()
            }])
        }

        async fn move_to_trash(&self, item_ids: &[String]) -> Result<(), RemoteError> {
            self.trashed.lock().unwrap().extend(item_ids.iter().cloned());
            Ok(())
        }
    }

    #[test]
    fn test_missing_catalog_is_config_error() {
        let ctx = CliContext::with_config(BridgeConfig::default());
        let err = ctx
            .execute(&Commands::Scan {
                catalog: None,
                include_deleted: false,
                types: vec![],
                tags: vec![],
                show: "all".to_string(),
                format: "text".to_string(),
                jobs: None,
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::ConfigError(_)));
    }

    #[test]
    fn test_invalid_format_rejected() {
        let ctx = CliContext::with_config(BridgeConfig::default());
        let err = ctx
            .execute(&Commands::Scan {
                catalog: Some(PathBuf::from("/nonexistent")),
                include_deleted: false,
                types: vec![],
                tags: vec![],
                show: "all".to_string(),
                format: "xml".to_string(),
                jobs: None,
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::ConfigError(_)));
    }

    #[test]
    fn test_filter_flags_layer_over_config() {
        let mut config = BridgeConfig::default();
        config.catalog.tags = vec!["from-config".to_string()];
        let ctx = CliContext::with_config(config);

        let filter = ctx.filter_for(false, &[], &[]);
        assert!(filter.matches_tags(&["from-config"]));

        let filter = ctx.filter_for(true, &[MediaType::Document], &["cli".to_string()]);
        assert!(filter.include_deleted);
        assert_eq!(filter.allowed_types.len(), 1);
        assert!(filter.matches_tags(&["cli"]));
        assert!(!filter.matches_tags(&["from-config"]));
    }

    #[test]
    fn test_send_to_immich_requires_url() {
        if std::env::var("IMMICH_URL").is_ok() {
            return;
        }
        let ctx = CliContext::with_config(BridgeConfig::default());
        let err = ctx
            .execute(&Commands::SendToImmich {
                catalog: Some(PathBuf::from("/nonexistent")),
                immich_url: None,
                api_key: Some("k".to_string()),
                tags: vec![],
                concurrency: None,
                dry: true,
                skip_check: true,
                format: "text".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_eagle_info_and_folders() {
        let fake = FakeEagle::default();
        let out = run_eagle_command(&fake, &EagleCommands::Info, "text")
            .await
            .unwrap();
        assert!(out.contains("4.0.0"));
        assert!(out.contains("Folders: 2"));

        let out = run_eagle_command(&fake, &EagleCommands::Folders { recent: true }, "json")
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["id"], "F9");
    }

    #[tokio::test]
    async fn test_eagle_items_builds_query() {
        let fake = FakeEagle::default();
        let command = EagleCommands::Items {
            limit: 5,
            offset: 10,
            keyword: Some("sun".to_string()),
            ext: None,
            tags: vec!["a".to_string()],
            folders: vec![],
        };
        let out = run_eagle_command(&fake, &command, "text").await.unwrap();
        assert!(out.contains("sunset"));

        let query = fake.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.limit, 5);
        assert_eq!(query.offset, 10);
        assert_eq!(query.keyword.as_deref(), Some("sun"));
        assert_eq!(query.tags, vec!["a"]);
    }

    #[tokio::test]
    async fn test_eagle_folder_mutations_and_trash() {
        let fake = FakeEagle::default();
        let out = run_eagle_command(
            &fake,
            &EagleCommands::CreateFolder {
                name: "Inbox".to_string(),
                parent: None,
            },
            "text",
        )
        .await
        .unwrap();
        assert_eq!(out, "Created folder Inbox (NEW)");

        let out = run_eagle_command(
            &fake,
            &EagleCommands::Trash {
                ids: vec!["I1".to_string(), "I2".to_string()],
            },
            "text",
        )
        .await
        .unwrap();
        assert_eq!(out, "Moved 2 item(s) to trash");
        assert_eq!(*fake.trashed.lock().unwrap(), vec!["I1", "I2"]);
    }
}
