//! CLI runner - executes commands

use crate::catalog::{FetchOptions, Resource};
use crate::cli::commands::{Cli, Commands, FetchArgs, OutputFormat};
use crate::client::BlazeClient;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::output::{
    format_table, records_to_batch, write_json_lines, write_parquet, ParquetWriterConfig,
};
use crate::types::DateRange;
use arrow::record_batch::RecordBatch;
use futures::future::try_join_all;
use serde_json::json;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch(args) => self.fetch(args).await,
            Commands::Inventories => self.inventories().await,
            Commands::List => {
                self.list();
                Ok(())
            }
        }
    }

    /// Resolve the client config: file, then environment, then flags
    pub fn load_config(&self) -> Result<ClientConfig> {
        let config = match &self.cli.config {
            Some(path) => ClientConfig::from_yaml_file(path)?,
            None => ClientConfig::default(),
        };
        let mut config = config.with_env_overrides();

        if let Some(url) = &self.cli.base_url {
            config.base_url.clone_from(url);
        }
        if let Commands::Fetch(args) = &self.cli.command {
            if let Some(max_pages) = args.max_pages {
                config.max_pages = max_pages;
            }
            if let Some(secs) = args.deadline_secs {
                config.deadline_secs = Some(secs);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Fetch the selected resources concurrently and write each one out
    async fn fetch(&self, args: &FetchArgs) -> Result<()> {
        if self.cli.format == OutputFormat::Parquet && self.cli.output.is_none() {
            return Err(Error::config("Parquet format requires --output directory"));
        }

        let options = fetch_options(args)?;
        let client = BlazeClient::connect(&self.load_config()?).await?;
        let started = Instant::now();

        let fetches = args.selected().into_iter().map(|resource| {
            let client = &client;
            let options = &options;
            async move {
                let start = Instant::now();
                let records = client.fetch_records(resource, options).await?;
                let batch = records_to_batch(&records)?;
                Ok::<_, Error>((resource, batch, start.elapsed()))
            }
        });
        let tables = try_join_all(fetches).await?;

        for (resource, batch, elapsed) in &tables {
            self.emit(*resource, batch)?;
            info!(
                "{}: {} rows, {} columns in {}ms",
                resource,
                batch.num_rows(),
                batch.num_columns(),
                elapsed.as_millis()
            );
        }

        info!(
            "Fetched {} resources in {}ms",
            tables.len(),
            started.elapsed().as_millis()
        );
        Ok(())
    }

    /// Print the inventory map
    async fn inventories(&self) -> Result<()> {
        let client = BlazeClient::connect(&self.load_config()?).await?;
        let inventory = client.inventory();

        let entries: serde_json::Map<String, serde_json::Value> = inventory
            .names()
            .into_iter()
            .filter_map(|name| {
                inventory
                    .resolve(name)
                    .ok()
                    .map(|id| (name.to_string(), json!(id)))
            })
            .collect();

        match self.cli.format {
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            OutputFormat::Json | OutputFormat::Parquet => {
                println!("{}", serde_json::to_string(&entries)?);
            }
        }
        Ok(())
    }

    /// Print the resource catalog
    fn list(&self) {
        for resource in Resource::ALL {
            let query = resource.query(&FetchOptions::new());
            let mut notes = Vec::new();
            if resource.is_date_filtered() {
                notes.push("dates");
            }
            if resource.requires_inventory() {
                notes.push("inventory");
            }
            if query.flatten.is_some() {
                notes.push("flattened");
            }

            match self.cli.format {
                OutputFormat::Pretty => {
                    println!("{:<18} {:<30} {}", resource, query.path, notes.join(","));
                }
                OutputFormat::Json | OutputFormat::Parquet => {
                    let line = json!({"resource": resource, "path": query.path, "features": notes});
                    println!("{line}");
                }
            }
        }
    }

    /// Write one resource's table in the selected format
    fn emit(&self, resource: Resource, batch: &RecordBatch) -> Result<()> {
        if let Some(dir) = &self.cli.output {
            let path = output_path(dir, resource, self.cli.format)?;
            match self.cli.format {
                OutputFormat::Parquet => {
                    write_parquet(&path, batch, &ParquetWriterConfig::default())?;
                }
                OutputFormat::Json => {
                    let mut file = BufWriter::new(File::create(&path)?);
                    write_json_lines(&mut file, batch)?;
                    file.flush()?;
                }
                OutputFormat::Pretty => fs::write(&path, format_table(batch)?)?,
            }
            info!("Wrote {}", path.display());
            return Ok(());
        }

        let stdout = io::stdout();
        let mut out = stdout.lock();
        match self.cli.format {
            OutputFormat::Json => {
                write_json_lines(&mut out, batch)?;
            }
            OutputFormat::Pretty => {
                writeln!(out, "{resource}")?;
                writeln!(out, "{}", format_table(batch)?)?;
            }
            OutputFormat::Parquet => {
                return Err(Error::config("Parquet format requires --output directory"));
            }
        }
        out.flush()?;
        Ok(())
    }
}

/// Build fetch options from CLI arguments.
///
/// A missing end date defaults to today and a missing start date to the day
/// before the end date.
pub fn fetch_options(args: &FetchArgs) -> Result<FetchOptions> {
    let mut options = FetchOptions::new().skip(args.skip);

    if let Some(size) = args.page_size {
        options = options.page_size(size);
    }
    if let Some(name) = &args.inventory {
        options = options.inventory(name.clone());
    }

    if args.start_date.is_some() || args.end_date.is_some() {
        let default = DateRange::last_day();
        let end = args.end_date.unwrap_or(default.end);
        let start = match args.start_date {
            Some(start) => start,
            None => end.pred_opt().ok_or_else(|| {
                Error::invalid_date(end.to_string(), "no day before the end date")
            })?,
        };
        options = options.dates(DateRange::new(start, end)?);
    }

    Ok(options)
}

fn output_path(dir: &Path, resource: Resource, format: OutputFormat) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    Ok(dir.join(format!("{}.{}", resource, format.extension())))
}
