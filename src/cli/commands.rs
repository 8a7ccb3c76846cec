//! CLI commands and argument parsing

use crate::catalog::Resource;
use crate::types::parse_date;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// BLAZE partner API extractor
#[derive(Parser, Debug)]
#[command(name = "blaze-partner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the API root
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Output directory (required for parquet)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch resources
    Fetch(FetchArgs),

    /// Show the inventory name→id map
    Inventories,

    /// List known resources
    List,
}

/// Arguments of the `fetch` command
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct FetchArgs {
    /// Resources to fetch (e.g. transactions item-sales)
    #[arg(value_parser = parse_resource, required_unless_present = "all")]
    pub resources: Vec<Resource>,

    /// Fetch every resource
    #[arg(long, conflicts_with = "resources")]
    pub all: bool,

    /// First day of the date window (YYYY-MM-DD or MM/DD/YYYY)
    #[arg(long, value_parser = parse_date_arg)]
    pub start_date: Option<NaiveDate>,

    /// Last day of the date window
    #[arg(long, value_parser = parse_date_arg)]
    pub end_date: Option<NaiveDate>,

    /// Offset of the first page
    #[arg(long, default_value = "0")]
    pub skip: u64,

    /// Records per page, for endpoints that accept it
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Inventory to read batch quantities from
    #[arg(long)]
    pub inventory: Option<String>,

    /// Fail a fetch after this many pages
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Fail a fetch after this many seconds
    #[arg(long)]
    pub deadline_secs: Option<u64>,
}

impl FetchArgs {
    /// The resources selected, in the order given
    pub fn selected(&self) -> Vec<Resource> {
        if self.all {
            Resource::ALL.to_vec()
        } else {
            self.resources.clone()
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON lines, one record per line
    Json,
    /// Human-readable tables
    Pretty,
    /// Parquet files, one per resource
    Parquet,
}

impl OutputFormat {
    /// File extension for written files
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "jsonl",
            Self::Pretty => "txt",
            Self::Parquet => "parquet",
        }
    }
}

fn parse_resource(value: &str) -> Result<Resource, String> {
    Resource::from_str(value).map_err(|e| e.to_string())
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}
