//! Catalog administration command handlers.
//!
//! Unlike the `catalog` commands these talk to the API directly and never
//! fall back to sample data: a failed mutation is an error.

mod product;
mod taxonomy;
mod upload;

use clap::Subcommand;
use lumizo_core::{AppConfig, BulkField, BulkOutcome};

pub(crate) use product::ProductCommands;
pub(crate) use taxonomy::{BrandCommands, CategoryCommands, TagCommands};
pub(crate) use upload::UploadCommands;

/// Sub-commands available under `admin`.
#[derive(Debug, Subcommand)]
pub enum AdminCommands {
    /// Create, edit and bulk-edit products
    Product {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Manage brands
    Brand {
        #[command(subcommand)]
        command: BrandCommands,
    },
    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Upload or delete media files
    Upload {
        #[command(subcommand)]
        command: UploadCommands,
    },
}

pub(crate) async fn run(config: &AppConfig, command: AdminCommands) -> anyhow::Result<()> {
    let client = crate::api_client(config)?;
    match command {
        AdminCommands::Product { command } => product::run(&client, command).await,
        AdminCommands::Category { command } => taxonomy::run_category(&client, command).await,
        AdminCommands::Brand { command } => taxonomy::run_brand(&client, command).await,
        AdminCommands::Tag { command } => taxonomy::run_tag(&client, command).await,
        AdminCommands::Upload { command } => upload::run(&client, command).await,
    }
}

/// A `--set field=value` argument. The field name is checked at parse time;
/// the value is validated by the wizard that receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub field: BulkField,
    pub value: String,
}

impl std::str::FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected FIELD=VALUE, got \"{s}\""))?;
        let field = field.trim().parse::<BulkField>().map_err(|e| e.to_string())?;
        Ok(Self {
            field,
            value: value.to_owned(),
        })
    }
}

fn print_outcome(outcome: &BulkOutcome) {
    println!("{}", outcome.summary());
    for error in &outcome.errors {
        println!("  - {error}");
    }
}
