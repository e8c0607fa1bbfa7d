//! Product administration, including the bulk create and bulk update flows.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use lumizo_api::{LumizoClient, UploadKind};
use lumizo_catalog::{submit_bulk_create, submit_bulk_update, upload_files};
use lumizo_core::{BulkCreateWizard, BulkUpdateWizard, NewProductRow, ProductInput};
use serde_json::{Map, Value};

use super::{print_outcome, Assignment};

/// Sub-commands available under `admin product`.
#[derive(Debug, Subcommand)]
pub enum ProductCommands {
    /// Print a product as JSON
    Get { id: String },
    /// Create a product from a JSON file and/or field assignments
    Create {
        /// Product name
        #[arg(long)]
        name: Option<String>,
        /// Model code
        #[arg(long)]
        model: Option<String>,
        /// JSON object with product fields
        #[arg(long)]
        file: Option<PathBuf>,
        /// Field assignment, e.g. --set price=2499 (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<Assignment>,
    },
    /// Update fields of one product
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<Assignment>,
    },
    /// Delete a product
    Delete { id: String },
    /// Apply the same field values to many products in one request
    BulkUpdate {
        /// Comma-separated product ids
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
        /// Field assignment applied to every product (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<Assignment>,
    },
    /// Create many products in one request
    BulkCreate {
        /// JSON array of rows: name, model, price, mrp, images, description
        #[arg(long)]
        file: PathBuf,
        /// Field shared by every row (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<Assignment>,
        /// Image uploaded once and used by rows without their own images
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
}

pub(crate) async fn run(client: &LumizoClient, command: ProductCommands) -> anyhow::Result<()> {
    match command {
        ProductCommands::Get { id } => {
            let product = client.get_product(&id).await?;
            println!("{}", serde_json::to_string_pretty(&product)?);
        }
        ProductCommands::Create {
            name,
            model,
            file,
            set,
        } => {
            let input = product_input(name, model, file.as_deref(), &set)?;
            if input.name.is_none() {
                anyhow::bail!("a new product needs a name (--name or \"name\" in --file)");
            }
            let product = client.create_product(&input).await?;
            println!("created product {} ({})", product.id, product.name);
        }
        ProductCommands::Update {
            id,
            name,
            model,
            file,
            set,
        } => {
            let input = product_input(name, model, file.as_deref(), &set)?;
            if input == ProductInput::default() {
                anyhow::bail!("nothing to update; pass --name, --model, --file or --set");
            }
            let product = client.update_product(&id, &input).await?;
            println!("updated product {} ({})", product.id, product.name);
        }
        ProductCommands::Delete { id } => {
            client.delete_product(&id).await?;
            println!("deleted product {id}");
        }
        ProductCommands::BulkUpdate { ids, set } => run_bulk_update(client, ids, &set).await?,
        ProductCommands::BulkCreate { file, set, images } => {
            run_bulk_create(client, &file, &set, &images).await?;
        }
    }
    Ok(())
}

/// Merges the JSON file, then `--set` assignments, then the explicit flags
/// into one input. Later sources win.
fn product_input(
    name: Option<String>,
    model: Option<String>,
    file: Option<&Path>,
    set: &[Assignment],
) -> anyhow::Result<ProductInput> {
    let mut object = match file {
        Some(path) => match read_json(path)? {
            Value::Object(map) => map,
            _ => anyhow::bail!("{} must contain a JSON object", path.display()),
        },
        None => Map::new(),
    };
    for assignment in set {
        let value = assignment.field.parse_value(&assignment.value)?;
        object.insert(assignment.field.key().to_owned(), value);
    }
    if let Some(name) = name {
        object.insert("name".to_owned(), Value::String(name));
    }
    if let Some(model) = model {
        object.insert("model".to_owned(), Value::String(model));
    }
    serde_json::from_value(Value::Object(object)).context("invalid product fields")
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

async fn run_bulk_update(
    client: &LumizoClient,
    ids: Vec<String>,
    set: &[Assignment],
) -> anyhow::Result<()> {
    let mut wizard = BulkUpdateWizard::new();
    wizard.select_products(ids);
    wizard.next()?;
    for assignment in set {
        if !wizard.selected_fields().contains(&assignment.field) {
            wizard.toggle_field(assignment.field);
        }
    }
    wizard.next()?;
    for assignment in set {
        wizard.set_value(assignment.field, &assignment.value)?;
    }

    let outcome = submit_bulk_update(client, &wizard).await?;
    print_outcome(&outcome);
    Ok(())
}

async fn run_bulk_create(
    client: &LumizoClient,
    file: &Path,
    set: &[Assignment],
    images: &[PathBuf],
) -> anyhow::Result<()> {
    let rows: Vec<NewProductRow> = serde_json::from_value(read_json(file)?)
        .with_context(|| format!("{} must be a JSON array of product rows", file.display()))?;

    let mut wizard = BulkCreateWizard::new();
    for assignment in set {
        wizard.set_shared(assignment.field, &assignment.value)?;
    }
    wizard.next();
    for row in rows {
        wizard.add_row(row)?;
    }
    // Reject bad rows before spending uploads on them.
    wizard.build_payload()?;

    if !images.is_empty() {
        let uploaded = upload_files(client, UploadKind::ProductImage, images).await?;
        println!("uploaded {} shared images", uploaded.len());
        wizard.set_shared_images(uploaded.into_iter().map(|u| u.url).collect());
    }

    let outcome = submit_bulk_create(client, &wizard).await?;
    print_outcome(&outcome);
    Ok(())
}
