//! Local quote cart commands. The cart lives in a JSON file at
//! `LUMIZO_CART_PATH` and never reaches the API.

use std::path::PathBuf;

use clap::Subcommand;
use lumizo_core::pricing::format_price;
use lumizo_core::{AppConfig, Cart, VariantSelection};
use lumizo_pdf::{export_quote, write_pdf, ExportOptions, HttpImageSource};

use crate::catalog::{clip, new_session, print_notice};
use crate::or_dash;

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Show cart lines and the grand total
    List,
    /// Add a product, optionally with variant choices
    Add {
        /// Product id
        product_id: String,
        #[arg(long, default_value = "1")]
        quantity: u32,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        shape: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
    },
    /// Remove a line by its number in `cart list`
    Remove { line: usize },
    /// Change the quantity of a line; 0 removes it
    SetQuantity { line: usize, quantity: u32 },
    /// Empty the cart
    Clear,
    /// Render the cart as a PDF quote
    Export {
        /// Output file
        #[arg(long)]
        out: PathBuf,
    },
}

pub(crate) async fn run(config: &AppConfig, command: CartCommands) -> anyhow::Result<()> {
    let path = config.cart_path.as_path();
    match command {
        CartCommands::List => {
            print_cart(&Cart::load(path)?);
            Ok(())
        }
        CartCommands::Add {
            product_id,
            quantity,
            size,
            color,
            shape,
            kind,
        } => {
            let selection = VariantSelection {
                size,
                color,
                shape,
                kind,
            };
            run_cart_add(config, &product_id, quantity, selection).await
        }
        CartCommands::Remove { line } => {
            let mut cart = Cart::load(path)?;
            let removed = cart.remove(line_index(line)?)?;
            cart.save(path)?;
            println!("removed {}", removed.product.name);
            Ok(())
        }
        CartCommands::SetQuantity { line, quantity } => {
            let mut cart = Cart::load(path)?;
            cart.set_quantity(line_index(line)?, quantity)?;
            cart.save(path)?;
            print_cart(&cart);
            Ok(())
        }
        CartCommands::Clear => {
            Cart::default().save(path)?;
            println!("cart cleared");
            Ok(())
        }
        CartCommands::Export { out } => run_cart_export(config, &out).await,
    }
}

/// Lines are numbered from 1 for display.
fn line_index(line: usize) -> anyhow::Result<usize> {
    line.checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("cart lines are numbered from 1"))
}

async fn run_cart_add(
    config: &AppConfig,
    product_id: &str,
    quantity: u32,
    selection: VariantSelection,
) -> anyhow::Result<()> {
    let mut session = new_session(config)?;
    let product = session.product(product_id).await;
    print_notice(&mut session);
    let Some(product) = product else {
        anyhow::bail!("product '{product_id}' not found");
    };

    let path = config.cart_path.as_path();
    let mut cart = Cart::load(path)?;
    let name = product.name.clone();
    cart.add(product, quantity, selection)?;
    cart.save(path)?;

    tracing::debug!(product_id, quantity, path = %path.display(), "cart updated");
    println!(
        "added {quantity} x {name}; cart has {} items",
        cart.item_count()
    );
    Ok(())
}

async fn run_cart_export(config: &AppConfig, out: &std::path::Path) -> anyhow::Result<()> {
    let cart = Cart::load(&config.cart_path)?;
    let source = HttpImageSource::new(config.image_timeout_secs, &config.user_agent)?;
    let options = ExportOptions::new(&config.company_name);

    match export_quote(&source, &cart, &options).await? {
        Some(bytes) => {
            write_pdf(out, &bytes)?;
            println!(
                "wrote quote with {} lines to {}",
                cart.items.len(),
                out.display()
            );
        }
        None => println!("cart is empty; nothing to export"),
    }
    Ok(())
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("cart is empty");
        return;
    }

    println!(
        "{:<4}{:<34}{:<30}{:<6}{:<16}TOTAL",
        "#", "PRODUCT", "VARIANT", "QTY", "UNIT"
    );
    for (i, item) in cart.items.iter().enumerate() {
        let variant = item.selection.describe();
        println!(
            "{:<4}{:<34}{:<30}{:<6}{:<16}{}",
            i + 1,
            clip(&item.product.name, 33),
            clip(or_dash(Some(variant.as_str())), 29),
            item.quantity,
            item.unit_price().map_or_else(|| "-".to_owned(), format_price),
            item.line_total().map_or_else(|| "-".to_owned(), format_price),
        );
    }
    println!(
        "\n{} items, grand total {}",
        cart.item_count(),
        format_price(cart.total())
    );
}
