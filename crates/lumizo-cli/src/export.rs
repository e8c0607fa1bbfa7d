//! PDF export commands. The cart quote is under `cart export`.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use lumizo_core::{AppConfig, FilterUpdate, Product};
use lumizo_pdf::{export_catalog, write_pdf, ExportOptions, HttpImageSource, NameIndex};

use crate::catalog::{open_session, print_notice, FilterArgs};

/// Sub-commands available under `export`.
#[derive(Debug, Subcommand)]
pub enum ExportCommands {
    /// Render the filtered catalog as a PDF table
    Catalog {
        /// Output file
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
        /// Include every result page, not just the current one
        #[arg(long)]
        all_pages: bool,
    },
}

pub(crate) async fn run(config: &AppConfig, command: ExportCommands) -> anyhow::Result<()> {
    match command {
        ExportCommands::Catalog {
            out,
            filters,
            all_pages,
        } => run_export_catalog(config, &out, &filters, all_pages).await,
    }
}

async fn run_export_catalog(
    config: &AppConfig,
    out: &Path,
    filters: &FilterArgs,
    all_pages: bool,
) -> anyhow::Result<()> {
    let mut session = open_session(config, filters).await?;
    print_notice(&mut session);

    let mut products: Vec<Product> = session.products().to_vec();
    if all_pages {
        while session.pagination().has_next() {
            let next = session.pagination().current_page + 1;
            let fetched = session.set_filter(FilterUpdate::Page(next)).await;
            print_notice(&mut session);
            if !fetched || session.products().is_empty() {
                break;
            }
            products.extend_from_slice(session.products());
        }
    }

    let names = NameIndex::new(session.brands(), session.categories());
    let source = HttpImageSource::new(config.image_timeout_secs, &config.user_agent)?;
    let options = ExportOptions::new(&config.company_name);

    match export_catalog(&source, &products, &names, &options).await? {
        Some(bytes) => {
            write_pdf(out, &bytes)?;
            println!(
                "wrote catalog with {} products to {}",
                products.len(),
                out.display()
            );
        }
        None => println!("no products match {}; nothing to export", session.location()),
    }
    Ok(())
}
