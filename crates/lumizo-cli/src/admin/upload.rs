use std::path::PathBuf;

use clap::Subcommand;
use lumizo_api::{LumizoClient, UploadKind};
use lumizo_catalog::upload_files;

use crate::or_dash;

/// Sub-commands available under `admin upload`.
#[derive(Debug, Subcommand)]
pub enum UploadCommands {
    /// Upload product images
    ProductImage {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Upload spec sheets (PDF)
    SpecSheet {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Upload brand logos
    BrandImage {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Delete an uploaded file by its public id
    Delete { public_id: String },
}

pub(crate) async fn run(client: &LumizoClient, command: UploadCommands) -> anyhow::Result<()> {
    let (kind, files) = match command {
        UploadCommands::ProductImage { files } => (UploadKind::ProductImage, files),
        UploadCommands::SpecSheet { files } => (UploadKind::SpecSheet, files),
        UploadCommands::BrandImage { files } => (UploadKind::BrandImage, files),
        UploadCommands::Delete { public_id } => {
            client.delete_upload(&public_id).await?;
            println!("deleted {public_id}");
            return Ok(());
        }
    };

    let uploaded = upload_files(client, kind, &files).await?;
    println!("{:<40}URL", "PUBLIC ID");
    for file in &uploaded {
        println!("{:<40}{}", or_dash(file.public_id.as_deref()), file.url);
    }
    Ok(())
}
