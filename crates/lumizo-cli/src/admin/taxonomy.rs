//! Category, brand and tag administration.

use std::path::PathBuf;

use clap::Subcommand;
use lumizo_api::{CategoryNode, LumizoClient};
use lumizo_core::{BrandInput, Category, CategoryInput, TagInput};

use crate::or_dash;

/// Sub-commands available under `admin category`.
#[derive(Debug, Subcommand)]
pub enum CategoryCommands {
    /// List every category with its parent
    List,
    /// Show the nested category tree
    Tree,
    /// List top-level categories
    Parents,
    /// List the subcategories of a category
    Children { id: String },
    Get { id: String },
    Create {
        #[arg(long)]
        name: String,
        /// Parent category id
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// Parent category id; an empty value makes it top-level
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete { id: String },
}

/// Sub-commands available under `admin brand`.
#[derive(Debug, Subcommand)]
pub enum BrandCommands {
    List,
    Get { id: String },
    Create {
        #[arg(long)]
        name: String,
        /// Logo file sent with the request
        #[arg(long, conflicts_with = "image_url")]
        logo: Option<PathBuf>,
        /// Logo URL of an already uploaded image
        #[arg(long)]
        image_url: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, conflicts_with = "image_url")]
        logo: Option<PathBuf>,
        #[arg(long)]
        image_url: Option<String>,
    },
    Delete { id: String },
}

/// Sub-commands available under `admin tag`.
#[derive(Debug, Subcommand)]
pub enum TagCommands {
    List,
    Get { id: String },
    Create {
        #[arg(long)]
        name: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: String,
    },
    Delete { id: String },
}

pub(crate) async fn run_category(
    client: &LumizoClient,
    command: CategoryCommands,
) -> anyhow::Result<()> {
    match command {
        CategoryCommands::List => print_categories(&client.list_categories().await?),
        CategoryCommands::Tree => {
            let tree = client.category_tree().await?;
            if tree.is_empty() {
                println!("no categories found");
            }
            for node in &tree {
                print_node(node, 0);
            }
        }
        CategoryCommands::Parents => print_categories(&client.parent_categories().await?),
        CategoryCommands::Children { id } => print_categories(&client.subcategories(&id).await?),
        CategoryCommands::Get { id } => {
            let category = client.get_category(&id).await?;
            println!("{}", serde_json::to_string_pretty(&category)?);
        }
        CategoryCommands::Create {
            name,
            parent,
            description,
        } => {
            let input = CategoryInput {
                name: Some(name),
                parent,
                description,
            };
            let category = client.create_category(&input).await?;
            println!("created category {} ({})", category.id, category.name);
        }
        CategoryCommands::Update {
            id,
            name,
            parent,
            description,
        } => {
            let input = CategoryInput {
                name,
                parent,
                description,
            };
            let category = client.update_category(&id, &input).await?;
            println!("updated category {} ({})", category.id, category.name);
        }
        CategoryCommands::Delete { id } => {
            client.delete_category(&id).await?;
            println!("deleted category {id}");
        }
    }
    Ok(())
}

fn print_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("no categories found");
        return;
    }
    println!("{:<26}{:<30}PARENT", "ID", "NAME");
    for category in categories {
        let parent = category
            .parent
            .as_ref()
            .map(|p| p.name().unwrap_or_else(|| p.id()));
        println!("{:<26}{:<30}{}", category.id, category.name, or_dash(parent));
    }
}

fn print_node(node: &CategoryNode, depth: usize) {
    println!(
        "{:indent$}{} ({})",
        "",
        node.category.name,
        node.category.id,
        indent = depth * 2
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}

pub(crate) async fn run_brand(client: &LumizoClient, command: BrandCommands) -> anyhow::Result<()> {
    match command {
        BrandCommands::List => {
            let brands = client.list_brands().await?;
            if brands.is_empty() {
                println!("no brands found");
            } else {
                println!("{:<26}{:<30}LOGO", "ID", "NAME");
            }
            for brand in &brands {
                println!(
                    "{:<26}{:<30}{}",
                    brand.id,
                    brand.name,
                    or_dash(brand.image.as_deref())
                );
            }
        }
        BrandCommands::Get { id } => {
            let brand = client.get_brand(&id).await?;
            println!("{}", serde_json::to_string_pretty(&brand)?);
        }
        BrandCommands::Create {
            name,
            logo,
            image_url,
        } => {
            let input = BrandInput {
                name: Some(name),
                image: image_url,
            };
            let brand = client.create_brand(&input, logo.as_deref()).await?;
            println!("created brand {} ({})", brand.id, brand.name);
        }
        BrandCommands::Update {
            id,
            name,
            logo,
            image_url,
        } => {
            let input = BrandInput {
                name,
                image: image_url,
            };
            let brand = client.update_brand(&id, &input, logo.as_deref()).await?;
            println!("updated brand {} ({})", brand.id, brand.name);
        }
        BrandCommands::Delete { id } => {
            client.delete_brand(&id).await?;
            println!("deleted brand {id}");
        }
    }
    Ok(())
}

pub(crate) async fn run_tag(client: &LumizoClient, command: TagCommands) -> anyhow::Result<()> {
    match command {
        TagCommands::List => {
            let tags = client.list_tags().await?;
            if tags.is_empty() {
                println!("no tags found");
            } else {
                println!("{:<26}NAME", "ID");
            }
            for tag in &tags {
                println!("{:<26}{}", tag.id, tag.name);
            }
        }
        TagCommands::Get { id } => {
            let tag = client.get_tag(&id).await?;
            println!("{}", serde_json::to_string_pretty(&tag)?);
        }
        TagCommands::Create { name } => {
            let tag = client.create_tag(&TagInput { name }).await?;
            println!("created tag {} ({})", tag.id, tag.name);
        }
        TagCommands::Update { id, name } => {
            let tag = client.update_tag(&id, &TagInput { name }).await?;
            println!("updated tag {} ({})", tag.id, tag.name);
        }
        TagCommands::Delete { id } => {
            client.delete_tag(&id).await?;
            println!("deleted tag {id}");
        }
    }
    Ok(())
}
