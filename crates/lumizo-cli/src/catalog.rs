//! Public catalog browsing.
//!
//! Every command here goes through a [`CatalogSession`], so an unreachable
//! API degrades to the fallback dataset and the session notice is printed
//! to stderr instead of failing the command.

use clap::{Args, Subcommand};
use lumizo_api::LumizoClient;
use lumizo_catalog::{CatalogSession, DataSource, NoticeLevel};
use lumizo_core::pricing::format_price;
use lumizo_core::{
    load_fallback_dataset, parse_location, AppConfig, FilterUpdate, Product, SortField, SortOrder,
};

use crate::{api_client, or_dash};

/// Sub-commands available under `catalog`.
#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// Search products with filters
    Search {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List categories as a parent/child tree
    Categories,
    /// List brands
    Brands,
    /// List tags
    Tags,
    /// Show one product in detail
    Product {
        /// Product id
        id: String,
    },
}

/// Filter flags shared by `catalog search` and `export catalog`.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Free-text search over name, model and brand
    #[arg(long)]
    pub search: Option<String>,
    /// Category id; a parent category includes its subcategories
    #[arg(long)]
    pub category: Option<String>,
    /// Brand id
    #[arg(long)]
    pub brand: Option<String>,
    /// Tag id
    #[arg(long)]
    pub tag: Option<String>,
    /// Sort field: name, price or createdAt
    #[arg(long)]
    pub sort: Option<SortField>,
    /// Sort order: asc or desc
    #[arg(long)]
    pub order: Option<SortOrder>,
    /// Page number, starting at 1
    #[arg(long, allow_negative_numbers = true)]
    pub page: Option<i64>,
    /// Products per page
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,
    /// Catalog location to seed from, e.g. '/products?search=led&tag=t1'
    #[arg(long)]
    pub url: Option<String>,
}

impl FilterArgs {
    /// Filter changes in application order. The location seed comes first so
    /// explicit flags override it; pagination comes last because any other
    /// change resets the page.
    pub(crate) fn updates(&self) -> Vec<FilterUpdate> {
        let mut updates = Vec::new();
        if let Some(location) = &self.url {
            let seed = parse_location(location);
            updates.push(FilterUpdate::Search(seed.search));
            updates.push(FilterUpdate::Tag(seed.tag));
            updates.push(FilterUpdate::TagName(seed.tag_name));
        }
        if let Some(search) = &self.search {
            updates.push(FilterUpdate::Search(Some(search.clone())));
        }
        if let Some(category) = &self.category {
            updates.push(FilterUpdate::Category(Some(category.clone())));
        }
        if let Some(brand) = &self.brand {
            updates.push(FilterUpdate::Brand(Some(brand.clone())));
        }
        if let Some(tag) = &self.tag {
            updates.push(FilterUpdate::Tag(Some(tag.clone())));
        }
        if let Some(sort) = self.sort {
            updates.push(FilterUpdate::SortBy(sort));
        }
        if let Some(order) = self.order {
            updates.push(FilterUpdate::SortOrder(order));
        }
        if let Some(limit) = self.limit {
            updates.push(FilterUpdate::Limit(limit));
        }
        if let Some(page) = self.page {
            updates.push(FilterUpdate::Page(page));
        }
        updates
    }
}

pub(crate) async fn run(config: &AppConfig, command: CatalogCommands) -> anyhow::Result<()> {
    match command {
        CatalogCommands::Search { filters } => run_catalog_search(config, &filters).await,
        CatalogCommands::Categories => run_catalog_categories(config).await,
        CatalogCommands::Brands => run_catalog_brands(config).await,
        CatalogCommands::Tags => run_catalog_tags(config).await,
        CatalogCommands::Product { id } => run_catalog_product(config, &id).await,
    }
}

/// Builds a session over the configured API and fallback dataset. Nothing
/// is fetched yet.
pub(crate) fn new_session(config: &AppConfig) -> anyhow::Result<CatalogSession<LumizoClient>> {
    let client = api_client(config)?;
    let dataset = load_fallback_dataset(config.fallback_path.as_deref())?;
    Ok(CatalogSession::new(client, dataset, config.page_limit))
}

/// Loads facets and the first result page for `filters`.
pub(crate) async fn open_session(
    config: &AppConfig,
    filters: &FilterArgs,
) -> anyhow::Result<CatalogSession<LumizoClient>> {
    let mut session = new_session(config)?;
    session.load_facets().await;
    if !session.apply_filters(filters.updates()).await {
        session.refresh().await;
    }
    Ok(session)
}

/// Prints and clears the pending session notice, if any.
pub(crate) fn print_notice(session: &mut CatalogSession<LumizoClient>) {
    if let Some(notice) = session.take_notice() {
        let label = match notice.level {
            NoticeLevel::Info => "note",
            NoticeLevel::Warning => "warning",
        };
        eprintln!("{label}: {}", notice.message);
    }
}

/// Brand display name: the populated reference first, then the facet list.
pub(crate) fn brand_label(session: &CatalogSession<LumizoClient>, product: &Product) -> String {
    product
        .brand
        .as_ref()
        .and_then(|b| b.name())
        .or_else(|| product.brand_id().and_then(|id| session.brand_name(id)))
        .or_else(|| product.brand_id())
        .unwrap_or("-")
        .to_owned()
}

pub(crate) fn price_label(product: &Product) -> String {
    product
        .active_price()
        .map_or_else(|| "On request".to_owned(), format_price)
}

/// Shortens `text` to `width` characters, marking the cut with `..`.
pub(crate) fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_owned();
    }
    let kept: String = text.chars().take(width.saturating_sub(2)).collect();
    format!("{kept}..")
}

async fn run_catalog_search(config: &AppConfig, filters: &FilterArgs) -> anyhow::Result<()> {
    let mut session = open_session(config, filters).await?;
    print_notice(&mut session);

    if session.products().is_empty() {
        println!("no products match {}", session.location());
        return Ok(());
    }

    println!("{:<26}{:<34}{:<16}{:<20}PRICE", "ID", "NAME", "MODEL", "BRAND");
    for product in session.products() {
        println!(
            "{:<26}{:<34}{:<16}{:<20}{}",
            clip(&product.id, 25),
            clip(&product.name, 33),
            clip(or_dash(product.model.as_deref()), 15),
            clip(&brand_label(&session, product), 19),
            price_label(product),
        );
    }

    let pagination = session.pagination();
    let source = match session.source() {
        DataSource::Remote => "",
        DataSource::Fallback => " [offline sample data]",
    };
    println!(
        "\npage {} of {} ({} products){source}",
        pagination.current_page, pagination.total_pages, pagination.total_products
    );
    println!("location: {}", session.location());
    Ok(())
}

async fn run_catalog_categories(config: &AppConfig) -> anyhow::Result<()> {
    let mut session = new_session(config)?;
    session.load_facets().await;
    print_notice(&mut session);

    let tree = session.category_tree();
    let roots = tree.roots();
    if roots.is_empty() {
        println!("no categories found");
        return Ok(());
    }

    println!("{:<26}NAME", "ID");
    for root in roots {
        println!("{:<26}{}", root, tree.name(root).unwrap_or(root));
        for child in tree.children(root) {
            println!("{:<26}  {}", child, tree.name(child).unwrap_or(child.as_str()));
        }
    }
    Ok(())
}

async fn run_catalog_brands(config: &AppConfig) -> anyhow::Result<()> {
    let mut session = new_session(config)?;
    session.load_facets().await;
    print_notice(&mut session);

    if session.brands().is_empty() {
        println!("no brands found");
        return Ok(());
    }
    println!("{:<26}{:<30}LOGO", "ID", "NAME");
    for brand in session.brands() {
        println!(
            "{:<26}{:<30}{}",
            brand.id,
            clip(&brand.name, 29),
            or_dash(brand.image.as_deref())
        );
    }
    Ok(())
}

async fn run_catalog_tags(config: &AppConfig) -> anyhow::Result<()> {
    let mut session = new_session(config)?;
    session.load_facets().await;
    print_notice(&mut session);

    if session.tags().is_empty() {
        println!("no tags found");
        return Ok(());
    }
    println!("{:<26}NAME", "ID");
    for tag in session.tags() {
        println!("{:<26}{}", tag.id, tag.name);
    }
    Ok(())
}

async fn run_catalog_product(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let mut session = new_session(config)?;
    session.load_facets().await;
    let product = session.product(id).await;
    print_notice(&mut session);

    let Some(product) = product else {
        anyhow::bail!("product '{id}' not found");
    };

    let category = product
        .category
        .as_ref()
        .and_then(|c| c.name().map(str::to_owned))
        .or_else(|| {
            product
                .category_id()
                .and_then(|c| session.category_tree().path_name(c))
        });

    println!("{}", product.name);
    println!("  id:          {}", product.id);
    println!("  model:       {}", or_dash(product.model.as_deref()));
    println!("  brand:       {}", brand_label(&session, &product));
    println!("  category:    {}", or_dash(category.as_deref()));
    println!("  price:       {}", price_label(&product));
    if let Some(mrp) = product.mrp {
        match product.discount_percent() {
            Some(pct) if pct > 0 => println!("  mrp:         {} ({pct}% off)", format_price(mrp)),
            _ => println!("  mrp:         {}", format_price(mrp)),
        }
    }
    println!("  price type:  {}", product.active_price_type);
    for (label, options) in [
        ("sizes", &product.sizes),
        ("colors", &product.colors),
        ("shapes", &product.shapes),
        ("types", &product.types),
    ] {
        if !options.is_empty() {
            println!("  {label:<13}{}", options.join(", "));
        }
    }
    if !product.tags.is_empty() {
        let tags: Vec<&str> = product
            .tags
            .iter()
            .map(|t| t.name().unwrap_or_else(|| t.id()))
            .collect();
        println!("  tags:        {}", tags.join(", "));
    }
    if product.is_special {
        println!("  special:     yes");
    }
    println!("  spec sheet:  {}", or_dash(product.spec_sheet.as_deref()));
    for image in &product.images {
        println!("  image:       {image}");
    }
    if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
        println!("\n{description}");
    }
    Ok(())
}
