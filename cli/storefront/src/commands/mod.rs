mod browse;
mod categories;
mod create;
mod delete;
mod list;
mod show;
mod update;

use anyhow::Result;
use bpaf::Bpaf;
use indoc::indoc;
use storefront_catalog::Product;
use tracing::debug;

use crate::config::Config;
use crate::utils::init::init_catalog_client;

static STOREFRONT_DESCRIPTION: &'_ str = indoc! {"
    Browse and manage the products of a storefront catalog."
};

fn vec_len<T>(x: Vec<T>) -> usize {
    Vec::len(&x)
}

#[derive(Bpaf, Clone, Copy, Debug)]
pub enum Verbosity {
    Verbose(
        /// Increase logging verbosity
        ///
        /// Invoke multiple times for increasing detail.
        #[bpaf(short('v'), long("verbose"), req_flag(()), many, map(vec_len))]
        usize,
    ),

    /// Silence logs except for errors
    #[bpaf(short, long)]
    Quiet,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Verbose(0)
    }
}

#[derive(Bpaf)]
#[bpaf(options, descr(STOREFRONT_DESCRIPTION))]
pub struct StorefrontCli(#[bpaf(external(storefront_args))] pub StorefrontArgs);

/// Main storefront args parser
///
/// To parse the storefront CLI, use [`StorefrontCli`] instead using [`storefront_cli()`].
#[derive(Debug, Bpaf)]
#[bpaf(ignore_rustdoc)] // we don't want this struct to be interpreted as a group
pub struct StorefrontArgs {
    /// Verbose mode
    ///
    /// Invoke multiple times for increasing detail.
    #[bpaf(external, fallback(Default::default()))]
    pub verbosity: Verbosity,

    #[bpaf(external(commands))]
    command: Commands,
}

impl StorefrontArgs {
    pub async fn handle(self, config: Config) -> Result<()> {
        let client = init_catalog_client(&config)?;
        debug!(command = ?self.command, "running command");

        match self.command {
            Commands::Categories(args) => args.handle(client).await,
            Commands::List(args) => args.handle(&config, client).await,
            Commands::Show(args) => args.handle(client).await,
            Commands::Create(args) => args.handle(&config, client).await,
            Commands::Update(args) => args.handle(&config, client).await,
            Commands::Delete(args) => args.handle(client).await,
            Commands::Browse(args) => args.handle(&config, client).await,
        }
    }
}

#[derive(Bpaf, Clone, Debug)]
enum Commands {
    /// List the product categories
    #[bpaf(command)]
    Categories(#[bpaf(external(categories::categories))] categories::Categories),

    /// List one page of products
    #[bpaf(command)]
    List(#[bpaf(external(list::list))] list::List),

    /// Show details about a single product
    #[bpaf(command)]
    Show(#[bpaf(external(show::show))] show::Show),

    /// Create a product
    #[bpaf(command)]
    Create(#[bpaf(external(create::create))] create::Create),

    /// Update an existing product
    #[bpaf(command)]
    Update(#[bpaf(external(update::update))] update::Update),

    /// Delete a product
    #[bpaf(command)]
    Delete(#[bpaf(external(delete::delete))] delete::Delete),

    /// Browse the catalog interactively
    #[bpaf(command)]
    Browse(#[bpaf(external(browse::browse))] browse::Browse),
}

/// One line of a product listing
fn product_row(product: &Product) -> String {
    format!(
        "{id:>5}  {title}  ${price:.2}  [{category}]",
        id = product.id.get(),
        title = product.title,
        price = product.price,
        category = product.category.name,
    )
}

/// Detail view of a single product
fn product_detail(product: &Product) -> String {
    let mut out = format!(
        "{title} (ID {id})\n  Price:       ${price:.2}\n  Category:    {category}\n  Description: {description}\n",
        title = product.title,
        id = product.id,
        price = product.price,
        category = product.category.name,
        description = product.description.replace('\n', " "),
    );
    out.push_str("  Images:\n");
    for image in &product.images {
        out.push_str(&format!("    {image}\n"));
    }
    out
}
