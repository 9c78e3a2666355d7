use std::fmt::Write as _;
use std::io::Write as _;
use std::str::FromStr;

use anyhow::Result;
use bpaf::Bpaf;
use indoc::indoc;
use itertools::Itertools;
use storefront_catalog::{CatalogClientError, CategoryFilter, Client, ClientTrait, ProductId};
use storefront_sdk::{CatalogController, Notice, SessionStatus};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, instrument};

use super::{product_detail, product_row};
use crate::config::Config;
use crate::utils::message;

const BROWSE_HELP: &str = indoc! {"
    n             next page
    p             previous page
    c <id|all>    filter by category
    s <id>        show a product
    d <id>        delete a product
    r             reload the current page
    h             show this help
    q             quit"
};

// Browse the catalog interactively
#[derive(Debug, Bpaf, Clone)]
pub struct Browse {}

impl Browse {
    #[instrument(name = "browse", skip_all)]
    pub async fn handle(self, config: &Config, client: Client) -> Result<()> {
        let mut controller = CatalogController::new(client, config.controller_options());
        if let Err(err) = controller.start().await {
            debug!(%err, "catalog did not load completely");
        }
        print!("{}", render_categories(&controller));
        print!("{}", render_listing(&controller));

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let command = match line.parse::<BrowseCommand>() {
                Ok(command) => command,
                Err(err) => {
                    message::warning(err);
                    continue;
                },
            };

            match apply(&mut controller, command).await {
                Step::Quit => break,
                Step::Output(output) => print!("{output}"),
            }
            show_notice(&mut controller);
        }
        Ok(())
    }
}

/// A line of input in browse mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseCommand {
    Next,
    Previous,
    Category(CategoryFilter),
    Show(ProductId),
    Delete(ProductId),
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
enum BrowseCommandError {
    #[error("unknown command '{0}', type 'h' for help")]
    Unknown(String),
    #[error("'{0}' expects {1}")]
    MissingArgument(&'static str, &'static str),
    #[error("'{0}' is not a valid product id")]
    InvalidId(String),
    #[error("'{0}' is not a category id or 'all'")]
    InvalidCategory(String),
}

impl FromStr for BrowseCommand {
    type Err = BrowseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let command = words.next().unwrap_or_default();
        let argument = words.next();

        let product_id = |name: &'static str| -> Result<ProductId, BrowseCommandError> {
            let argument = argument.ok_or(BrowseCommandError::MissingArgument(name, "a product id"))?;
            argument
                .parse::<ProductId>()
                .map_err(|_| BrowseCommandError::InvalidId(argument.to_string()))
        };

        match command {
            "n" | "next" => Ok(BrowseCommand::Next),
            "p" | "prev" | "previous" => Ok(BrowseCommand::Previous),
            "c" | "category" => {
                let argument = argument.ok_or(BrowseCommandError::MissingArgument(
                    "category",
                    "a category id or 'all'",
                ))?;
                argument
                    .parse::<CategoryFilter>()
                    .map(BrowseCommand::Category)
                    .map_err(|_| BrowseCommandError::InvalidCategory(argument.to_string()))
            },
            "s" | "show" => product_id("show").map(BrowseCommand::Show),
            "d" | "delete" => product_id("delete").map(BrowseCommand::Delete),
            "r" | "reload" => Ok(BrowseCommand::Refresh),
            "h" | "help" | "?" => Ok(BrowseCommand::Help),
            "q" | "quit" | "exit" => Ok(BrowseCommand::Quit),
            other => Err(BrowseCommandError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Output(String),
    Quit,
}

/// Run one command against the controller and render its result.
///
/// Failed fetches are reported through the listing status,
/// failed deletes through the controller's notice.
async fn apply<C: ClientTrait>(controller: &mut CatalogController<C>, command: BrowseCommand) -> Step {
    debug!(?command, "browse command");
    let result = match command {
        BrowseCommand::Quit => return Step::Quit,
        BrowseCommand::Help => return Step::Output(format!("{BROWSE_HELP}\n")),
        BrowseCommand::Show(id) => {
            return Step::Output(match controller.product_detail(id).await {
                Ok(product) => product_detail(&product),
                Err(CatalogClientError::NotFound) => "Error: Product not found.\n".to_string(),
                Err(err) => format!("Error: {err}\n"),
            });
        },
        BrowseCommand::Next => controller.listing_mut().next_page().await,
        BrowseCommand::Previous => controller.listing_mut().previous_page().await,
        BrowseCommand::Category(category) => controller.set_category_filter(category).await,
        BrowseCommand::Refresh => controller.listing_mut().refresh().await,
        BrowseCommand::Delete(id) => controller.delete_product(id).await,
    };
    if let Err(err) = result {
        debug!(%err, "browse command failed");
    }
    Step::Output(render_listing(controller))
}

fn show_notice<C: ClientTrait>(controller: &mut CatalogController<C>) {
    match controller.notifier_mut().dismiss() {
        Some(Notice::Success(text)) => message::deleted(text),
        Some(Notice::Error(text)) => message::error(text),
        None => {},
    }
}

fn render_categories<C: ClientTrait>(controller: &CatalogController<C>) -> String {
    let categories = controller.categories();
    match categories.status() {
        SessionStatus::Error(msg) => format!("Error: {msg}\n"),
        _ => format!(
            "Categories: all, {}\n",
            categories
                .categories()
                .map(|option| format!("{} ({})", option.filter, option.name))
                .join(", ")
        ),
    }
}

fn render_listing<C: ClientTrait>(controller: &CatalogController<C>) -> String {
    let listing = controller.listing();
    let category = controller
        .categories()
        .name_of(listing.category())
        .map(ToString::to_string)
        .unwrap_or_else(|| format!("Category {}", listing.category()));

    let mut out = format!("\n== {category} | page {} ==\n", listing.page());
    match listing.status() {
        SessionStatus::Error(msg) => {
            let _ = writeln!(out, "Error: {msg}");
        },
        _ if listing.items().is_empty() => out.push_str("No products found.\n"),
        _ => {
            for product in listing.items() {
                let _ = writeln!(out, "{}", product_row(product));
            }
        },
    }

    let mut actions = Vec::new();
    if listing.has_previous() {
        actions.push("[p]revious");
    }
    if listing.has_more() {
        actions.push("[n]ext");
    }
    actions.push("[h]elp");
    let _ = writeln!(out, "{}", actions.join("  "));
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use storefront_catalog::test_helpers::{category, product, products};
    use storefront_catalog::{CategoryId, MockClient, MockRequest};
    use storefront_sdk::ControllerOptions;

    use super::*;
    use crate::utils::message::history::History;

    async fn started(mock: &MockClient) -> CatalogController<MockClient> {
        mock.push_categories(vec![category(1, "Clothes"), category(2, "Shoes")]);
        mock.push_products(products(1, 12, 1));
        let mut controller = CatalogController::new(mock.clone(), ControllerOptions::default());
        controller.start().await.unwrap();
        controller
    }

    #[test]
    fn parses_commands() {
        assert_eq!("n".parse::<BrowseCommand>(), Ok(BrowseCommand::Next));
        assert_eq!("previous".parse::<BrowseCommand>(), Ok(BrowseCommand::Previous));
        assert_eq!(
            "c 2".parse::<BrowseCommand>(),
            Ok(BrowseCommand::Category(CategoryFilter::Category(
                CategoryId::from(2)
            )))
        );
        assert_eq!("c all".parse::<BrowseCommand>(), Ok(BrowseCommand::Category(CategoryFilter::All)));
        assert_eq!("d 7".parse::<BrowseCommand>(), Ok(BrowseCommand::Delete(ProductId::from(7))));
        assert_eq!("q".parse::<BrowseCommand>(), Ok(BrowseCommand::Quit));
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!(
            "d".parse::<BrowseCommand>(),
            Err(BrowseCommandError::MissingArgument("delete", "a product id"))
        );
        assert_eq!(
            "s seven".parse::<BrowseCommand>(),
            Err(BrowseCommandError::InvalidId("seven".to_string()))
        );
        assert_eq!(
            "c shoes".parse::<BrowseCommand>(),
            Err(BrowseCommandError::InvalidCategory("shoes".to_string()))
        );
        assert_eq!(
            "x".parse::<BrowseCommand>(),
            Err(BrowseCommandError::Unknown("x".to_string()))
        );
    }

    #[tokio::test]
    async fn first_render_shows_sentinel_and_next() {
        let mock = MockClient::new();
        let controller = started(&mock).await;

        assert_eq!(
            render_categories(&controller),
            "Categories: all, 1 (Clothes), 2 (Shoes)\n"
        );
        let rendered = render_listing(&controller);
        assert!(rendered.starts_with("\n== All Categories | page 1 ==\n"));
        assert!(rendered.ends_with("[n]ext  [h]elp\n"));
    }

    #[tokio::test]
    async fn category_then_next_page() {
        let mock = MockClient::new();
        let mut controller = started(&mock).await;
        mock.push_products(products(20, 12, 2));
        mock.push_products(products(32, 1, 2));

        apply(
            &mut controller,
            BrowseCommand::Category(CategoryFilter::Category(CategoryId::from(2))),
        )
        .await;
        let Step::Output(rendered) = apply(&mut controller, BrowseCommand::Next).await else {
            panic!("expected output");
        };

        assert!(rendered.starts_with("\n== Shoes | page 2 ==\n"));
        assert!(rendered.ends_with("[p]revious  [h]elp\n"));
        let MockRequest::ListProducts(query) = &mock.requests()[3] else {
            panic!("expected listing request");
        };
        assert_eq!(query.offset(), 12);
    }

    #[tokio::test]
    async fn delete_shows_notice_once() {
        let mock = MockClient::new();
        let mut controller = started(&mock).await;
        mock.push_deleted();
        mock.push_products(products(1, 11, 1));

        apply(&mut controller, BrowseCommand::Delete(ProductId::from(7))).await;
        show_notice(&mut controller);
        show_notice(&mut controller);

        assert_eq!(&History::global().messages(), &[
            "🗑️  Product with ID 7 deleted successfully!"
        ]);
        assert_eq!(controller.listing().items().len(), 11);
    }

    #[tokio::test]
    async fn failed_page_renders_error() {
        let mock = MockClient::new();
        let mut controller = started(&mock).await;
        mock.push_error_response(500);

        let Step::Output(rendered) = apply(&mut controller, BrowseCommand::Next).await else {
            panic!("expected output");
        };
        assert!(rendered.contains("Error: Failed to load products."));
        assert!(rendered.ends_with("[p]revious  [h]elp\n"));
    }

    #[tokio::test]
    async fn show_missing_product() {
        let mock = MockClient::new();
        let mut controller = started(&mock).await;
        mock.push_error_response(404);
        mock.push_product(product(3, 1));

        assert_eq!(
            apply(&mut controller, BrowseCommand::Show(ProductId::from(999))).await,
            Step::Output("Error: Product not found.\n".to_string())
        );
        let Step::Output(detail) =
            apply(&mut controller, BrowseCommand::Show(ProductId::from(3))).await
        else {
            panic!("expected output");
        };
        assert!(detail.starts_with("Product 3 (ID 3)"));
    }

    #[tokio::test]
    async fn quit_issues_no_request() {
        let mock = MockClient::new();
        let mut controller = started(&mock).await;
        assert_eq!(apply(&mut controller, BrowseCommand::Quit).await, Step::Quit);
        assert_eq!(mock.requests().len(), 2);
    }
}
