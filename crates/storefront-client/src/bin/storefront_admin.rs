//! Storefront admin command line
//!
//! Logs in with the configured credentials and renders the dashboard's list
//! pages, slide editors and order counters in the terminal.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use storefront_client::{
    BackendClient, Session, SessionBridge, connect,
    metrics::OrderMetrics,
    render::{TableRow, render_page},
    slides::SlideEditor,
};
use storefront_core::{
    Config, Listable,
    config::ListingConfig,
    context_error::{ContextError, Result, ResultExt},
    init_logging,
    listing::{ListOptions, ListView},
    types::SlideKind,
};
use tracing::{error, info};

/// Command line interface for the storefront admin toolkit
#[derive(Parser)]
#[command(
    name = "storefront-admin",
    version = env!("CARGO_PKG_VERSION"),
    about = "Terminal front end for the storefront admin dashboard"
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Administrator email
    #[arg(long, env = "STOREFRONT_EMAIL")]
    email: String,

    /// Administrator password
    #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
    password: String,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every list page
#[derive(Args)]
struct ListArgs {
    /// Filter rows by name
    #[arg(short, long, default_value = "")]
    query: String,

    /// Page to show
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    page: i64,

    /// Use the narrow pagination control
    #[arg(long)]
    compact: bool,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Log in and print the administrator identity
    Login,

    /// Product inventory
    Products(ListArgs),

    /// Customer orders
    Orders(ListArgs),

    /// Registered customers
    Customers(ListArgs),

    /// One customer's detail page
    Customer {
        /// Slug from the customer list's profile column
        slug: String,
    },

    /// Marketplace vendors
    Vendors(ListArgs),

    /// Product categories
    Categories(ListArgs),

    /// Show or edit a promotional slide
    Slides {
        /// Slide to edit (new-in, best-sellers, featured)
        #[arg(value_parser = parse_slide)]
        kind: SlideKind,

        /// Products to put on the slide
        #[arg(long, value_name = "PRODUCT_ID")]
        add: Vec<String>,

        /// Products to take off the slide
        #[arg(long, value_name = "PRODUCT_ID")]
        remove: Vec<String>,

        /// Send the selection to the backend
        #[arg(long)]
        save: bool,
    },

    /// Order counters from the dashboard landing page
    Metrics,
}

fn parse_slide(value: &str) -> std::result::Result<SlideKind, String> {
    value.parse().map_err(|e: storefront_core::Error| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();

    let config = Config::load_from(cli.config.as_deref())
        .with_context(|| "Failed to load configuration")?;
    init_logging(&config.logging)?;

    let (client, bridge) = connect(&config.backend)?;

    let session = bridge
        .authenticate(&cli.email, &cli.password)
        .await
        .map_err(|e| {
            error!(error = %e, "Login failed");
            ContextError::with_context(e, "Login failed")
        })?;
    info!(user = %session.display_name, "Logged in");

    run(cli.command, &client, &bridge, &session, &config.listing).await
}

/// Run one command, then close the session whatever the outcome
async fn run(
    command: Commands,
    client: &BackendClient,
    bridge: &SessionBridge,
    session: &Session,
    listing: &ListingConfig,
) -> Result<()> {
    let outcome = execute(command, client, session, listing).await;
    bridge.logout();
    outcome
}

async fn execute(
    command: Commands,
    client: &BackendClient,
    session: &Session,
    listing: &ListingConfig,
) -> Result<()> {
    let options = ListOptions::from(listing);
    let markers_for = |args: &ListArgs| {
        if args.compact {
            listing.compact_max_visible_pages
        } else {
            listing.max_visible_pages
        }
    };

    match command {
        Commands::Login => {
            println!("{} <{}> ({})", session.display_name, session.email, session.user_id);
        }
        Commands::Products(args) => {
            let view = show(options, &args, || client.list_products()).await;
            print!("{}", render_page(&view, markers_for(&args)));
        }
        Commands::Orders(args) => {
            let view = show(options, &args, || client.list_orders()).await;
            print!("{}", render_page(&view, markers_for(&args)));
        }
        Commands::Customers(args) => {
            let view = show(options, &args, || client.list_customers()).await;
            print!("{}", render_page(&view, markers_for(&args)));
        }
        Commands::Customer { slug } => {
            let customer = client
                .find_customer(&slug)
                .await
                .with_context(|| format!("Failed to load customer {slug}"))?;
            println!("Name:   {}", customer.name);
            println!("Email:  {}", customer.email);
            println!("Phone:  {}", customer.phone);
        }
        Commands::Vendors(args) => {
            let view = show(options, &args, || client.list_vendors()).await;
            print!("{}", render_page(&view, markers_for(&args)));
        }
        Commands::Categories(args) => {
            let view = show(options, &args, || client.list_categories()).await;
            print!("{}", render_page(&view, markers_for(&args)));
        }
        Commands::Slides {
            kind,
            add,
            remove,
            save,
        } => edit_slide(client, kind, &add, &remove, save).await?,
        Commands::Metrics => {
            let orders = client
                .list_orders()
                .await
                .with_context(|| "Failed to fetch orders")?;
            let metrics = OrderMetrics::from_orders(&orders);
            println!("Total orders:   {}", metrics.total_orders);
            println!("Pending:        {}", metrics.pending);
            println!("Dispatched:     {}", metrics.dispatched);
            println!("Delivered:      {}", metrics.delivered);
            println!("Cancelled:      {}", metrics.cancelled);
            println!("Items ordered:  {}", metrics.items);
            println!("Revenue:        {:.2}", metrics.revenue);
        }
    }
    Ok(())
}

/// Load a list view and apply the query and page from the command line
///
/// A failed fetch is reported and leaves the view empty.
async fn show<T, F, Fut>(options: ListOptions, args: &ListArgs, fetch: F) -> ListView<T>
where
    T: Listable + TableRow,
    F: FnOnce() -> Fut,
    Fut: Future<Output = storefront_core::Result<Vec<T>>>,
{
    let mut view = ListView::new(options);
    if let Some(notice) = view.load(fetch).await {
        eprintln!("Failed to fetch data: {}", notice.message);
    }
    view.set_query(args.query.as_str());
    view.set_page(args.page);
    view
}

async fn edit_slide(
    client: &BackendClient,
    kind: SlideKind,
    add: &[String],
    remove: &[String],
    save: bool,
) -> Result<()> {
    let mut editor = SlideEditor::load(client, kind)
        .await
        .with_context(|| format!("Failed to load {}", kind.label()))?;

    for id in add {
        editor.add(id)?;
    }
    for id in remove {
        if !editor.remove(id) {
            eprintln!("{id} is not in {}", kind.label());
        }
    }

    if save {
        editor
            .save(client)
            .await
            .with_context(|| format!("Failed to update {}", kind.label()))?;
        println!("{} updated successfully", kind.label());
    }

    println!("{}:", kind.label());
    for product in editor.selected_products() {
        let cells = product.cells();
        println!("  {}", cells.join("  "));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;
    use storefront_client::{SessionProvider, SessionStatus};
    use storefront_core::config::BackendConfig;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    async fn logged_in(server: &MockServer) -> (BackendClient, SessionBridge, Session) {
        Mock::given(method("POST"))
            .and(path("/api/v1/admin/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "admin-1",
                "name": "Ada",
                "email": "ada@example.com",
                "token": "tok"
            })))
            .mount(server)
            .await;

        let config = BackendConfig {
            base_url: Some(format!("{}/api/v1", server.uri())),
            ..BackendConfig::default()
        };
        let (client, bridge) = connect(&config).unwrap();
        let session = bridge.authenticate("ada@example.com", "secret").await.unwrap();
        (client, bridge, session)
    }

    #[test]
    fn test_customer_subcommand_takes_a_slug() {
        let cli = Cli::try_parse_from([
            "storefront-admin",
            "--email",
            "ada@example.com",
            "--password",
            "secret",
            "customer",
            "taskane-marina",
        ])
        .unwrap();

        match cli.command {
            Commands::Customer { slug } => assert_eq!(slug, "taskane-marina"),
            _ => panic!("expected the customer subcommand"),
        }
    }

    #[tokio::test]
    async fn test_failed_metrics_still_logs_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/all/orders"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (client, bridge, session) = logged_in(&server).await;
        assert!(bridge.provider().status().is_authenticated());

        let outcome = run(
            Commands::Metrics,
            &client,
            &bridge,
            &session,
            &ListingConfig::default(),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(bridge.provider().status(), SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn test_unknown_customer_still_logs_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/all/customers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let (client, bridge, session) = logged_in(&server).await;
        let outcome = run(
            Commands::Customer {
                slug: "nobody".to_string(),
            },
            &client,
            &bridge,
            &session,
            &ListingConfig::default(),
        )
        .await;

        assert!(outcome.is_err());
        assert!(bridge.provider().session().is_none());
    }
}
