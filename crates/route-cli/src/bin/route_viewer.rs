use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use route_cli::{format_route_table, load_routes, EndpointArg, FilterArgs, SortArg};
use route_client::SearchClient;
use route_map::{MapConfig, MapSurface, RouteSelectionStore, SceneBackend, SortOrder};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List routes from a results file or a live search
    List(ListArgs),
    /// Render a route and its airports' runways as GeoJSON
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Saved search results. Searches the server when omitted.
    #[arg(long)]
    routes: Option<PathBuf>,

    /// Route search server URL
    #[arg(long, env = "ROUTE_SEARCH_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(flatten)]
    filters: FilterArgs,

    /// Column to sort by
    #[arg(long, value_enum, default_value_t = SortArg::Departure)]
    sort: SortArg,

    /// Sort descending
    #[arg(long)]
    desc: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Saved search results
    #[arg(long)]
    routes: PathBuf,

    /// Route to hover and select
    #[arg(long, default_value_t = 0)]
    index: usize,

    /// Center the view on one airport of the route
    #[arg(long, value_enum)]
    teleport: Option<EndpointArg>,

    /// Use the alternative basemap
    #[arg(long)]
    toggle_basemap: bool,

    /// Output file, stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so GeoJSON on stdout stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("route_viewer=info".parse()?)
                .add_directive("route_map=info".parse()?)
                .add_directive("route_client=info".parse()?),
        )
        .init();

    match Cli::parse().command {
        Command::List(args) => list(args).await,
        Command::Render(args) => render(args).await,
    }
}

async fn list(args: ListArgs) -> Result<()> {
    let routes = match &args.routes {
        Some(path) => {
            if !args.filters.is_empty() {
                tracing::warn!("filters only apply to server searches, ignoring");
            }
            load_routes(path)?
        }
        None => {
            let criteria = args.filters.to_criteria()?;
            SearchClient::new(args.url.as_str()).search(&criteria).await?
        }
    };

    let order = if args.desc {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    let mut store = RouteSelectionStore::with_routes(routes);
    store.sort_by(args.sort.into(), order);

    print!("{}", format_route_table(store.routes()));
    Ok(())
}

async fn render(args: RenderArgs) -> Result<()> {
    let routes = load_routes(&args.routes)?;
    let config = MapConfig::from_env();
    let mut surface = MapSurface::new(config.clone(), SceneBackend::load(config));
    let mut store = RouteSelectionStore::new();

    store.replace_routes(routes, &mut surface)?;
    store.hover(args.index, &mut surface)?;
    store.select(args.index, &mut surface)?;
    if let Some(endpoint) = args.teleport {
        store.teleport(endpoint.into(), &mut surface)?;
    }

    surface.ready().await?;
    let scene = surface
        .backend_mut()
        .context("map backend unavailable after load")?;
    if args.toggle_basemap {
        scene.toggle_basemap();
    }

    let geojson = serde_json::to_string_pretty(&scene.to_geojson())?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, geojson).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "scene written");
        }
        None => println!("{geojson}"),
    }
    Ok(())
}
