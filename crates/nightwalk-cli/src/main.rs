mod report;
mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nightwalk_api::{RoadQuery, RouteRequest, SafetyApiClient};
use nightwalk_core::{parse_coordinates, AppConfig, LatLng};
use nightwalk_view::{AppEvent, AppState, MapViewConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nightwalk")]
#[command(about = "Night-return safety map client")]
struct Cli {
    /// Map center as "lat, lng". Defaults to NIGHTWALK_DEFAULT_CENTER.
    #[arg(long, global = true, value_parser = parse_center)]
    center: Option<LatLng>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Area safety summary and nearby places.
    Safety {
        /// Print the converted view model as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Safety-scored road segments around the center.
    Roads {
        #[arg(long)]
        search_radius_m: Option<u32>,
        #[arg(long)]
        safety_radius_m: Option<u32>,
    },
    /// Compare candidate walking routes from the center to a destination.
    Routes {
        #[arg(long, value_parser = parse_center)]
        to: LatLng,
        #[arg(long, default_value_t = session::DEFAULT_ROUTE_RADIUS_M)]
        radius_m: u32,
    },
    /// Render the map scene as JSON.
    Scene {
        /// Load the view model from a JSON file instead of the backend.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Also fetch and draw the road overlay.
        #[arg(long)]
        roads: bool,
        /// Also compare routes to this destination and draw them.
        #[arg(long, value_parser = parse_center)]
        to: Option<LatLng>,
    },
    /// Ask the host to dial the emergency number.
    Emergency,
    /// Follow live location updates until interrupted.
    Follow {
        /// Override NIGHTWALK_LIVE_URL.
        #[arg(long)]
        live_url: Option<String>,
    },
}

fn parse_center(input: &str) -> Result<LatLng, String> {
    parse_coordinates(input).map_err(|e| e.to_string())
}

fn road_query(config: &AppConfig, search: Option<u32>, safety: Option<u32>) -> RoadQuery {
    RoadQuery {
        search_radius_m: search.unwrap_or(config.search_radius_m),
        safety_radius_m: safety.unwrap_or(config.safety_radius_m),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = nightwalk_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let center = cli.center.unwrap_or(config.default_center);
    tracing::debug!(env = %config.env, %center, "starting");

    match cli.command {
        Commands::Safety { json } => {
            let api = SafetyApiClient::from_config(&config)?;
            let data = api.load_safety_data(center).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                report::print_safety(&data);
            }
        }
        Commands::Roads {
            search_radius_m,
            safety_radius_m,
        } => {
            let api = SafetyApiClient::from_config(&config)?;
            let query = road_query(&config, search_radius_m, safety_radius_m);
            let data = api.load_road_safety(center, query).await?;
            report::print_roads(&data);
        }
        Commands::Routes { to, radius_m } => {
            let api = SafetyApiClient::from_config(&config)?;
            let routes = api
                .find_safe_routes(&RouteRequest::new(center, to, radius_m))
                .await?;
            report::print_routes(&routes);
        }
        Commands::Scene { input, roads, to } => {
            let mut state = AppState::new(center);
            if let Some(path) = input {
                let text = tokio::fs::read_to_string(&path).await?;
                let data = nightwalk_api::parse_json_input(&text)?;
                state.apply(AppEvent::SafetyImported(data));
            } else {
                let api = SafetyApiClient::from_config(&config)?;
                let data = api.load_safety_data(center).await?;
                state.apply(AppEvent::SafetyLoaded(Ok(data)));
            }
            if roads {
                let api = SafetyApiClient::from_config(&config)?;
                let query = road_query(&config, None, None);
                let data = api.load_road_safety(state.center(), query).await?;
                state.apply(AppEvent::RoadsLoaded(Ok(data)));
            }
            if let Some(to) = to {
                let api = SafetyApiClient::from_config(&config)?;
                state.apply(AppEvent::RoutesRequested { to });
                let request =
                    RouteRequest::new(state.center(), to, session::DEFAULT_ROUTE_RADIUS_M);
                let routes = api.find_safe_routes(&request).await?;
                state.apply(AppEvent::RoutesLoaded(Ok(routes)));
            }
            let scene = state.scene(&MapViewConfig::default());
            println!("{}", serde_json::to_string_pretty(&scene)?);
        }
        Commands::Emergency => {
            let bridge = session::host_bridge(center);
            let mut state = AppState::new(center);
            if let Some(command) = state.apply(AppEvent::EmergencyCall) {
                println!("{}", session::run_host_command(&bridge, command));
            }
        }
        Commands::Follow { live_url } => {
            let live_url = live_url.unwrap_or_else(|| config.live_url.clone());
            session::follow(&config, center, &live_url).await?;
        }
    }

    Ok(())
}
