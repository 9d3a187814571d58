use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use trip_planner::aggregator::{ModeRoutes, RouteAggregator, RouteOutcome, RouteRequest};
use trip_planner::cache::CachedDirectionsClient;
use trip_planner::config::{DirectionsSource, PlannerConfig};
use trip_planner::directions::{
    DirectionsClient, DirectionsError, DirectionsProvider, DirectionsQuery, DirectionsResponse,
    MockDirectionsClient,
};
use trip_planner::domain::{PlaceId, PlaceRef, PlannedTrip, TravelMode, TripId, UserId};
use trip_planner::places::{PlaceLookup, SavedPlaces};
use trip_planner::selection::TripSelectionState;
use trip_planner::store::{FileStore, TripRepository};

#[derive(Parser, Debug)]
#[command(author, version, about = "Compare routes across travel modes and save trip plans")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and compare routes for every travel mode
    Routes(RouteArgs),

    /// Fetch routes and save one as a trip
    Save {
        /// Owner of the saved trip
        #[arg(long)]
        user: String,

        /// Trip name; defaults to "<origin> to <destination>"
        #[arg(long, default_value = "")]
        name: String,

        /// Mode whose route to keep; defaults to the first available
        #[arg(long)]
        mode: Option<TravelMode>,

        #[command(flatten)]
        route: RouteArgs,
    },

    /// List a user's saved trips
    List {
        user: String,
    },

    /// Delete a saved trip
    Delete {
        trip_id: String,
    },
}

#[derive(clap::Args, Debug)]
struct RouteArgs {
    /// Origin place id
    origin: PlaceId,

    /// Destination place id
    destination: PlaceId,

    /// Intermediate stop place ids, in visiting order
    waypoints: Vec<PlaceId>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = match PlannerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Directions backend selected by configuration.
enum Directions {
    Http(CachedDirectionsClient<DirectionsClient>),
    Mock(MockDirectionsClient),
}

impl Directions {
    fn from_config(config: &PlannerConfig) -> Result<Self> {
        match &config.directions {
            DirectionsSource::Http(directions) => {
                let client = DirectionsClient::new(directions.clone())?;
                Ok(Directions::Http(CachedDirectionsClient::new(client, &config.cache)))
            }
            DirectionsSource::Mock(dir) => {
                info!(dir = %dir.display(), "Using mock directions");
                Ok(Directions::Mock(MockDirectionsClient::from_dir(dir)?))
            }
        }
    }
}

impl DirectionsProvider for Directions {
    async fn get_directions(
        &self,
        query: &DirectionsQuery,
    ) -> Result<DirectionsResponse, DirectionsError> {
        match self {
            Directions::Http(client) => client.get_directions(query).await,
            Directions::Mock(client) => client.get_directions(query).await,
        }
    }
}

async fn run(command: Command, config: PlannerConfig) -> Result<ExitCode> {
    let repository = TripRepository::new(FileStore::new(&config.store_dir));

    match command {
        Command::Routes(args) => {
            let aggregator =
                RouteAggregator::new(Directions::from_config(&config)?, config.aggregator.clone());
            let request = RouteRequest::new(args.origin, args.destination, args.waypoints);
            let routes = aggregator.fetch_all_modes(&request).await;
            print_routes(&routes);

            if routes.first_available().is_none() {
                eprintln!("No route available for any travel mode");
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Save {
            user,
            name,
            mode,
            route: args,
        } => {
            let user = UserId::new(user)?;
            let places = load_places(config.saved_places_file.as_deref()).await?;

            let selection = TripSelectionState::new();
            selection
                .set_endpoints(
                    resolve(&places, &args.origin).await?,
                    resolve(&places, &args.destination).await?,
                )
                .await;

            let mut waypoints = Vec::with_capacity(args.waypoints.len());
            for id in &args.waypoints {
                waypoints.push(resolve(&places, id).await?);
            }
            selection.set_waypoints(waypoints).await;

            let request = selection
                .route_request()
                .await
                .ok_or_else(|| anyhow!("origin and destination are required"))?;
            let aggregator =
                RouteAggregator::new(Directions::from_config(&config)?, config.aggregator.clone());
            let routes = aggregator.fetch_all_modes(&request).await;
            print_routes(&routes);

            let chosen = match mode {
                Some(mode) => {
                    let route = routes
                        .route(mode)
                        .ok_or_else(|| anyhow!("no {mode} route to save"))?;
                    Some((mode, route))
                }
                None => routes.first_available(),
            };

            if chosen.is_none() {
                warn!("No route available, saving trip without route details");
            }

            let snapshot = selection.snapshot().await;
            let trip =
                PlannedTrip::from_selection(&snapshot, chosen.map(|(_, route)| route), user, &name)?;
            repository
                .save(&trip)
                .await
                .context("failed to save trip")?;

            match chosen {
                Some((mode, _)) => println!("Saved {} ({mode}) as {}", trip.name, trip.trip_id),
                None => println!("Saved {} as {}", trip.name, trip.trip_id),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::List { user } => {
            let user = UserId::new(user)?;
            let trips = repository.list_for_user(&user).await?;
            if trips.is_empty() {
                println!("No saved trips for {user}");
            }
            for trip in &trips {
                print_trip(trip);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Delete { trip_id } => {
            let trip_id = TripId::new(trip_id);
            if !repository.delete(&trip_id).await? {
                bail!("no saved trip with id {trip_id}");
            }
            println!("Deleted {trip_id}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn load_places(path: Option<&Path>) -> Result<SavedPlaces> {
    match path {
        Some(path) => Ok(SavedPlaces::load(path).await?),
        None => Ok(SavedPlaces::new()),
    }
}

async fn resolve(places: &SavedPlaces, id: &PlaceId) -> Result<PlaceRef> {
    places
        .lookup(id)
        .await
        .ok_or_else(|| anyhow!("unknown place {id}; add it to the saved places file"))
}

fn print_routes(routes: &ModeRoutes) {
    for (mode, outcome) in routes.iter() {
        match outcome {
            RouteOutcome::Route(route) => {
                println!(
                    "{:<10} {:>8.1} km  {:>10}  {} points",
                    mode.as_str(),
                    route.total_distance_meters() as f64 / 1000.0,
                    format_duration(route.total_duration_seconds()),
                    route.geometry().len(),
                );
                if route.waypoints_reordered() {
                    println!("{:<10} waypoint order {:?}", "", route.waypoint_order);
                }
            }
            RouteOutcome::Failed(e) if e.is_expected() => {
                println!("{:<10} unavailable ({e})", mode.as_str());
            }
            RouteOutcome::Failed(e) => {
                println!("{:<10} failed ({e})", mode.as_str());
            }
        }
    }
}

fn print_trip(trip: &PlannedTrip) {
    let created = chrono::DateTime::from_timestamp_millis(trip.created_at)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| trip.created_at.to_string());

    let summary = trip
        .route_info
        .as_ref()
        .map(|info| {
            format!(
                "{:.1} km, {}",
                info.distance_meters as f64 / 1000.0,
                format_duration(info.duration_seconds)
            )
        })
        .unwrap_or_else(|| "no route".to_string());

    println!("{}  {created}  {}  ({summary})", trip.trip_id, trip.name);
}

fn format_duration(seconds: u64) -> String {
    let minutes = (seconds + 30) / 60;
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m} min"),
        (h, m) => format!("{h} h {m:02} min"),
    }
}
