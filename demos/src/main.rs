//! waygrid demo
//!
//! Builds a navigation grid from an ASCII map (or a random one), then runs a
//! batch of random path requests through the request scheduler.

mod map;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::time::Instant;

use clap::Parser;
use log::{error, info};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use thiserror::Error;
use waygrid_core::{GridConfig, GridError, NavGrid, Vec3};
use waygrid_paths::PathFinder;
use waygrid_service::{PathWorker, RequestScheduler};

use map::{AsciiMap, MapError};

/// Run random path requests against a navigation grid
#[derive(Parser, Debug)]
#[command(name = "waygrid-demo")]
#[command(about = "Build a navigation grid and serve path requests against it")]
struct Args {
    /// ASCII map file ('#' blocked, '.' open, '1'-'9' regions)
    #[arg(long)]
    map: Option<PathBuf>,

    /// Grid configuration (TOML). Defaults to one cell per map tile
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random map width in tiles
    #[arg(long, default_value_t = 40)]
    width: usize,

    /// Random map height in tiles
    #[arg(long, default_value_t = 20)]
    height: usize,

    /// Fraction of blocked tiles in a random map
    #[arg(long, default_value_t = 0.2)]
    density: f64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Number of path requests
    #[arg(long, short = 'n', default_value_t = 10)]
    requests: usize,

    /// Serve requests from a background worker thread
    #[arg(long)]
    worker: bool,

    /// Print the map with the first request's route drawn on it
    #[arg(long)]
    render: bool,
}

#[derive(Debug, Error)]
enum DemoError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid map: {0}")]
    Map(#[from] MapError),

    #[error("cannot build grid: {0}")]
    Grid(#[from] GridError),

    #[error("cannot start path worker: {0}")]
    Spawn(#[source] io::Error),

    #[error("the grid has no walkable cells")]
    NoOpenCells,
}

struct Outcome {
    id: usize,
    waypoints: Vec<Vec3>,
    found: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Args::parse()) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), DemoError> {
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);

    let map = match &args.map {
        Some(path) => AsciiMap::parse(&read(path)?)?,
        None => AsciiMap::random(args.width, args.height, args.density, &mut rng),
    };
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => map.default_config(),
    };
    let grid = Arc::new(NavGrid::build(config, &map)?);
    info!(
        "{}x{} map, {}x{} grid, seed {seed}",
        map.width(),
        map.height(),
        grid.size_x(),
        grid.size_y()
    );

    let open: Vec<Vec3> = grid.iter().filter(|c| c.walkable).map(|c| c.world).collect();
    if open.is_empty() {
        return Err(DemoError::NoOpenCells);
    }
    let pairs: Vec<(Vec3, Vec3)> = (0..args.requests)
        .map(|_| {
            let start = open[rng.random_range(0..open.len())];
            let end = open[rng.random_range(0..open.len())];
            (start, end)
        })
        .collect();

    if args.render {
        if let Some(&(start, end)) = pairs.first() {
            let mut finder = PathFinder::for_grid(&grid);
            match finder.find_path(&grid, start, end) {
                Some(route) => println!("{}\n", map.render(&grid, &route)),
                None => info!("first request has no route to draw"),
            }
        }
    }

    let (tx, rx) = mpsc::channel();
    let started = Instant::now();
    if args.worker {
        let worker = PathWorker::spawn(Arc::clone(&grid)).map_err(DemoError::Spawn)?;
        for (id, &(start, end)) in pairs.iter().enumerate() {
            worker.request_path(start, end, reporter(id, tx.clone()));
        }
        worker.shutdown();
    } else {
        let scheduler = RequestScheduler::new(Arc::clone(&grid));
        for (id, &(start, end)) in pairs.iter().enumerate() {
            scheduler.request_path(start, end, reporter(id, tx.clone()));
        }
    }
    drop(tx);

    let mut found = 0;
    for outcome in rx {
        match outcome.waypoints.last() {
            Some(goal) if outcome.found => {
                found += 1;
                info!(
                    "request {}: {} waypoints, arriving at {goal}",
                    outcome.id,
                    outcome.waypoints.len()
                );
            }
            _ => info!("request {}: no path", outcome.id),
        }
    }
    info!(
        "{found}/{} requests found a path in {:?}",
        pairs.len(),
        started.elapsed()
    );
    Ok(())
}

fn reporter(id: usize, tx: Sender<Outcome>) -> impl FnOnce(Vec<Vec3>, bool) + Send + 'static {
    move |waypoints, found| {
        // The receiver outlives every request.
        let _ = tx.send(Outcome {
            id,
            waypoints,
            found,
        });
    }
}

fn read(path: &Path) -> Result<String, DemoError> {
    fs::read_to_string(path).map_err(|source| DemoError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load_config(path: &Path) -> Result<GridConfig, DemoError> {
    toml::from_str(&read(path)?).map_err(|source| DemoError::Config {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use waygrid_core::Point;

    fn courtyard() -> (AsciiMap, Arc<NavGrid>) {
        let map = AsciiMap::parse(include_str!("../data/courtyard.txt")).unwrap();
        let config: GridConfig = toml::from_str(include_str!("../data/grid.toml")).unwrap();
        let grid = Arc::new(NavGrid::build(config, &map).unwrap());
        (map, grid)
    }

    #[test]
    fn bundled_data_builds() {
        let (map, grid) = courtyard();
        assert_eq!((grid.size_x(), grid.size_y()), (map.width(), map.height()));
        assert!(!grid.is_walkable(Point::new(4, 2)));
        assert_eq!(grid.config().region_penalty(waygrid_core::RegionId(3)), Some(30));
    }

    #[test]
    fn courtyard_requests_all_resolve() {
        let (_, grid) = courtyard();
        let scheduler = RequestScheduler::new(Arc::clone(&grid));
        let (tx, rx) = mpsc::channel();
        let inside_left = grid.world_point(Point::new(8, 4));
        let inside_right = grid.world_point(Point::new(28, 14));
        let corner = grid.world_point(Point::new(39, 17));
        scheduler.request_path(inside_left, inside_right, reporter(0, tx.clone()));
        scheduler.request_path(inside_right, corner, reporter(1, tx.clone()));
        drop(tx);

        let outcomes: Vec<_> = rx.iter().collect();
        assert_eq!(outcomes.len(), 2);
        for outcome in outcomes {
            assert!(outcome.found, "request {} failed", outcome.id);
            assert!(!outcome.waypoints.is_empty());
        }
    }
}
