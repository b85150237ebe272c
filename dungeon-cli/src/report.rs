use dungeon_core::{
    ContentFile, DungeonBuilderConfig, DungeonConfig, DungeonGraph, RngSource,
    create_dungeon_with,
};

use rayon::prelude::*;
use tracing::{Level, event};

pub fn print_dungeon(graph: &DungeonGraph, seed: u64) {
    println!(
        "Dungeon {} (seed {}): {} rooms, {} open connections",
        graph.id(),
        seed,
        graph.len(),
        graph.open_connections().len()
    );

    for room in graph.rooms() {
        let neighbours = room
            .neighbours()
            .map(|(direction, neighbour_id)| format!("{} {}", direction, neighbour_id))
            .collect::<Vec<_>>()
            .join(", ");
        let open_doors = room
            .doors()
            .iter()
            .filter(|door| door.is_open())
            .map(|door| door.facing().to_string())
            .collect::<Vec<_>>()
            .join(", ");

        println!(
            "  room {:>3} {:<10} {:<14} at {:<18} neighbours [{}] open [{}]",
            room.id(),
            room.coordinate().to_string(),
            room.template_alias(),
            room.world_position().to_string(),
            neighbours,
            open_doors
        );
    }

    let groups = graph.connected_groups();
    if groups.len() > 1 {
        println!("  {} groups of rooms can't reach each other", groups.len());
    }

    println!();
    print!("{}", graph);
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleStats {
    pub first_seed: u64,
    pub runs: u32,
    pub failures: u32,
    pub min_rooms: usize,
    pub max_rooms: usize,
    pub mean_rooms: f64,
    pub mean_connections: f64,
    pub fully_connected: u32,
}

struct SampleOutcome {
    rooms: usize,
    connections: usize,
    fully_connected: bool,
}

/// Generates `samples` dungeons from consecutive seeds, one run per rayon
/// task, and sums them up.
pub fn sample(
    content: &ContentFile,
    config: &DungeonConfig,
    builder_config: &DungeonBuilderConfig,
    first_seed: u64,
    samples: u32,
) -> SampleStats {
    let sample_start = std::time::Instant::now();

    let outcomes = (0..samples)
        .into_par_iter()
        .map(|offset| {
            let seed = first_seed.wrapping_add(u64::from(offset));
            let mut random = RngSource::seeded(seed);

            create_dungeon_with(config, content, &mut random, builder_config)
                .map(|graph| SampleOutcome {
                    rooms: graph.len(),
                    connections: graph.open_connections().len(),
                    fully_connected: graph.is_fully_connected(),
                })
                .map_err(|error| (seed, error))
        })
        .collect::<Vec<_>>();

    event!(
        Level::DEBUG,
        "Generated {} samples in {:.2}ms",
        samples,
        sample_start.elapsed().as_millis()
    );

    let mut stats = SampleStats {
        first_seed,
        runs: samples,
        failures: 0,
        min_rooms: usize::MAX,
        max_rooms: 0,
        mean_rooms: 0.0,
        mean_connections: 0.0,
        fully_connected: 0,
    };
    let mut total_rooms = 0;
    let mut total_connections = 0;

    for outcome in outcomes {
        match outcome {
            Ok(outcome) => {
                stats.min_rooms = stats.min_rooms.min(outcome.rooms);
                stats.max_rooms = stats.max_rooms.max(outcome.rooms);
                total_rooms += outcome.rooms;
                total_connections += outcome.connections;

                if outcome.fully_connected {
                    stats.fully_connected += 1;
                }
            }
            Err((seed, error)) => {
                event!(Level::WARN, "Seed {} failed: {}", seed, error);
                stats.failures += 1;
            }
        }
    }

    let succeeded = stats.runs - stats.failures;
    if succeeded > 0 {
        stats.mean_rooms = total_rooms as f64 / f64::from(succeeded);
        stats.mean_connections = total_connections as f64 / f64::from(succeeded);
    } else {
        stats.min_rooms = 0;
    }

    stats
}

pub fn print_stats(stats: &SampleStats) {
    println!(
        "{} dungeons from seed {} ({} failed)",
        stats.runs, stats.first_seed, stats.failures
    );
    println!(
        "  rooms: min {}, max {}, mean {:.2}",
        stats.min_rooms, stats.max_rooms, stats.mean_rooms
    );
    println!("  open connections: mean {:.2}", stats.mean_connections);

    if stats.runs > 0 {
        println!(
            "  fully connected: {} ({:.1}%)",
            stats.fully_connected,
            100.0 * f64::from(stats.fully_connected) / f64::from(stats.runs)
        );
    }
}
