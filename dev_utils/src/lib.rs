use std::fmt::Write;

use diameter::network::Timestamp;
use diameter::{load_network, RouteConfig, RouteGraph};

// Generated example networks for the tests, demos and benchmarks.

pub struct ExampleNetwork {
    pub timetable: String,
    pub schedule: String,
}

pub fn location_name(i: usize) -> String {
    format!("L{i:03}")
}

/// Builds a random schedule that passes validation under the default config and in which every
/// location can reach every other: one carrier circles all locations twice, the others wander.
/// Every leg takes exactly its timetable duration.
pub fn generate_network(num_locations: usize, num_carriers: usize, legs_per_carrier: usize, seed: u64) -> ExampleNetwork {
    assert!(num_locations >= 2, "Need at least two locations.");
    let mut rng = fastrand::Rng::with_seed(seed);
    let config = RouteConfig::default();

    let mut durations = vec![vec![0 as Timestamp; num_locations]; num_locations];
    let mut timetable = String::new();
    for i in 0..num_locations {
        for j in (i + 1)..num_locations {
            let duration = rng.u32(1..=12);
            durations[i][j] = duration;
            durations[j][i] = duration;
            writeln!(timetable, "{}\t{}\t{duration}", location_name(i), location_name(j)).unwrap();
        }
    }

    let mut schedule = String::new();
    let write_leg = |schedule: &mut String, carrier: &str, from: usize, departure: Timestamp, to: usize| -> Timestamp {
        let arrival = departure + durations[from][to];
        writeln!(schedule, "{carrier}\t{}\t{departure}\t{}\t{arrival}", location_name(from), location_name(to)).unwrap();
        arrival
    };

    writeln!(schedule, "# ring").unwrap();
    let mut time = 0;
    for step in 0..(2 * num_locations) {
        let from = step % num_locations;
        let to = (step + 1) % num_locations;
        let arrival = write_leg(&mut schedule, "Ring", from, time, to);
        time = arrival + config.min_layover + rng.u32(0..=3);
    }

    for carrier in 0..num_carriers {
        writeln!(schedule).unwrap();
        let name = format!("C{carrier}");
        let mut at = rng.usize(..num_locations);
        let mut time = rng.u32(0..20);
        for _ in 0..legs_per_carrier {
            let mut to = rng.usize(..num_locations - 1);
            if to >= at {
                to += 1;
            }
            let arrival = write_leg(&mut schedule, &name, at, time, to);
            at = to;
            time = arrival + config.min_layover + rng.u32(0..=6);
        }
    }

    ExampleNetwork { timetable, schedule }
}

pub fn build_example_network(example: &ExampleNetwork) -> RouteGraph {
    load_network(example.timetable.as_bytes(), example.schedule.as_bytes(), RouteConfig::default()).unwrap()
}

pub fn get_example_scenario() -> (RouteGraph, RouteConfig) {
    let example = generate_network(40, 25, 30, 7);
    (build_example_network(&example), RouteConfig::default())
}
