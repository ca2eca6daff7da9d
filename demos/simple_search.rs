use diameter::{Itinerary, Journey};

use dev_utils::get_example_scenario;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let (mut network, config) = get_example_scenario();
    network.print_stats();

    // Search from the first location and print the route to the farthest one.
    let source = network.locations()[0];
    let outcome = network.search(source, &config)?;
    let itinerary = Itinerary::from_search(&network, source, outcome.farthest)?;

    println!(
        "Farthest from {} is {}, arriving at {}:",
        network.location(source).name,
        network.location(outcome.farthest).name,
        itinerary.arrival_time()
    );
    println!("{}", Journey::new(&itinerary, &network));

    Ok(())
}
