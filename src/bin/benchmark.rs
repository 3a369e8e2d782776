use std::time::Instant;

use boolnet::{generate, rule};

#[path = "../scenario_params.rs"]
mod scenario_params;

fn main() {
    let scenario = scenario_params::get_scenario_params();
    let network = generate::random_network(&scenario.network).unwrap();

    let t_stop = 2000;
    let wall_start = Instant::now();

    let mut states = rule::initialize_states(&network.components);
    let mut on_count = 0usize;

    for _ in 0..t_stop {
        states = rule::simulate_one_step(&network.components, &network.connections, &states);
        on_count += states.count_on();
    }

    let wall_time = wall_start.elapsed();
    let evaluation_count = t_stop * network.components.len();
    let throughput = evaluation_count as f64 / wall_time.as_secs_f64();

    eprintln!(
        "Network: {} components, {} connections",
        network.components.len(),
        network.connections.len()
    );
    eprintln!("Active components per step: {}", on_count as f64 / t_stop as f64);
    eprintln!(
        "Component evaluation throughput: {:.3e} ({:.3} ns per evaluation)",
        throughput,
        1e9 / throughput
    );
}
