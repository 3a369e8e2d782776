use boolnet::{
    controller::Controller, detection, generate, projection, rule, state::StateVector,
};

#[path = "../scenario_params.rs"]
mod scenario_params;

fn vector_checksum(states: &StateVector) -> usize {
    states
        .iter()
        .filter(|(_, state)| *state)
        .map(|(id, _)| id.trim_start_matches('c').parse::<usize>().unwrap())
        .sum()
}

fn main() {
    let scenario = scenario_params::get_scenario_params();
    let network = generate::random_network(&scenario.network).unwrap();

    let history = rule::run_simulation(&network, 100);

    let mut step_checksum = 0;
    for entry in history.entries() {
        step_checksum += entry.step * vector_checksum(&entry.states);
    }

    println!("batch result:");
    println!("...history length: {}", history.len());
    println!("...step checksum: {}", step_checksum);
    println!(
        "...oscillating (lookback {}): {}",
        scenario.simulation.oscillation_lookback,
        detection::detect_oscillation(&history, scenario.simulation.oscillation_lookback)
    );

    let mut controller = Controller::new(network.clone(), scenario.simulation).unwrap();
    controller.start();
    while controller.tick().is_some() {}

    let series = projection::history_to_chart_series(controller.get_history(), &network.components);
    let chart_checksum: usize = series
        .iter()
        .map(|point| {
            point.step * point.data.iter().map(|p| p.state as usize).sum::<usize>()
        })
        .sum();

    println!("controlled result:");
    println!("...final step: {}", controller.get_current_step());
    println!("...stop reason: {:?}", controller.get_stop_reason());
    println!("...chart checksum: {}", chart_checksum);
}
