use crate::{
    model::{self, Component, Connection, ConnectionType, Network},
    state::{History, StateVector},
};

/// Per-type tally of a component's incoming connections. Duplicate edges
/// are counted once each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputTally {
    pub activations: usize,
    pub inhibitions: usize,
    pub active_activations: usize,
    pub active_inhibitions: usize,
}

impl InputTally {
    pub fn has_inputs(&self) -> bool {
        self.activations + self.inhibitions > 0
    }
}

pub fn tally_inputs(
    component_id: &str,
    connections: &[Connection],
    current: &StateVector,
) -> InputTally {
    let mut tally = InputTally::default();

    for connection in model::incoming_connections(connections, component_id) {
        let is_active = current.get(&connection.source);

        match connection.connection_type {
            ConnectionType::Activation => {
                tally.activations += 1;
                if is_active {
                    tally.active_activations += 1;
                }
            }
            ConnectionType::Inhibition => {
                tally.inhibitions += 1;
                if is_active {
                    tally.active_inhibitions += 1;
                }
            }
        }
    }

    tally
}

/// Next state of a single component. Components without inputs hold their
/// value, an active inhibitor always wins, otherwise any active activator
/// turns the component on and no active input turns it off.
pub fn evaluate_next_state(
    component: &Component,
    connections: &[Connection],
    current: &StateVector,
) -> bool {
    let tally = tally_inputs(&component.id, connections, current);

    if !tally.has_inputs() {
        return current.get(&component.id);
    }

    if tally.active_inhibitions > 0 {
        return false;
    }

    tally.active_activations > 0
}

pub fn initialize_states(components: &[Component]) -> StateVector {
    components
        .iter()
        .map(|component| (component.id.clone(), component.state))
        .collect()
}

/// Synchronous update: every component is evaluated against the same
/// `current` snapshot and the results are collected into a fresh vector.
pub fn simulate_one_step(
    components: &[Component],
    connections: &[Connection],
    current: &StateVector,
) -> StateVector {
    components
        .iter()
        .map(|component| {
            (
                component.id.clone(),
                evaluate_next_state(component, connections, current),
            )
        })
        .collect()
}

/// Runs `steps` ticks back to back with no pacing and no stop detection.
pub fn run_simulation(network: &Network, steps: usize) -> History {
    let mut history = History::new();
    let mut states = initialize_states(&network.components);
    history.push(0, states.clone());

    for step in 1..=steps {
        states = simulate_one_step(&network.components, &network.connections, &states);
        history.push(step, states.clone());
    }

    history
}
