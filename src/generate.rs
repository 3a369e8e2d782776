use rand::distributions::Bernoulli;
use rand::{prelude::Distribution, rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use simple_error::{SimpleError, SimpleResult};

use crate::model::{Component, Connection, ConnectionType, Network};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomNetworkParams {
    pub num_components: usize,
    pub connect_density: f64,
    pub inhibition_ratio: f64,
    pub initial_on_ratio: f64,
    pub allow_self_loops: bool,
    pub seed: u64,
}

impl Default for RandomNetworkParams {
    fn default() -> Self {
        Self {
            num_components: 10,
            connect_density: 0.2,
            inhibition_ratio: 0.3,
            initial_on_ratio: 0.5,
            allow_self_loops: true,
            seed: 0,
        }
    }
}

pub fn component_id(idx: usize) -> String {
    format!("c{}", idx)
}

/// Erdős–Rényi style network: every ordered pair is connected with
/// probability `connect_density`.
pub fn random_network(params: &RandomNetworkParams) -> SimpleResult<Network> {
    validate_random_network_params(params)?;

    let mut rng = StdRng::seed_from_u64(params.seed);
    let on_dist = Bernoulli::new(params.initial_on_ratio).map_err(SimpleError::from)?;
    let connect_dist = Bernoulli::new(params.connect_density).map_err(SimpleError::from)?;
    let inhibition_dist = Bernoulli::new(params.inhibition_ratio).map_err(SimpleError::from)?;

    let components: Vec<_> = (0..params.num_components)
        .map(|idx| Component::new(&component_id(idx), on_dist.sample(&mut rng)))
        .collect();

    let mut connections = Vec::new();

    for source in 0..params.num_components {
        for target in 0..params.num_components {
            if source == target && !params.allow_self_loops {
                continue;
            }

            if connect_dist.sample(&mut rng) {
                let connection_type = if inhibition_dist.sample(&mut rng) {
                    ConnectionType::Inhibition
                } else {
                    ConnectionType::Activation
                };

                connections.push(Connection::new(
                    &component_id(source),
                    &component_id(target),
                    connection_type,
                ));
            }
        }
    }

    Ok(Network::new(components, connections))
}

fn validate_random_network_params(params: &RandomNetworkParams) -> Result<(), SimpleError> {
    for (name, value) in [
        ("connect_density", params.connect_density),
        ("inhibition_ratio", params.inhibition_ratio),
        ("initial_on_ratio", params.initial_on_ratio),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(SimpleError::new(format!("{} must be in [0, 1]", name)));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_seed() {
        let params = RandomNetworkParams::default();
        assert_eq!(random_network(&params).unwrap(), random_network(&params).unwrap());
    }

    #[test]
    fn full_density_without_self_loops() {
        let params = RandomNetworkParams {
            num_components: 5,
            connect_density: 1.0,
            allow_self_loops: false,
            ..RandomNetworkParams::default()
        };

        let network = random_network(&params).unwrap();

        assert_eq!(network.components.len(), 5);
        assert_eq!(network.connections.len(), 20);
        assert!(network
            .connections
            .iter()
            .all(|connection| connection.source != connection.target));
    }

    #[test]
    fn invalid_density() {
        let params = RandomNetworkParams {
            connect_density: 1.5,
            ..RandomNetworkParams::default()
        };
        assert_eq!(
            random_network(&params).unwrap_err().as_str(),
            "connect_density must be in [0, 1]"
        );
    }
}
