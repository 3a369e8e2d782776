use boolnet::{generate::RandomNetworkParams, params::SimulationParams};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ScenarioParams {
    pub network: RandomNetworkParams,
    pub simulation: SimulationParams,
}

pub fn get_scenario_params() -> ScenarioParams {
    let params_yaml_str = r#"
network:
  num_components: 400
  connect_density: 0.02
  inhibition_ratio: 0.35
  initial_on_ratio: 0.5
  allow_self_loops: true
  seed: 0
simulation:
  total_steps: 1000
  speed_ms: 50
  oscillation_lookback: 5
"#;

    serde_yaml::from_str(params_yaml_str).unwrap()
}
