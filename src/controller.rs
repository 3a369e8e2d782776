use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use simple_error::SimpleResult;

use crate::{
    detection,
    model::Network,
    params::{self, SimulationParams},
    rule,
    state::{History, StateVector},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Stopped,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    StepLimit,
    SteadyState,
    Requested,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub step: usize,
    pub states: StateVector,
    pub stop_reason: Option<StopReason>,
}

/// Run state machine over one network. Owns the current vector and the
/// history; the network is only read while ticking.
#[derive(Debug, Clone)]
pub struct Controller {
    network: Network,
    params: SimulationParams,
    status: RunStatus,
    current_step: usize,
    current_states: StateVector,
    history: History,
    stop_reason: Option<StopReason>,
}

impl Controller {
    pub fn new(network: Network, params: SimulationParams) -> SimpleResult<Self> {
        params::validate_simulation_params(&params)?;

        Ok(Self {
            network,
            params,
            status: RunStatus::Stopped,
            current_step: 0,
            current_states: StateVector::new(),
            history: History::new(),
            stop_reason: None,
        })
    }

    pub fn get_status(&self) -> RunStatus {
        self.status
    }

    pub fn get_current_step(&self) -> usize {
        self.current_step
    }

    pub fn get_current_states(&self) -> &StateVector {
        &self.current_states
    }

    pub fn get_history(&self) -> &History {
        &self.history
    }

    pub fn get_stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn get_params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn get_network(&self) -> &Network {
        &self.network
    }

    pub fn get_speed(&self) -> Duration {
        Duration::from_millis(self.params.speed_ms)
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Replaces the network between ticks. Removed components drop out of
    /// the next vector, unknown sources read as off.
    pub fn set_network(&mut self, network: Network) {
        self.network = network;
    }

    /// Pacing only; a zero delay is ignored.
    pub fn set_speed(&mut self, speed_ms: u64) {
        if params::validate_speed_ms(speed_ms).is_ok() {
            self.params.speed_ms = speed_ms;
        } else {
            debug!("ignoring invalid speed: {} ms", speed_ms);
        }
    }

    pub fn set_total_steps(&mut self, total_steps: usize) {
        if total_steps > 0 {
            self.params.total_steps = total_steps;
        } else {
            debug!("ignoring invalid step limit: {}", total_steps);
        }
    }

    pub fn start(&mut self) {
        if self.status != RunStatus::Stopped {
            debug!("start ignored while {:?}", self.status);
            return;
        }

        self.current_step = 0;
        self.history.clear();
        self.stop_reason = None;
        self.current_states = rule::initialize_states(&self.network.components);
        self.history.push(0, self.current_states.clone());
        self.status = RunStatus::Running;

        debug!(
            "simulation started with {} components",
            self.current_states.len()
        );
    }

    pub fn pause(&mut self) {
        if self.status != RunStatus::Running {
            debug!("pause ignored while {:?}", self.status);
            return;
        }

        self.status = RunStatus::Paused;
        debug!("simulation paused at step {}", self.current_step);
    }

    pub fn resume(&mut self) {
        if self.status != RunStatus::Paused {
            debug!("resume ignored while {:?}", self.status);
            return;
        }

        self.status = RunStatus::Running;
        debug!("simulation resumed at step {}", self.current_step);
    }

    pub fn stop(&mut self) {
        if self.status == RunStatus::Stopped {
            debug!("stop ignored while already stopped");
            return;
        }

        self.halt(StopReason::Requested);
    }

    pub fn reset(&mut self) {
        self.status = RunStatus::Stopped;
        self.current_step = 0;
        self.current_states = StateVector::new();
        self.history.clear();
        self.stop_reason = None;
        debug!("simulation reset");
    }

    /// Manual single tick. Starts the run if needed and leaves it paused
    /// unless a detector stopped it.
    pub fn step(&mut self) -> TickOutcome {
        if self.status == RunStatus::Stopped {
            self.start();
        }

        let outcome = self.advance();
        self.pause();
        outcome
    }

    /// Automatic tick; does nothing unless running.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if self.status != RunStatus::Running {
            return None;
        }

        Some(self.advance())
    }

    pub fn is_oscillating(&self, lookback: usize) -> bool {
        detection::detect_oscillation(&self.history, lookback)
    }

    pub fn is_oscillating_default(&self) -> bool {
        self.is_oscillating(self.params.oscillation_lookback)
    }

    fn advance(&mut self) -> TickOutcome {
        let next_states = rule::simulate_one_step(
            &self.network.components,
            &self.network.connections,
            &self.current_states,
        );

        self.current_step += 1;
        self.current_states = next_states;
        self.history
            .push(self.current_step, self.current_states.clone());

        let stop_reason = self.check_termination();
        if let Some(reason) = stop_reason {
            self.halt(reason);
        }

        TickOutcome {
            step: self.current_step,
            states: self.current_states.clone(),
            stop_reason,
        }
    }

    fn check_termination(&self) -> Option<StopReason> {
        if self.current_step >= self.params.total_steps {
            info!("maximum steps reached at step {}", self.current_step);
            return Some(StopReason::StepLimit);
        }

        if let (Some(previous), Some(last)) = (self.history.previous(), self.history.last()) {
            if detection::is_steady_state(&last.states, &previous.states) {
                info!("steady state reached at step {}", self.current_step);
                return Some(StopReason::SteadyState);
            }
        }

        None
    }

    fn halt(&mut self, reason: StopReason) {
        self.status = RunStatus::Stopped;
        self.stop_reason = Some(reason);
        debug!(
            "simulation stopped at step {} ({:?})",
            self.current_step, reason
        );
    }
}
