use std::sync::mpsc::channel as mpsc_channel;
use std::sync::mpsc::Receiver as MpscReceiver;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::mpsc::Sender as MpscSender;
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use bus::{Bus, BusReader};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use simple_error::{try_with, SimpleError, SimpleResult};

use crate::{
    controller::{Controller, RunStatus, StopReason, TickOutcome},
    model::Network,
    params::SimulationParams,
    state::{History, StateVector},
};

pub fn create_runner(network: Network, params: SimulationParams) -> Result<Runner, SimpleError> {
    let controller = try_with!(
        Controller::new(network, params),
        "invalid simulation parameters"
    );

    let mut command_tx = Bus::new(1);
    let command_rx = command_tx.add_rx();
    let (reply_tx, reply_rx) = mpsc_channel();
    let (event_tx, event_rx) = mpsc_channel();

    let join_handle = thread::spawn(move || {
        Worker {
            controller,
            next_tick_at: None,
        }
        .run(command_rx, reply_tx, event_tx);
    });

    Ok(Runner {
        command_tx: Some(command_tx),
        reply_rx,
        event_rx,
        join_handle: Some(join_handle),
    })
}

#[derive(Debug, Clone)]
enum Command {
    Start,
    Pause,
    Resume,
    Stop,
    Reset,
    Step,
    SetSpeed(u64),
    SetTotalSteps(usize),
    SetNetwork(Network),
    Snapshot {
        extract_history: bool,
        oscillation_lookback: Option<usize>,
    },
}

/// State of the run right after a command took effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub status: RunStatus,
    pub current_step: usize,
    pub total_steps: usize,
    pub speed_ms: u64,
    pub current_states: StateVector,
    pub stop_reason: Option<StopReason>,
    pub oscillating: bool,
    pub history: Option<History>,
}

/// Drives a `Controller` on a worker thread, ticking automatically while
/// running. Every call returns once the worker has applied the command.
pub struct Runner {
    command_tx: Option<Bus<Command>>,
    reply_rx: MpscReceiver<RunSnapshot>,
    event_rx: MpscReceiver<TickOutcome>,
    join_handle: Option<JoinHandle<()>>,
}

impl Runner {
    pub fn start(&mut self) -> SimpleResult<RunSnapshot> {
        self.request(Command::Start)
    }

    pub fn pause(&mut self) -> SimpleResult<RunSnapshot> {
        self.request(Command::Pause)
    }

    pub fn resume(&mut self) -> SimpleResult<RunSnapshot> {
        self.request(Command::Resume)
    }

    pub fn stop(&mut self) -> SimpleResult<RunSnapshot> {
        self.request(Command::Stop)
    }

    pub fn reset(&mut self) -> SimpleResult<RunSnapshot> {
        self.request(Command::Reset)
    }

    pub fn step(&mut self) -> SimpleResult<RunSnapshot> {
        self.request(Command::Step)
    }

    pub fn set_speed(&mut self, speed_ms: u64) -> SimpleResult<RunSnapshot> {
        self.request(Command::SetSpeed(speed_ms))
    }

    pub fn set_total_steps(&mut self, total_steps: usize) -> SimpleResult<RunSnapshot> {
        self.request(Command::SetTotalSteps(total_steps))
    }

    pub fn set_network(&mut self, network: Network) -> SimpleResult<RunSnapshot> {
        self.request(Command::SetNetwork(network))
    }

    pub fn snapshot(&mut self) -> SimpleResult<RunSnapshot> {
        self.request(Command::Snapshot {
            extract_history: false,
            oscillation_lookback: None,
        })
    }

    pub fn extract_history(&mut self) -> SimpleResult<History> {
        let snapshot = self.request(Command::Snapshot {
            extract_history: true,
            oscillation_lookback: None,
        })?;

        snapshot
            .history
            .ok_or_else(|| SimpleError::new("worker did not return the history"))
    }

    pub fn is_oscillating(&mut self, lookback: usize) -> SimpleResult<bool> {
        let snapshot = self.request(Command::Snapshot {
            extract_history: false,
            oscillation_lookback: Some(lookback),
        })?;

        Ok(snapshot.oscillating)
    }

    /// Outcomes of manual and automatic ticks, oldest first.
    pub fn try_recv_event(&self) -> Option<TickOutcome> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<TickOutcome> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn drain_events(&self) -> Vec<TickOutcome> {
        self.event_rx.try_iter().collect()
    }

    fn request(&mut self, command: Command) -> SimpleResult<RunSnapshot> {
        let command_tx = self
            .command_tx
            .as_mut()
            .ok_or_else(|| SimpleError::new("runner is shut down"))?;

        command_tx.broadcast(command);

        Ok(try_with!(self.reply_rx.recv(), "runner worker has exited"))
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        drop(self.command_tx.take()); // closing the bus ends the worker loop

        if let Some(join_handle) = self.join_handle.take() {
            join_handle.join().ok();
        }
    }
}

struct Worker {
    controller: Controller,
    next_tick_at: Option<Instant>,
}

impl Worker {
    fn run(
        &mut self,
        mut command_rx: BusReader<Command>,
        reply_tx: MpscSender<RunSnapshot>,
        event_tx: MpscSender<TickOutcome>,
    ) {
        loop {
            let command = match self.next_tick_at {
                Some(deadline) => {
                    let timeout = deadline.saturating_duration_since(Instant::now());
                    match command_rx.recv_timeout(timeout) {
                        Ok(command) => Some(command),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match command_rx.recv() {
                    Ok(command) => Some(command),
                    Err(_) => break,
                },
            };

            match command {
                Some(command) => {
                    let snapshot = self.handle(command, &event_tx);
                    if reply_tx.send(snapshot).is_err() {
                        break;
                    }
                }
                None => {
                    self.next_tick_at = None;
                    if let Some(outcome) = self.controller.tick() {
                        publish(&event_tx, outcome);
                    }
                }
            }

            self.schedule();
        }

        debug!("runner worker exiting");
    }

    fn handle(&mut self, command: Command, event_tx: &MpscSender<TickOutcome>) -> RunSnapshot {
        let mut extract_history = false;
        let mut oscillation_lookback = self.controller.get_params().oscillation_lookback;

        match command {
            Command::Start => self.controller.start(),
            Command::Pause => self.controller.pause(),
            Command::Resume => self.controller.resume(),
            Command::Stop => self.controller.stop(),
            Command::Reset => self.controller.reset(),
            Command::Step => {
                let outcome = self.controller.step();
                publish(event_tx, outcome);
            }
            Command::SetSpeed(speed_ms) => {
                self.controller.set_speed(speed_ms);
                self.next_tick_at = None;
            }
            Command::SetTotalSteps(total_steps) => self.controller.set_total_steps(total_steps),
            Command::SetNetwork(network) => self.controller.set_network(network),
            Command::Snapshot {
                extract_history: extract,
                oscillation_lookback: lookback,
            } => {
                extract_history = extract;
                if let Some(lookback) = lookback {
                    oscillation_lookback = lookback;
                }
            }
        }

        self.make_snapshot(extract_history, oscillation_lookback)
    }

    // at most one pending deadline, only while running
    fn schedule(&mut self) {
        if self.controller.is_running() {
            if self.next_tick_at.is_none() {
                self.next_tick_at = Some(Instant::now() + self.controller.get_speed());
            }
        } else {
            self.next_tick_at = None;
        }
    }

    fn make_snapshot(&self, extract_history: bool, oscillation_lookback: usize) -> RunSnapshot {
        let params = self.controller.get_params();

        RunSnapshot {
            status: self.controller.get_status(),
            current_step: self.controller.get_current_step(),
            total_steps: params.total_steps,
            speed_ms: params.speed_ms,
            current_states: self.controller.get_current_states().clone(),
            stop_reason: self.controller.get_stop_reason(),
            oscillating: self.controller.is_oscillating(oscillation_lookback),
            history: if extract_history {
                Some(self.controller.get_history().clone())
            } else {
                None
            },
        }
    }
}

fn publish(event_tx: &MpscSender<TickOutcome>, outcome: TickOutcome) {
    if event_tx.send(outcome).is_err() {
        warn!("tick outcome dropped, no event receiver");
    }
}
