use crate::state::{History, StateVector};

/// True when every component of `current` has the same value in `previous`.
/// A component `previous` has never seen counts as changed.
pub fn is_steady_state(current: &StateVector, previous: &StateVector) -> bool {
    current
        .iter()
        .all(|(id, state)| previous.lookup(id) == Some(state))
}

/// Compares the last `lookback` entries with the `lookback` entries before
/// them, offset by offset. Needs at least `2 * lookback` entries.
pub fn detect_oscillation(history: &History, lookback: usize) -> bool {
    let entries = history.entries();

    let window = match lookback.checked_mul(2) {
        Some(window) if lookback > 0 => window,
        _ => return false,
    };

    if entries.len() < window {
        return false;
    }

    let recent = &entries[entries.len() - lookback..];
    let earlier = &entries[entries.len() - window..entries.len() - lookback];

    recent
        .iter()
        .zip(earlier)
        .all(|(recent, earlier)| recent.states == earlier.states)
}
