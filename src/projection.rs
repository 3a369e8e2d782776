//! One-way views of engine state for the presentation layer. Nothing here
//! feeds back into a running simulation.

use serde::{Deserialize, Serialize};

use crate::{
    model::Component,
    state::{History, StateVector},
    types::ComponentId,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub id: ComponentId,
    pub name: String,
    pub state: u8,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeriesPoint {
    pub step: usize,
    pub data: Vec<ChartPoint>,
}

pub fn states_to_chart_points(states: &StateVector, components: &[Component]) -> Vec<ChartPoint> {
    components
        .iter()
        .map(|component| ChartPoint {
            id: component.id.clone(),
            name: component.name.clone(),
            state: u8::from(states.get(&component.id)),
            color: component.color.clone(),
        })
        .collect()
}

pub fn history_to_chart_series(
    history: &History,
    components: &[Component],
) -> Vec<ChartSeriesPoint> {
    history
        .entries()
        .iter()
        .map(|entry| ChartSeriesPoint {
            step: entry.step,
            data: states_to_chart_points(&entry.states, components),
        })
        .collect()
}

/// Writes vector values back onto editor components. Components the vector
/// does not mention keep their stored state.
pub fn apply_states(components: &mut [Component], states: &StateVector) {
    for component in components.iter_mut() {
        if let Some(state) = states.lookup(&component.id) {
            component.state = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::assert_equal;

    fn components() -> Vec<Component> {
        let mut sun = Component::new("sun", true);
        sun.name = "Sunlight".to_string();
        sun.color = Some("#ffeb3b".to_string());
        vec![sun, Component::new("sugar", false), Component::new("oxygen", false)]
    }

    fn states(entries: &[(&str, bool)]) -> StateVector {
        entries
            .iter()
            .map(|(id, state)| (id.to_string(), *state))
            .collect()
    }

    #[test]
    fn chart_points_follow_component_order() {
        let points = states_to_chart_points(
            &states(&[("oxygen", true), ("sun", true)]),
            &components(),
        );

        assert_equal(points.iter().map(|p| p.id.as_str()), ["sun", "sugar", "oxygen"]);
        assert_equal(points.iter().map(|p| p.state), [1, 0, 1]);
        assert_eq!(points[0].name, "Sunlight");
        assert_eq!(points[0].color.as_deref(), Some("#ffeb3b"));
    }

    #[test]
    fn chart_series() {
        let mut history = History::new();
        history.push(0, states(&[("sun", true)]));
        history.push(1, states(&[("sun", true), ("sugar", true)]));

        let series = history_to_chart_series(&history, &components());

        assert_equal(series.iter().map(|point| point.step), [0, 1]);
        assert_eq!(series[1].data[1].state, 1);
    }

    #[test]
    fn apply_states_touches_only_known_ids() {
        let mut components = components();
        apply_states(&mut components, &states(&[("sun", false), ("sugar", true)]));

        assert_equal(components.iter().map(|c| c.state), [false, true, false]);
    }
}
