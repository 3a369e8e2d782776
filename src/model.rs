use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use simple_error::{try_with, SimpleError, SimpleResult};

use crate::types::{ComponentId, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Activation,
    Inhibition,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A boolean node of the network. Everything except `id` and `state` is
/// editor metadata and is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Component {
    pub fn new(id: &str, state: bool) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            state,
            color: None,
            position: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: ComponentId,
    pub target: ComponentId,
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
}

impl Connection {
    pub fn new(source: &str, target: &str, connection_type: ConnectionType) -> Self {
        Self {
            id: None,
            source: source.to_string(),
            target: target.to_string(),
            connection_type,
        }
    }

    pub fn activation(source: &str, target: &str) -> Self {
        Self::new(source, target, ConnectionType::Activation)
    }

    pub fn inhibition(source: &str, target: &str) -> Self {
        Self::new(source, target, ConnectionType::Inhibition)
    }
}

/// Components in insertion order plus the typed edges between them.
/// Connections are kept as given: duplicates and dangling ids are not
/// filtered.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub components: Vec<Component>,
    pub connections: Vec<Connection>,
}

pub fn incoming_connections<'a>(
    connections: &'a [Connection],
    target: &'a str,
) -> impl Iterator<Item = &'a Connection> + 'a {
    connections
        .iter()
        .filter(move |connection| connection.target == target)
}

impl Network {
    pub fn new(components: Vec<Component>, connections: Vec<Connection>) -> Self {
        Self {
            components,
            connections,
        }
    }

    pub fn get_component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|component| component.id == id)
    }

    pub fn incoming_connections<'a>(
        &'a self,
        target: &'a str,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        incoming_connections(&self.connections, target)
    }

    pub fn can_simulate(&self) -> bool {
        !self.components.is_empty() && !self.connections.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub network: Network,
}

/// On-disk shape of a model. The two arrays are optional here only so a
/// missing one can be reported by name.
#[derive(Debug, Deserialize)]
struct ModelFile {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    components: Option<Vec<Component>>,
    connections: Option<Vec<Connection>>,
}

impl ModelFile {
    fn into_model(self) -> Result<Model, SimpleError> {
        let components = self
            .components
            .ok_or_else(|| SimpleError::new("Model must have a components array"))?;
        let connections = self
            .connections
            .ok_or_else(|| SimpleError::new("Model must have a connections array"))?;

        Ok(Model {
            id: self.id,
            name: self.name,
            description: self.description,
            network: Network::new(components, connections),
        })
    }
}

impl Model {
    pub fn empty(name: &str) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();

        Self {
            id: format!("model-{}", millis),
            name: name.to_string(),
            description: String::new(),
            network: Network::default(),
        }
    }
}

pub fn load_model_from_json_str(json: &str) -> SimpleResult<Model> {
    let model_file: ModelFile = try_with!(serde_json::from_str(json), "invalid model JSON");
    let model = model_file.into_model()?;
    validate_model(&model)?;
    Ok(model)
}

pub fn load_model_from_yaml_str(yaml: &str) -> SimpleResult<Model> {
    let model_file: ModelFile = try_with!(serde_yaml::from_str(yaml), "invalid model YAML");
    let model = model_file.into_model()?;
    validate_model(&model)?;
    Ok(model)
}

pub fn load_model_from_file(path: &Path) -> SimpleResult<Model> {
    let content = try_with!(
        fs::read_to_string(path),
        "failed to read model file {}",
        path.display()
    );

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => load_model_from_yaml_str(&content),
        _ => load_model_from_json_str(&content),
    }
}

pub fn save_model_to_json_string(model: &Model) -> SimpleResult<String> {
    Ok(try_with!(
        serde_json::to_string_pretty(model),
        "failed to serialize model"
    ))
}

pub fn validate_model(model: &Model) -> Result<(), SimpleError> {
    if model.id.is_empty() {
        return Err(SimpleError::new("Model must have an id"));
    }

    if model.name.is_empty() {
        return Err(SimpleError::new("Model must have a name"));
    }

    validate_network(&model.network)
}

pub fn validate_network(network: &Network) -> Result<(), SimpleError> {
    let mut seen_ids = HashSet::default();

    for (index, component) in network.components.iter().enumerate() {
        if component.id.is_empty() {
            return Err(SimpleError::new(format!(
                "Component at index {} must have an id",
                index
            )));
        }

        if component.name.is_empty() {
            return Err(SimpleError::new(format!(
                "Component at index {} must have a name",
                index
            )));
        }

        if !seen_ids.insert(component.id.as_str()) {
            return Err(SimpleError::new(format!(
                "duplicate component id: {}",
                component.id
            )));
        }
    }

    for (index, connection) in network.connections.iter().enumerate() {
        if connection.source.is_empty() {
            return Err(SimpleError::new(format!(
                "Connection at index {} must have a source",
                index
            )));
        }

        if connection.target.is_empty() {
            return Err(SimpleError::new(format!(
                "Connection at index {} must have a target",
                index
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEEDBACK_MODEL: &str = r##"
{
  "id": "simple-feedback-v1",
  "name": "Simple Feedback Loop",
  "description": "Basic positive and negative feedback regulation",
  "grade": "6-8",
  "components": [
    { "id": "signal", "name": "Signal", "state": true, "color": "#4caf50",
      "position": { "x": 100, "y": 120 } },
    { "id": "receptor", "name": "Receptor" },
    { "id": "repressor", "name": "Repressor", "state": false }
  ],
  "connections": [
    { "id": "c1", "source": "signal", "target": "receptor", "type": "activation" },
    { "id": "c2", "source": "receptor", "target": "repressor", "type": "activation" },
    { "id": "c3", "source": "repressor", "target": "receptor", "type": "inhibition" }
  ],
  "quiz": []
}
"##;

    fn valid_model() -> Model {
        let mut model = Model::empty("Model");
        model.id = "m".to_string();
        model.network = Network::new(
            vec![Component::new("a", true), Component::new("b", false)],
            vec![Connection::activation("a", "b")],
        );
        model
    }

    #[test]
    fn load_json_model() {
        let model = load_model_from_json_str(FEEDBACK_MODEL).unwrap();

        assert_eq!(model.id, "simple-feedback-v1");
        assert_eq!(model.network.components.len(), 3);
        assert_eq!(model.network.connections.len(), 3);

        let receptor = model.network.get_component("receptor").unwrap();
        assert!(!receptor.state);
        assert!(receptor.color.is_none());

        let signal = model.network.get_component("signal").unwrap();
        assert!(signal.state);
        assert_eq!(signal.position, Some(Position { x: 100.0, y: 120.0 }));

        assert_eq!(
            model.network.connections[2].connection_type,
            ConnectionType::Inhibition
        );
    }

    #[test]
    fn load_yaml_model() {
        let yaml = r#"
id: toggle
name: Toggle
components:
- id: x
  name: X
  state: true
- id: y
  name: Y
connections:
- source: x
  target: y
  type: inhibition
"#;
        let model = load_model_from_yaml_str(yaml).unwrap();
        assert_eq!(model.network.connections[0].connection_type, ConnectionType::Inhibition);
        assert!(model.network.connections[0].id.is_none());
    }

    #[test]
    fn json_round_trip_keeps_type_field_name() {
        let json = save_model_to_json_string(&valid_model()).unwrap();
        assert!(json.contains("\"type\": \"activation\""));
        assert_eq!(load_model_from_json_str(&json).unwrap(), valid_model());
    }

    #[test]
    fn invalid_connection_type() {
        let json = r#"{"id":"m","name":"M","components":[],
            "connections":[{"source":"a","target":"b","type":"catalysis"}]}"#;
        let result = load_model_from_json_str(json);
        assert!(result.is_err());
        assert!(result.unwrap_err().as_str().starts_with("invalid model JSON"));
    }

    #[test]
    fn missing_model_id() {
        let mut model = valid_model();
        model.id.clear();
        assert_eq!(
            validate_model(&model).unwrap_err().as_str(),
            "Model must have an id"
        );
    }

    #[test]
    fn missing_model_name() {
        let mut model = valid_model();
        model.name.clear();
        assert_eq!(
            validate_model(&model).unwrap_err().as_str(),
            "Model must have a name"
        );
    }

    #[test]
    fn missing_component_name() {
        let mut model = valid_model();
        model.network.components[1].name.clear();
        assert_eq!(
            validate_model(&model).unwrap_err().as_str(),
            "Component at index 1 must have a name"
        );
    }

    #[test]
    fn duplicate_component_id() {
        let mut model = valid_model();
        model.network.components.push(Component::new("a", false));
        assert_eq!(
            validate_model(&model).unwrap_err().as_str(),
            "duplicate component id: a"
        );
    }

    #[test]
    fn missing_connection_target() {
        let mut model = valid_model();
        model.network.connections.push(Connection::inhibition("a", ""));
        assert_eq!(
            validate_model(&model).unwrap_err().as_str(),
            "Connection at index 1 must have a target"
        );
    }

    #[test]
    fn dangling_and_duplicate_connections_are_valid() {
        let mut model = valid_model();
        model.network.connections.push(Connection::activation("a", "b"));
        model.network.connections.push(Connection::activation("ghost", "b"));
        assert!(validate_model(&model).is_ok());
        assert_eq!(model.network.incoming_connections("b").count(), 3);
    }

    #[test]
    fn missing_components_array() {
        let result = load_model_from_json_str(r#"{"id":"m","name":"M","connections":[]}"#);
        assert_eq!(
            result.unwrap_err().as_str(),
            "Model must have a components array"
        );
    }

    #[test]
    fn missing_connections_array() {
        let result = load_model_from_yaml_str("id: m\nname: M\ncomponents: []\n");
        assert_eq!(
            result.unwrap_err().as_str(),
            "Model must have a connections array"
        );
    }

    #[test]
    fn empty_arrays_are_accepted() {
        let model =
            load_model_from_json_str(r#"{"id":"m","name":"M","components":[],"connections":[]}"#)
                .unwrap();
        assert_eq!(model.network, Network::default());
    }

    #[test]
    fn empty_model_template() {
        let model = Model::empty("New Model");
        assert!(model.id.starts_with("model-"));
        assert_eq!(model.name, "New Model");
        assert!(model.network.components.is_empty());
        assert!(validate_model(&model).is_ok());
    }

    #[test]
    fn can_simulate() {
        assert!(!Network::default().can_simulate());
        assert!(!Network::new(vec![Component::new("a", true)], Vec::new()).can_simulate());
        assert!(valid_model().network.can_simulate());
    }
}
