use serde::{Deserialize, Serialize};
use simple_error::{try_with, SimpleError, SimpleResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub total_steps: usize,
    pub speed_ms: u64,
    pub oscillation_lookback: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            total_steps: 50,
            speed_ms: SpeedPreset::MediumSlow.speed_ms(),
            oscillation_lookback: 5,
        }
    }
}

impl SimulationParams {
    pub fn from_yaml_str(yaml: &str) -> SimpleResult<Self> {
        let params: Self = try_with!(serde_yaml::from_str(yaml), "invalid simulation params YAML");
        validate_simulation_params(&params)?;
        Ok(params)
    }

    pub fn from_json_str(json: &str) -> SimpleResult<Self> {
        let params: Self = try_with!(serde_json::from_str(json), "invalid simulation params JSON");
        validate_simulation_params(&params)?;
        Ok(params)
    }
}

/// Wall-clock pacing levels of the run controls, slowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedPreset {
    Slow,
    MediumSlow,
    Medium,
    Fast,
    VeryFast,
}

impl SpeedPreset {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(SpeedPreset::Slow),
            2 => Some(SpeedPreset::MediumSlow),
            3 => Some(SpeedPreset::Medium),
            4 => Some(SpeedPreset::Fast),
            5 => Some(SpeedPreset::VeryFast),
            _ => None,
        }
    }

    pub fn from_speed_ms(speed_ms: u64) -> Self {
        if speed_ms >= 1000 {
            SpeedPreset::Slow
        } else if speed_ms >= 500 {
            SpeedPreset::MediumSlow
        } else if speed_ms >= 250 {
            SpeedPreset::Medium
        } else if speed_ms >= 100 {
            SpeedPreset::Fast
        } else {
            SpeedPreset::VeryFast
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            SpeedPreset::Slow => 1,
            SpeedPreset::MediumSlow => 2,
            SpeedPreset::Medium => 3,
            SpeedPreset::Fast => 4,
            SpeedPreset::VeryFast => 5,
        }
    }

    pub fn speed_ms(&self) -> u64 {
        match self {
            SpeedPreset::Slow => 1000,
            SpeedPreset::MediumSlow => 500,
            SpeedPreset::Medium => 250,
            SpeedPreset::Fast => 100,
            SpeedPreset::VeryFast => 50,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpeedPreset::Slow => "Slow",
            SpeedPreset::MediumSlow => "Medium-Slow",
            SpeedPreset::Medium => "Medium",
            SpeedPreset::Fast => "Fast",
            SpeedPreset::VeryFast => "Very Fast",
        }
    }
}

pub fn validate_simulation_params(params: &SimulationParams) -> Result<(), SimpleError> {
    if params.total_steps == 0 {
        return Err(SimpleError::new("total_steps must be strictly positive"));
    }

    validate_speed_ms(params.speed_ms)?;

    if params.oscillation_lookback == 0 {
        return Err(SimpleError::new(
            "oscillation_lookback must be strictly positive",
        ));
    }

    Ok(())
}

pub fn validate_speed_ms(speed_ms: u64) -> Result<(), SimpleError> {
    if speed_ms == 0 {
        return Err(SimpleError::new("speed_ms must be strictly positive"));
    }

    Ok(())
}
