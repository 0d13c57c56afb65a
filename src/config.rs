/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone)]
pub struct Config {
    pub elevator: ElevatorConfig,
    pub stops: Vec<StopConfig>,
    pub buttons: Vec<ButtonConfig>,
    pub simulation: SimulationConfig,
}

#[derive(Deserialize, Clone)]
pub struct ElevatorConfig {
    pub max_speed: f64,
    pub max_acceleration: f64,
    pub door_open_or_close_time: f64,
    pub auto_close_delay: f64,
    pub hazard_reopen_dwell_time: f64,
}

/// One floor the car can stop on. Only the vertical component of the
/// position drives motion; the rest is scene dressing.
#[derive(Deserialize, Clone)]
pub struct StopConfig {
    pub position: [f64; 3],
}

#[derive(Deserialize, Clone)]
pub struct ButtonConfig {
    pub target_stop: usize,
}

#[derive(Deserialize, Clone)]
pub struct SimulationConfig {
    pub tick_ms: u64,
    #[serde(default)]
    pub script: Vec<ScriptedEvent>,
}

/// A demo event the sim driver injects once its timestamp has passed.
#[derive(Deserialize, Clone)]
pub struct ScriptedEvent {
    pub at: f64,
    #[serde(default)]
    pub press: Option<usize>,
    #[serde(default)]
    pub hazard: bool,
    #[serde(default)]
    pub occupant: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("at least two stops are required, found {0}")]
    TooFewStops(usize),

    #[error("elevator parameter '{0}' must be positive")]
    NonPositiveParameter(&'static str),

    #[error("button {button} targets unknown stop {stop}")]
    ButtonTargetOutOfRange { button: usize, stop: usize },

    #[error("simulation tick_ms must be non-zero")]
    ZeroTick,
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    let config: Config = toml::from_str(&config_str)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.stops.len() < 2 {
        return Err(ConfigError::TooFewStops(config.stops.len()));
    }

    let params = [
        ("max_speed", config.elevator.max_speed),
        ("max_acceleration", config.elevator.max_acceleration),
        (
            "door_open_or_close_time",
            config.elevator.door_open_or_close_time,
        ),
        ("auto_close_delay", config.elevator.auto_close_delay),
        (
            "hazard_reopen_dwell_time",
            config.elevator.hazard_reopen_dwell_time,
        ),
    ];
    for (name, value) in params {
        if value <= 0.0 {
            return Err(ConfigError::NonPositiveParameter(name));
        }
    }

    for (button, button_config) in config.buttons.iter().enumerate() {
        if button_config.target_stop >= config.stops.len() {
            return Err(ConfigError::ButtonTargetOutOfRange {
                button,
                stop: button_config.target_stop,
            });
        }
    }

    if config.simulation.tick_ms == 0 {
        return Err(ConfigError::ZeroTick);
    }

    Ok(())
}

/***************************************/
/*             Unit tests              */
/***************************************/
