/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::{ButtonConfig, ConfigError, StopConfig};
use crate::shared::{ButtonId, CallError, StopId};

/**
 * Keeps track of the elevator stops and the call panel.
 *
 * Stops are configured once at startup and stay fixed for the whole
 * session. The order of the stops is significant: a stop is addressed by
 * its index everywhere else in the system, and the landing door of stop
 * `i` is `DoorId::Landing(i)`.
 */

#[derive(Debug, Clone)]
pub struct Stop {
    pub position: [f64; 3],
}

#[derive(Debug, Clone)]
pub struct StopRegistry {
    stops: Vec<Stop>,
}

impl StopRegistry {
    pub fn from_config(stops: &[StopConfig]) -> StopRegistry {
        StopRegistry {
            stops: stops
                .iter()
                .map(|s| Stop {
                    position: s.position,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn position_of(&self, stop: StopId) -> Result<[f64; 3], CallError> {
        self.stops
            .get(stop)
            .map(|s| s.position)
            .ok_or(CallError::UnknownStop {
                stop,
                len: self.stops.len(),
            })
    }

    /// Vertical coordinate of a stop, the only axis the car moves along.
    pub fn height_of(&self, stop: StopId) -> Result<f64, CallError> {
        self.position_of(stop).map(|p| p[1])
    }
}

/// One call button. Pressing it requests a ride to `target_stop`; the
/// lamp state (pressed/ready) is owned by the state machine.
#[derive(Debug, Clone)]
pub struct Button {
    pub target_stop: StopId,
}

#[derive(Debug, Clone)]
pub struct CallPanel {
    buttons: Vec<Button>,
}

impl CallPanel {
    pub fn from_config(
        buttons: &[ButtonConfig],
        registry: &StopRegistry,
    ) -> Result<CallPanel, ConfigError> {
        for (button, button_config) in buttons.iter().enumerate() {
            if button_config.target_stop >= registry.len() {
                return Err(ConfigError::ButtonTargetOutOfRange {
                    button,
                    stop: button_config.target_stop,
                });
            }
        }
        Ok(CallPanel {
            buttons: buttons
                .iter()
                .map(|b| Button {
                    target_stop: b.target_stop,
                })
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn target_of(&self, button: ButtonId) -> Result<StopId, CallError> {
        self.buttons
            .get(button)
            .map(|b| b.target_stop)
            .ok_or(CallError::UnknownButton(button))
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
