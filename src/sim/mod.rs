use crate::config::{ScriptedEvent, SimulationConfig};
use crate::shared::{AudioCommand, ButtonId, ButtonVisual, CabinCommand, CarSnapshot, DoorCommand};
use crossbeam_channel as cbc;
use log::{debug, info};
use std::time::{Duration, Instant};

/**
 * # Sim Driver
 * Stand-in for the scene glue around the state machine.
 *
 * Where a game engine would animate doors, play clips and light up button
 * materials, this driver consumes the FSM's actuator channels and logs each
 * command. It also injects the scripted demo events from the configuration
 * file (button presses, phototube trips, occupancy changes) once their
 * timestamps have passed.
 *
 * # Fields
 * - `tick_ms`:         Poll interval for the command channels.
 * - `script`:          Scripted events, ordered by timestamp.
 * - `started`:         Wall-clock start of the session.
 * - `next_event`:      Index of the next scripted event to fire.
 * - `button_tx`:       Delivers scripted button presses to the FSM.
 * - `hazard_tx`:       Delivers scripted phototube trips.
 * - `occupancy_tx`:    Delivers scripted occupancy changes.
 * - `door_rx`:         Door open/close commands from the FSM.
 * - `audio_rx`:        Audio cue commands from the FSM.
 * - `lamp_rx`:         Button lamp visuals from the FSM.
 * - `cabin_rx`:        Occupant attach/release commands from the FSM.
 * - `state_rx`:        Car snapshots, logged as JSON.
 */

pub struct SimDriver {
    tick_ms: u64,
    script: Vec<ScriptedEvent>,
    started: Instant,
    next_event: usize,
    button_tx: cbc::Sender<ButtonId>,
    hazard_tx: cbc::Sender<()>,
    occupancy_tx: cbc::Sender<bool>,
    door_rx: cbc::Receiver<DoorCommand>,
    audio_rx: cbc::Receiver<AudioCommand>,
    lamp_rx: cbc::Receiver<(ButtonId, ButtonVisual)>,
    cabin_rx: cbc::Receiver<CabinCommand>,
    state_rx: cbc::Receiver<CarSnapshot>,
}

impl SimDriver {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &SimulationConfig,
        button_tx: cbc::Sender<ButtonId>,
        hazard_tx: cbc::Sender<()>,
        occupancy_tx: cbc::Sender<bool>,
        door_rx: cbc::Receiver<DoorCommand>,
        audio_rx: cbc::Receiver<AudioCommand>,
        lamp_rx: cbc::Receiver<(ButtonId, ButtonVisual)>,
        cabin_rx: cbc::Receiver<CabinCommand>,
        state_rx: cbc::Receiver<CarSnapshot>,
    ) -> SimDriver {
        let mut script = config.script.clone();
        script.sort_by(|a, b| a.at.total_cmp(&b.at));
        SimDriver {
            tick_ms: config.tick_ms,
            script,
            started: Instant::now(),
            next_event: 0,
            button_tx,
            hazard_tx,
            occupancy_tx,
            door_rx,
            audio_rx,
            lamp_rx,
            cabin_rx,
            state_rx,
        }
    }

    pub fn run(mut self) {
        loop {
            self.fire_due_events();

            cbc::select! {
                recv(self.door_rx) -> msg => {
                    match msg {
                        Ok(command) => info!("door {:?}: {:?}", command.door, command.action),
                        Err(_) => return,
                    }
                }
                recv(self.audio_rx) -> msg => {
                    match msg {
                        Ok(command) => info!("audio {:?}", command),
                        Err(_) => return,
                    }
                }
                recv(self.lamp_rx) -> msg => {
                    match msg {
                        Ok((button, visual)) => info!("button {} lamp {:?}", button, visual),
                        Err(_) => return,
                    }
                }
                recv(self.cabin_rx) -> msg => {
                    match msg {
                        Ok(command) => info!("cabin {:?}", command),
                        Err(_) => return,
                    }
                }
                recv(self.state_rx) -> msg => {
                    match msg {
                        Ok(snapshot) => {
                            debug!(
                                "car: {}",
                                serde_json::to_string(&snapshot).unwrap_or_default()
                            );
                        }
                        Err(_) => return,
                    }
                }
                default(Duration::from_millis(self.tick_ms)) => {}
            }
        }
    }

    fn fire_due_events(&mut self) {
        let elapsed = self.started.elapsed().as_secs_f64();
        while self.next_event < self.script.len() && self.script[self.next_event].at <= elapsed {
            let event = self.script[self.next_event].clone();
            self.next_event += 1;

            if let Some(button) = event.press {
                info!("script: pressing button {}", button);
                let _ = self.button_tx.send(button);
            }
            if event.hazard {
                info!("script: occupant enters the door area");
                let _ = self.hazard_tx.send(());
            }
            if let Some(inside) = event.occupant {
                info!("script: cabin occupancy -> {}", inside);
                let _ = self.occupancy_tx.send(inside);
            }
        }
    }
}
