use crate::config::ElevatorConfig;
use crate::elevator::motion::{self, MotionProfile};
use crate::shared::{
    AudioCommand, AudioCue, ButtonId, ButtonVisual, CabinCommand, CallError, CarSnapshot, CarState,
    DoorAction, DoorCommand, DoorId, StopId,
};
use crate::stops::{CallPanel, StopRegistry};
use crossbeam_channel as cbc;
use log::{debug, info, warn};
use std::time::Duration;

/**
 * Manages elevator operation logic.
 *
 * The `ElevatorFSM` (Finite State Machine) owns the car's position, velocity
 * and door-cycle sequencing. It consumes call and hazard events, advances the
 * motion model once per tick, and issues fire-and-forget commands to the
 * door, audio, lamp and cabin actuators. Nothing else in the system writes
 * the car's fields.
 *
 * # Fields
 * - `registry`:          Ordered stop positions and landing doors.
 * - `panel`:             Call buttons and their target stops.
 * - `motion`:            Braking-aware velocity model.
 * - `door_time`:         Seconds a door spends opening or closing.
 * - `auto_close_delay`:  Seconds the doors stay open unattended.
 * - `hazard_dwell`:      Seconds to hold the doors after a hazard reopen.
 * - `button_rx`:         Receives pressed button ids.
 * - `hazard_rx`:         Receives phototube trip events.
 * - `occupancy_rx`:      Receives cabin occupancy updates.
 * - `terminate_rx`:      Stops the run loop, used by tests.
 * - `door_tx`:           Sends open/close commands to door actuators.
 * - `audio_tx`:          Sends play/stop commands for named cues.
 * - `lamp_tx`:           Sends pressed/ready visuals for buttons.
 * - `cabin_tx`:          Sends occupant attach/release commands.
 * - `state_tx`:          Broadcasts a snapshot on every transition.
 *
 * The car context is the remaining mutable block: sim clock `now`, vertical
 * `position` and signed `velocity`, the current `state`, the pending
 * `target` order, the `last_stop` the car physically rests at, the
 * `last_button` whose lamp is lit, and the occupancy flags.
 */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    ButtonPressed(ButtonId),
    HazardEntered,
    OccupancyChanged(bool),
}

/// A call: the button that was pressed and the stop it requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Call {
    button: ButtonId,
    stop: StopId,
}

/// Timer deadlines are carried in the variants; they are created on state
/// entry and dropped on exit. While Moving the destination is latched so a
/// superseding call can never retarget the car mid-flight.
#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    WaitingClosed,
    WaitingOpen { close_at: f64 },
    Moving { call: Call, dest_height: f64 },
    Opening { done_at: f64 },
    Closing { done_at: f64 },
    OpeningForHazard { resume_at: f64 },
}

impl State {
    fn label(&self) -> CarState {
        match self {
            State::WaitingClosed => CarState::WaitingClosed,
            State::WaitingOpen { .. } => CarState::WaitingOpen,
            State::Moving { .. } => CarState::Moving,
            State::Opening { .. } => CarState::Opening,
            State::Closing { .. } => CarState::Closing,
            State::OpeningForHazard { .. } => CarState::OpeningForHazard,
        }
    }
}

pub struct ElevatorFSM {
    // Scene wiring
    registry: StopRegistry,
    panel: CallPanel,
    motion: MotionProfile,
    door_time: f64,
    auto_close_delay: f64,
    hazard_dwell: f64,

    // Event channels
    button_rx: cbc::Receiver<ButtonId>,
    hazard_rx: cbc::Receiver<()>,
    occupancy_rx: cbc::Receiver<bool>,
    terminate_rx: cbc::Receiver<()>,

    // Actuator channels
    door_tx: cbc::Sender<DoorCommand>,
    audio_tx: cbc::Sender<AudioCommand>,
    lamp_tx: cbc::Sender<(ButtonId, ButtonVisual)>,
    cabin_tx: cbc::Sender<CabinCommand>,
    state_tx: cbc::Sender<CarSnapshot>,

    // Car context
    now: f64,
    position: f64,
    velocity: f64,
    state: State,
    target: Option<Call>,
    last_stop: StopId,
    last_button: Option<ButtonId>,
    occupant_inside: bool,
    occupant_attached: bool,
}

impl ElevatorFSM {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &ElevatorConfig,
        registry: StopRegistry,
        panel: CallPanel,
        button_rx: cbc::Receiver<ButtonId>,
        hazard_rx: cbc::Receiver<()>,
        occupancy_rx: cbc::Receiver<bool>,
        terminate_rx: cbc::Receiver<()>,
        door_tx: cbc::Sender<DoorCommand>,
        audio_tx: cbc::Sender<AudioCommand>,
        lamp_tx: cbc::Sender<(ButtonId, ButtonVisual)>,
        cabin_tx: cbc::Sender<CabinCommand>,
        state_tx: cbc::Sender<CarSnapshot>,
    ) -> ElevatorFSM {
        // The car starts parked at the first stop with the doors closed.
        let initial_height = registry.height_of(0).unwrap_or(0.0);
        ElevatorFSM {
            registry,
            panel,
            motion: MotionProfile::new(config),
            door_time: config.door_open_or_close_time,
            auto_close_delay: config.auto_close_delay,
            hazard_dwell: config.hazard_reopen_dwell_time,
            button_rx,
            hazard_rx,
            occupancy_rx,
            terminate_rx,
            door_tx,
            audio_tx,
            lamp_tx,
            cabin_tx,
            state_tx,
            now: 0.0,
            position: initial_height,
            velocity: 0.0,
            state: State::WaitingClosed,
            target: None,
            last_stop: 0,
            last_button: None,
            occupant_inside: false,
            occupant_attached: false,
        }
    }

    pub fn run(mut self, tick_interval: Duration) {
        let dt = tick_interval.as_secs_f64();
        self.publish_snapshot();

        loop {
            cbc::select! {
                recv(self.button_rx) -> msg => {
                    match msg {
                        Ok(button) => self.handle_event(Event::ButtonPressed(button)),
                        Err(_) => return,
                    }
                }
                recv(self.hazard_rx) -> msg => {
                    match msg {
                        Ok(()) => self.handle_event(Event::HazardEntered),
                        Err(_) => return,
                    }
                }
                recv(self.occupancy_rx) -> msg => {
                    match msg {
                        Ok(inside) => self.handle_event(Event::OccupancyChanged(inside)),
                        Err(_) => return,
                    }
                }
                recv(self.terminate_rx) -> _ => return,
                default(tick_interval) => self.tick(dt),
            }
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::ButtonPressed(button) => {
                if let Err(e) = self.on_button_pressed(button) {
                    warn!("rejected call: {}", e);
                }
            }
            Event::HazardEntered => self.on_hazard_entered(),
            Event::OccupancyChanged(inside) => self.occupant_inside = inside,
        }
    }

    /// Advance the simulation clock and run the current state's per-tick
    /// behaviour.
    pub fn tick(&mut self, dt: f64) {
        self.now += dt;
        match self.state {
            State::WaitingClosed => {}
            State::WaitingOpen { close_at } => {
                if self.now > close_at {
                    self.transition(State::Closing {
                        done_at: self.now + self.door_time,
                    });
                }
            }
            State::Moving { call, dest_height } => self.tick_moving(call, dest_height, dt),
            State::Opening { done_at } => {
                if self.now > done_at {
                    if self.target.is_some() {
                        self.transition(State::Closing {
                            done_at: self.now + self.door_time,
                        });
                    } else {
                        self.transition(State::WaitingOpen {
                            close_at: self.now + self.auto_close_delay,
                        });
                    }
                }
            }
            State::Closing { done_at } => {
                if self.now > done_at {
                    if self.target.is_some() {
                        self.enter_moving();
                    } else {
                        self.transition(State::WaitingClosed);
                    }
                }
            }
            State::OpeningForHazard { resume_at } => {
                // Always back to Closing, even if a new call arrived while
                // the doors were held open.
                if self.now > resume_at {
                    self.transition(State::Closing {
                        done_at: self.now + self.door_time,
                    });
                }
            }
        }
    }

    /// Call arbitration. The stop is validated before anything mutates.
    pub fn on_button_pressed(&mut self, button: ButtonId) -> Result<(), CallError> {
        let stop = self.panel.target_of(button)?;
        self.registry.height_of(stop)?;

        if let Some(previous) = self.last_button {
            if previous != button {
                let _ = self.lamp_tx.send((previous, ButtonVisual::Ready));
            }
        }

        match self.target {
            None => {
                if stop != self.last_stop {
                    self.issue_move_order(Call { button, stop });
                } else {
                    self.on_same_floor_call();
                }
            }
            Some(active) if active.stop != stop => {
                self.issue_move_order(Call { button, stop });
            }
            // Repeated press of the active target, nothing to do.
            Some(_) => {}
        }

        Ok(())
    }

    pub fn on_hazard_entered(&mut self) {
        if matches!(self.state, State::Closing { .. }) {
            warn!("hazard in door area while closing, reopening");
            self.transition(State::OpeningForHazard {
                resume_at: self.now + self.hazard_dwell,
            });
        }
    }

    // Accessors used by the sim driver and tests.
    pub fn state(&self) -> CarState {
        self.state.label()
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target_stop(&self) -> Option<StopId> {
        self.target.map(|call| call.stop)
    }

    pub fn last_stop(&self) -> StopId {
        self.last_stop
    }

    fn issue_move_order(&mut self, call: Call) {
        let _ = self.lamp_tx.send((call.button, ButtonVisual::Pressed));
        self.last_button = Some(call.button);
        self.target = Some(call);
        info!("move order issued for stop {}", call.stop);

        match self.state {
            State::WaitingClosed => self.enter_moving(),
            State::WaitingOpen { .. } | State::Opening { .. } => {
                self.transition(State::Closing {
                    done_at: self.now + self.door_time,
                });
            }
            // Picked up once the current leg of the cycle completes.
            State::Moving { .. } | State::Closing { .. } | State::OpeningForHazard { .. } => {}
        }
    }

    /// A call for the stop the car already rests at: open the doors instead
    /// of moving. Only meaningful while waiting with the doors closed.
    fn on_same_floor_call(&mut self) {
        if matches!(self.state, State::WaitingClosed) {
            self.transition(State::Opening {
                done_at: self.now + self.door_time,
            });
        }
    }

    fn enter_moving(&mut self) {
        if let Some(call) = self.target {
            if let Ok(dest_height) = self.registry.height_of(call.stop) {
                self.transition(State::Moving { call, dest_height });
            }
        }
    }

    fn tick_moving(&mut self, call: Call, dest_height: f64, dt: f64) {
        let (position, velocity) = self
            .motion
            .step(self.position, self.velocity, dest_height, dt);
        self.position = position;
        self.velocity = velocity;

        if motion::has_arrived(self.position, dest_height) {
            // Park exactly on the stop so repeated trips land on identical
            // coordinates.
            self.position = dest_height;
            self.velocity = 0.0;
            let _ = self.lamp_tx.send((call.button, ButtonVisual::Ready));
            self.last_stop = call.stop;
            if self.target == Some(call) {
                self.target = None;
            }
            info!("arrived at stop {}", call.stop);
            self.transition(State::Opening {
                done_at: self.now + self.door_time,
            });
        }
    }

    fn transition(&mut self, next: State) {
        if next == self.state {
            return;
        }
        debug!(
            "state change: {:?} -> {:?}",
            self.state.label(),
            next.label()
        );
        self.exit_state();
        self.state = next;
        self.enter_state();
        self.publish_snapshot();
    }

    fn exit_state(&mut self) {
        if let State::Moving { .. } = self.state {
            let _ = self.audio_tx.send(AudioCommand::Stop(AudioCue::Moving));
            if self.occupant_attached {
                let _ = self.audio_tx.send(AudioCommand::Stop(AudioCue::Music));
                let _ = self.cabin_tx.send(CabinCommand::ReleaseOccupant);
                self.occupant_attached = false;
            }
        }
    }

    fn enter_state(&mut self) {
        match self.state {
            State::WaitingClosed | State::WaitingOpen { .. } => {}
            State::Moving { .. } => {
                self.velocity = 0.0;
                let _ = self.audio_tx.send(AudioCommand::Play(AudioCue::Moving));
                if self.occupant_inside {
                    let _ = self.audio_tx.send(AudioCommand::Play(AudioCue::Music));
                    let _ = self.cabin_tx.send(CabinCommand::AttachOccupant);
                    self.occupant_attached = true;
                }
            }
            State::Opening { .. } => {
                self.command_doors(DoorAction::Open);
                let _ = self
                    .audio_tx
                    .send(AudioCommand::Play(AudioCue::DoorsOpening));
            }
            State::Closing { .. } => {
                self.command_doors(DoorAction::Close);
                let _ = self
                    .audio_tx
                    .send(AudioCommand::Play(AudioCue::DoorsClosing));
            }
            State::OpeningForHazard { .. } => {
                let _ = self
                    .audio_tx
                    .send(AudioCommand::Play(AudioCue::ClosingError));
                self.command_doors(DoorAction::Open);
                let _ = self
                    .audio_tx
                    .send(AudioCommand::Play(AudioCue::DoorsOpening));
            }
        }
    }

    /// Operate the cabin door together with the landing door of the floor
    /// the car is physically at. The new target's landing door is never
    /// touched before arrival.
    fn command_doors(&mut self, action: DoorAction) {
        let _ = self.door_tx.send(DoorCommand {
            door: DoorId::Cabin,
            action,
        });
        let _ = self.door_tx.send(DoorCommand {
            door: DoorId::Landing(self.last_stop),
            action,
        });
    }

    fn publish_snapshot(&self) {
        let _ = self.state_tx.send(CarSnapshot {
            state: self.state.label(),
            position: self.position,
            velocity: self.velocity,
            target_stop: self.target_stop(),
            last_stop: self.last_stop,
        });
    }
}
