/* 3rd party libraries */
use clap::{Arg, Command};
use crossbeam_channel as cbc;
use log::error;
use std::thread::Builder;
use std::time::Duration;

/* Custom libraries */
use elevator::ElevatorFSM;
use shared::{AudioCommand, ButtonId, ButtonVisual, CabinCommand, CarSnapshot, DoorCommand};
use sim::SimDriver;
use stops::{CallPanel, StopRegistry};

/* Modules */
mod config;
mod elevator;
mod shared;
mod sim;
mod stops;

/* Main */
fn main() {
    env_logger::init();

    let matches = Command::new("liftsim")
        .about("Interactive elevator simulation")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the configuration file"),
        )
        .get_matches();

    // Load the configuration and build the scene
    let config_path = matches.value_of("config").unwrap_or("config.toml");
    let config = unwrap_or_exit!(config::load_config(config_path));
    let registry = StopRegistry::from_config(&config.stops);
    let panel = unwrap_or_exit!(CallPanel::from_config(&config.buttons, &registry));

    // Event channels
    let (button_tx, button_rx) = cbc::unbounded::<ButtonId>();
    let (hazard_tx, hazard_rx) = cbc::unbounded::<()>();
    let (occupancy_tx, occupancy_rx) = cbc::unbounded::<bool>();
    let (_terminate_tx, terminate_rx) = cbc::unbounded::<()>();

    // Actuator channels
    let (door_tx, door_rx) = cbc::unbounded::<DoorCommand>();
    let (audio_tx, audio_rx) = cbc::unbounded::<AudioCommand>();
    let (lamp_tx, lamp_rx) = cbc::unbounded::<(ButtonId, ButtonVisual)>();
    let (cabin_tx, cabin_rx) = cbc::unbounded::<CabinCommand>();
    let (state_tx, state_rx) = cbc::unbounded::<CarSnapshot>();

    // Start the elevator module
    let elevator_fsm = ElevatorFSM::new(
        &config.elevator,
        registry,
        panel,
        button_rx,
        hazard_rx,
        occupancy_rx,
        terminate_rx,
        door_tx,
        audio_tx,
        lamp_tx,
        cabin_tx,
        state_tx,
    );

    let tick_interval = Duration::from_millis(config.simulation.tick_ms);
    let elevator_fsm_thread = Builder::new().name("elevator_fsm".into());
    unwrap_or_exit!(elevator_fsm_thread.spawn(move || elevator_fsm.run(tick_interval)));

    // The sim driver owns the main thread: it plays the scripted scene and
    // logs every actuator command the state machine issues.
    let driver = SimDriver::new(
        &config.simulation,
        button_tx,
        hazard_tx,
        occupancy_tx,
        door_rx,
        audio_rx,
        lamp_rx,
        cabin_rx,
        state_rx,
    );
    driver.run();
}
