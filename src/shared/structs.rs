/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;

/***************************************/
/*       Public data structures        */
/***************************************/
pub type StopId = usize;
pub type ButtonId = usize;

/// Label for the car's current state, published with every snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CarState {
    WaitingClosed,
    WaitingOpen,
    Moving,
    Opening,
    Closing,
    OpeningForHazard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorId {
    Cabin,
    Landing(StopId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorAction {
    Open,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorCommand {
    pub door: DoorId,
    pub action: DoorAction,
}

/// Named audio cues; the sink decides which asset each cue maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    DoorsOpening,
    DoorsClosing,
    ClosingError,
    Moving,
    Music,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommand {
    Play(AudioCue),
    Stop(AudioCue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonVisual {
    Pressed,
    Ready,
}

/// Occupant handling while the car moves. The scene glue is expected to
/// attach the occupant to the car frame for the duration of the ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CabinCommand {
    AttachOccupant,
    ReleaseOccupant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarSnapshot {
    pub state: CarState,
    pub position: f64,
    pub velocity: f64,
    pub target_stop: Option<StopId>,
    pub last_stop: StopId,
}

/***************************************/
/*               Errors                */
/***************************************/
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    #[error("button {0} is not configured on the call panel")]
    UnknownButton(ButtonId),

    #[error("stop {stop} is out of range, registry holds {len} stops")]
    UnknownStop { stop: StopId, len: usize },
}
