pub mod macros;
pub mod structs;

pub use structs::AudioCommand;
pub use structs::AudioCue;
pub use structs::ButtonId;
pub use structs::ButtonVisual;
pub use structs::CabinCommand;
pub use structs::CallError;
pub use structs::CarSnapshot;
pub use structs::CarState;
pub use structs::DoorAction;
pub use structs::DoorCommand;
pub use structs::DoorId;
pub use structs::StopId;
