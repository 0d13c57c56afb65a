pub mod fsm;
pub mod motion;

pub use fsm::ElevatorFSM;
pub use fsm::Event;
