pub mod controller;

pub use controller::{RecordingController, RoomRecordingStatus, StartOutcome, StopOutcome};
