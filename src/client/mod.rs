pub mod toggle;

pub use toggle::{RecordingToggle, ToggleError, ToggleEvent, ToggleState};
