pub mod layout;
pub mod settings;

pub use layout::OutputLayout;
pub use settings::{PackSettings, SETTINGS_FILE};
