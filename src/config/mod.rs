pub mod settings;

pub use settings::{AppConfig, BackgroundMode, ThemeColor};
