pub mod app;
pub mod events;
pub mod picker;
pub mod theme;
pub mod timer;
pub mod widgets;
