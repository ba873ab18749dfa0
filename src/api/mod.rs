pub mod client;
pub mod source;

pub use client::MyQuranClient;
pub use source::ScheduleSource;
