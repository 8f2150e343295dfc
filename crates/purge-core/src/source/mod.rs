//! Content source implementations

pub mod channel;
pub mod lines;

pub use channel::ChannelContentSource;
pub use lines::LinesContentSource;
