pub mod block;
pub mod dpr;
pub mod fields;
pub mod header;
pub mod types;

pub use block::{BlockDetection, DataBlock};
pub use dpr::Dpr;
pub use types::{ChannelDef, Header, ParseError, Parseable, Run, CHANNEL_CATALOG};
