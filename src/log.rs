mod error;
mod message;

pub use error::Error;
pub use message::*;

const RED: &str = "\x1B[31m";
const RESET: &str = "\x1B[0m";
