pub mod cases;
pub mod channel;
pub mod concurrency;
pub mod preflight;
pub mod suite;

pub use cases::Case;
pub use channel::{CommandChannel, Connector};
pub use concurrency::{BatchReport, ClientOutcome};
