//! Watches an IMAP folder with IDLE and publishes every new message as a
//! structured event.

mod fetch;
mod host;
mod idle;
mod metrics;
mod password;
mod pipeline;
mod session;
mod settings;
mod state;
mod worker;

pub use fetch::*;
pub use host::*;
pub use idle::*;
pub use metrics::*;
pub use password::*;
pub use pipeline::*;
pub use session::*;
pub use settings::*;
pub use state::*;
pub use worker::*;
