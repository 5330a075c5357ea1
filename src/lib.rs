//! Coalesces repeated "announce this key/value" requests from many callers
//! into one supervised, periodic publication stream.
//!
//! ```ignore
//! let announcer = Announcer::with_advertiser(Arc::new(MyDhtClient::new()));
//! let handle = announcer.enqueue("topic", "peer-addr").await;
//! // ... announced within a second, then re-announced every two minutes
//! announcer.dequeue(&handle).await;
//! ```

mod advertise;
mod announcer;
mod config;
mod constants;
mod errors;
mod handle;
mod publisher;
mod registry;
pub mod metrics;
pub(crate) mod utils;

pub use advertise::*;
pub use announcer::*;
pub use self::config::*;
pub use errors::*;
pub use handle::*;
pub use publisher::LastError;
pub use registry::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub(crate) mod test_utils;
