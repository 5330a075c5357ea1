//! Background publication machinery.
//!
//! ```text
//! enqueue/dequeue ──▶ SharedState (registry, pending queue, run flag)
//!                          ▲
//!                          │ one tokio Mutex
//!                          │
//! Supervisor ──spawns──▶ Publisher ──▶ AdvertiseService::announce
//!     ▲                      │
//!     └──── error/panic ─────┘  (record, pause, restart)
//! ```
//!
//! At most one publisher is alive at any time. The publisher counter is
//! claimed with a compare-exchange and a second claim is a programming error.

mod publisher;
mod shared;
mod supervisor;

pub(crate) use publisher::*;
pub use shared::LastError;
pub(crate) use shared::Shared;
pub(crate) use shared::SharedState;
pub(crate) use supervisor::*;
