//! Wire client adapters.
//!
//! A production protocol client plugs in through the `WireClient` port; this
//! module ships the in-process loopback used for development and tests.

mod loopback;

pub use loopback::{LoopbackWireClient, SentMessage};
