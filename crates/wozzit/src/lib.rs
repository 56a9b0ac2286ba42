//! Top-level facade crate for Wozzit.
//!
//! Re-exports the protocol core and the node library so users can depend on a single crate.

pub mod core {
    pub use wozzit_core::*;
}

pub mod node {
    pub use wozzit_node::*;
}
