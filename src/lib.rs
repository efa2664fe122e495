#![doc(test(attr(deny(warnings))))]

//! Bank Client is a terminal front end for a remote banking HTTP API. It keeps
//! a local view of the server's accounts and turns form submissions into
//! account creation, deposit, withdraw, and transfer requests.

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Bank Client tracing initialized.");
    });
}
