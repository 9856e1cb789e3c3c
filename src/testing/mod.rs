//! Test doubles for the chain seams

mod mock_chain;

pub use mock_chain::*;
