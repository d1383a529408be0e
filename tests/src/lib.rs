//! # Proof-of-Engagement Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── poe/              # Genesis to governance flows
//!     ├── fixtures.rs   # Test chain with funded accounts
//!     ├── bootstrap_flow.rs
//!     ├── validator_flow.rs
//!     └── governance_flow.rs
//!
//! tests/benches/
//! └── poe_benchmarks.rs # Address derivation, bootstrap, genesis validators
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qc-tests
//!
//! # By flow
//! cargo test -p qc-tests poe::governance_flow::
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod poe;
