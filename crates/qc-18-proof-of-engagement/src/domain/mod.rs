//! # Domain Layer
//!
//! Pure domain logic for the Proof-of-Engagement subsystem.
//!
//! ## Contents
//!
//! - `entities`: Contract roles, validator descriptions and records
//! - `value_objects`: Addresses, keys, coins and decimals
//! - `messages`: Module transactions
//! - `registry`: Write-once role to address mapping
//! - `genesis`: Genesis configuration document
//! - `services`: Address derivation and numeric conversions
//! - `invariants`: Post-bootstrap expectations

pub mod entities;
pub mod genesis;
pub mod invariants;
pub mod messages;
pub mod registry;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use genesis::*;
pub use invariants::*;
pub use messages::*;
pub use registry::*;
pub use services::*;
pub use value_objects::*;
