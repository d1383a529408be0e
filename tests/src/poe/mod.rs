//! # Proof-of-Engagement Flows
//!
//! Drives the module through its inbound ports against the in-memory
//! contract host:
//!
//! 1. **Genesis**: contract suite bootstrap, oversight community seeding and
//!    genesis validators
//! 2. **Validator lifecycle**: runtime `CreateValidator` / `UpdateValidator`
//! 3. **Governance**: oversight proposals granting engagement points through
//!    the privileged caller wired at bootstrap

pub mod fixtures;

#[cfg(test)]
mod bootstrap_flow;
#[cfg(test)]
mod governance_flow;
#[cfg(test)]
mod validator_flow;
