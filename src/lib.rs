//! Nightly pricing service for short-term rental listings.
//!
//! Hexagonal architecture: pricing, filtering and calendar logic in
//! [`domain`], port traits in [`ports`], concrete implementations in
//! [`adapters`], command-line entry points in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
