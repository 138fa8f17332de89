//! Outbound adapters for the domain's driven ports.

pub mod persistence;
