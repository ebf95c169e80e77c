//! User-account service library.
//!
//! Hexagonal layout: `domain` holds the typed model, ports, and services;
//! `inbound` adapts HTTP requests onto the driving ports; `outbound`
//! implements the driven ports (hashing, tokens, persistence); `server`
//! wires routes and configuration for the binary and for tests.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;
