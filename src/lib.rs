//! Protocol client and rules engine for SGK hire and termination notifications
//!
//! This crate submits employment start and end notifications to the Turkish
//! Social Security Institution's registration web service, queries prior
//! filings, retrieves confirmation documents, and applies the local business
//! rules (national id checksum, pay periods by employer category, partial-time
//! classification, late-filing penalties) before anything is sent.
//!
//! The [`gateway::SgkGateway`] is the entry point. The [`api`] module exposes
//! the same operations as a JSON facade.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod protocol;
pub mod transport;
pub mod validation;
