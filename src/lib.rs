//! CEP Address Lookup API Library
//!
//! This library provides the core functionality for the CEP Address Lookup API:
//! a single-endpoint HTTP service that resolves a Brazilian postal code (CEP)
//! to a postal address by delegating to the ViaCEP API, caching successful
//! lookups, and translating upstream failures into a small set of user-facing
//! error responses.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `integrations`: External service integrations.
//! - `address_service`: Address resolution orchestration.
//! - `cache_validator`: Cache integrity validation utilities.
//! - `config`: Configuration management.
//! - `errors`: Error handling types and boundary translation.
//! - `handlers`: HTTP request handlers and router.
//! - `models`: Core data models.
//! - `pipeline`: Outbound HTTP request pipeline (cache, logging, retry).
//! - `request_trace`: Per-request trace id propagation.
//! - `viacep_client`: ViaCEP API client.

pub mod api;
pub mod core;
pub mod integrations;

// Re-export primary modules for shared use in tests and other binaries
pub mod address_service;
pub mod cache_validator;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod request_trace;
pub mod viacep_client;
