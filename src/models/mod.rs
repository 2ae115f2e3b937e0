//! Response models for the caching proxy API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing HTTP response bodies. Proxied product responses carry the
//! upstream JSON verbatim and need no DTO.

pub mod responses;

// Re-export commonly used types
pub use responses::{
    CacheReport, ClearResponse, EntryReport, ErrorResponse, HealthResponse, StatsResponse,
    StatusResponse,
};
