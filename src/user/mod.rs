//! User module
//!
//! Wire shapes of the user-management API: profiles, settings, admin
//! statistics, listing filters, pagination and response envelopes, plus the
//! helpers that validate and apply request payloads.

pub mod dto;
pub mod error;
pub mod models;
pub mod pagination;
pub mod responses;
pub mod upload;
