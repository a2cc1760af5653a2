//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate account and item repositories into caller-level flows.
//! - Keep CLI/UI callers decoupled from storage details.

pub mod scan_service;
