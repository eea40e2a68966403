// ABOUTME: Core types and constants for the Season Planner training plan service
// ABOUTME: Foundation crate with error handling, domain models, validation, and week calendar
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

#![deny(unsafe_code)]

//! # Planner Core
//!
//! Foundation crate providing shared types for the Season Planner service.
//! It changes rarely, so the server and analytics crates can build on it
//! without recompiling each other.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Validation limits and defaults organized by domain
//! - **models**: Plans, weeks, sessions, activities, and reference data
//! - **calendar**: Monday-aligned week generation for new plans

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Domain models and typed request records with field validation
pub mod models;

/// Monday-to-Sunday week boundaries and plan week generation
pub mod calendar;
