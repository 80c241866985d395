// Copyright (c) 2025 - Cowboy AI, Inc.
//! Admission Service Layer
//!
//! Application service implementing `Join`/`Leave` on top of the
//! membership store. See [`admission`] for the control flow and outcome
//! types.

pub mod admission;

pub use admission::{AdmissionService, JoinOutcome, LeaveOutcome, StoreAdmissionService};
