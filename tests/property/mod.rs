//! Property-based tests for output normalization and ranking invariants

mod normalization;
mod solution_invariants;
