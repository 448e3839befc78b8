//! # cafe-core
//!
//! Core types and pure logic for the coffee knowledge base.
//!
//! This crate provides the pieces every other crate agrees on:
//! - Entity structs (characteristics, coffee types, bindings, queries)
//! - Kind, role and flow-state enums (the specialist flow is a state machine)
//! - The cross-cutting error taxonomy
//! - `validate`: the single value validator used by every write path
//! - `completeness`: the knowledge-base completeness check
//! - `request`: normalization of specialist form input into a classification query
//! - `snapshot`: the explicit client-side cache of the knowledge base

pub mod completeness;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod request;
pub mod responses;
pub mod snapshot;
pub mod validate;
