//! # Grls Core
//!
//! `grls-core` is the library powering the `grls` CLI. It talks to the gRPC Server Reflection
//! service of any server and turns the answers into a flat list of services and methods, without
//! any compile-time knowledge of the server's Protobuf schema.
//!
//! ## Key Components
//!
//! * **[`Introspector`](client::Introspector):** The main entry point. It owns a reflection session
//!   and runs the fixed pipeline: list services, fetch the descriptors of each one, project them.
//! * **[`ReflectionSession`](reflection::session::ReflectionSession):** A single bidirectional
//!   reflection stream, driven one request/response exchange at a time.
//! * **[`ServiceMethod`](signature::ServiceMethod):** The output record, serializable as JSON.
//!
//! ## Pipeline
//!
//! 1. [`services::list_services`]
//! 2. [`descriptors::fetch_all_for`]
//! 3. [`signature::project_methods`]
//!
//! Each step returns either its result or a single [`ReflectionError`](reflection::ReflectionError).
//! Nothing is retried and no partial results are ever returned.
//!
//! ## Re-exports
//!
//! This crate re-exports `prost`, `prost-types` and `tonic` to ensure that consumers
//! use compatible versions of these underlying dependencies.
pub mod client;
pub mod config;
pub mod descriptors;
pub mod reflection;
pub mod services;
pub mod signature;

// Re-exports
pub use prost;
pub use prost_types;
pub use tonic;

/// Type alias for the standard boxed error used in generic bounds.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
