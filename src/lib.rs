//! Workspace root for the CloudModel replication stack.
//!
//! This crate has no code of its own — it exists to host the end-to-end
//! integration tests under `tests/integration/`, which exercise
//! `cloudmodel-engine`, `cloudmodel-transport`, and the `server` binary
//! together. See `crates/engine` for the client reconciliation engine and
//! `services/server` for the serializer.
