//! Shared setup for the `sports-trivia-backend` and `ingest` binaries.

pub mod telemetry;
