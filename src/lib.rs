//! Core library for the `logplayer` CLI.
//!
//! `logplayer` loads a corpus of recorded messages, either lines of a text
//! file or transport payloads from a packet capture, and replays it in a
//! loop over TCP or UDP from a pool of concurrent workers for a bounded
//! duration. The primary user-facing interface is the binary; library APIs
//! exist so the corpus builder and replay engine can be driven directly.
pub mod args;
pub mod capture;
pub mod corpus;
pub mod error;
pub mod replay;
pub mod shutdown;
