//! # Tenant-Gate Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── access_benchmarks.rs   # Hot-path cost of access checks and dispatch
//! └── src/
//!     ├── fixtures.rs            # Course platform wired through every crate
//!     └── integration/
//!         ├── flows.rs           # End-to-end authorization flows
//!         └── hot_reload.rs      # Snapshot swaps and concurrency
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p tg-tests
//!
//! # By category
//! cargo test -p tg-tests integration::flows::
//! cargo test -p tg-tests integration::hot_reload::
//!
//! # Benchmarks
//! cargo bench -p tg-tests
//! ```

pub mod fixtures;
pub mod integration;
