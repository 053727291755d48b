//! # Cipher-Ledger Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks (gateway, full filtering round)
//! └── src/integration/  # Cross-subsystem scenarios over the wired ledger
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cl-tests
//! cargo test -p cl-tests integration::concurrency::
//! cargo bench -p cl-tests
//! ```

pub mod integration;
