//! In-memory durable backend
//!
//! Implements every repository trait over process-local tables. Each trait
//! call bumps a shared counter, and a failure switch makes every call
//! return a database error, so callers can assert exactly how (and whether)
//! the durable layer was touched.

mod backend;

pub use backend::MemoryBackend;
