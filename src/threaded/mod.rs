//! Multi-core execution: one row band per core, barrier-synchronized.
//!
//! The M dimension is split into equal contiguous bands, one per core. Each
//! core runs the single-core sweep against its private A and C rows and the
//! shared, read-only B, in lockstep with the others through a fixed set of
//! barrier rendezvous. There is no load balancing and no work stealing; the
//! partition is decided before the first barrier and never changes.
//!
//! Barriers here mean "wait for everyone", with no timeout: a core that
//! never arrives blocks the whole group indefinitely. That is the intended
//! semantics of this cooperative kernel, not an oversight: layering a
//! timeout underneath would silently change what the timed pass measures.

pub mod spmd;

pub use spmd::{SpmdConfig, SpmdReport, gemm_parallel, spmd_run};
