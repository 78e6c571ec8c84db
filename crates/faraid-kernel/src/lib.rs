//! # Faraid Kernel
//!
//! The allocation engine for Faraid proportional inheritance: given a net
//! estate and the heirs present, decide who is excluded, who takes a
//! prescribed fraction, who takes the residue, and how the result is
//! balanced when the fractions overshoot or undershoot the estate.
//!
//! The engine is a pure function. It holds no state, performs no I/O and
//! may be called concurrently from any number of threads.
//!
//! ## Pipeline
//!
//! ```text
//! HeirRecord ──validate──▶ Heirs
//!     │
//! precedence::resolve     ← hijab: who is blocked, working copy
//!     │
//! fixed::assign           ← fardh: fractions of the net estate
//!     │
//! residuary::distribute   ← 'aṣabah: the remainder, by weight
//!     │
//! correction::balance     ← 'aul / radd
//!     │
//! Allocation              ← one entry per present category
//! ```
//!
//! Out of scope: estate valuation and the deduction of debts, bequests and
//! funeral costs. Callers hand in the net estate.

pub mod allocation;
pub mod correction;
pub mod engine;
pub mod error;
pub mod fixed;
pub mod heir;
pub mod precedence;
pub mod residuary;
pub mod share;

pub use allocation::{
    Allocation, AllocationEntry, Basis, Correction, NoShareReason, ResiduaryKind,
};
pub use engine::allocate;
pub use error::FaraidError;
pub use heir::{HeirCategory, HeirRecord, Heirs, Presence};
pub use share::Fraction;
