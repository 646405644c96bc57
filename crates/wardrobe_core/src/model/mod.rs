//! Wardrobe domain model.
//!
//! # Responsibility
//! - Define asset references handed over by external pickers.
//! - Define catalog records (garment entries) and their factory.
//!
//! # Invariants
//! - Every garment entry carries a `GarmentId` generated once and never reused.
//! - Asset references are in-memory only; nothing here is persisted.

pub mod asset;
pub mod garment;
