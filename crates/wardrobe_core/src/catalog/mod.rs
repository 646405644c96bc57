//! Garment catalog ownership.
//!
//! # Responsibility
//! - Own the ordered garment collection and be its only mutator.
//! - Tell observers (the presentation layer) after every mutation.
//!
//! # Invariants
//! - Insertion order is display order.
//! - Ids are pairwise distinct across the collection.
//! - No-op calls (empty append, unknown id) do not notify.

pub mod manager;
