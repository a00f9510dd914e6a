//! Garbling and evaluation of boolean circuits with free-XOR, half-gates and
//! privacy-free schemes over fixed-key AES.

/// AES-128 circuit components built on the gadget library
pub mod aescircuit;
/// 128-bit blocks, wire label pairs and the seeded block source
pub mod block;
/// Wire allocation and gate emission while a circuit is being built
pub mod builder;
/// Passive circuit data model shared by garbler and evaluator
pub mod circuit;
/// Garbled circuit evaluation and output decoding
pub mod evaluator;
/// Circuit garbling, label generation and table digests
pub mod garbler;
/// Reusable circuit gadgets: logic fans, arithmetic, comparisons
pub mod gadgets;
/// Per-gate garble/evaluate kernels for the three schemes
pub mod scheme;
/// Byte-exact circuit snapshots and stream save/load
pub mod serialize;

#[cfg(test)]
mod testutil;
