//! Plaintext circuit evaluation and bit packing, shared by module tests.

use crate::circuit::{Circuit, GateKind};

/// Evaluates a built circuit over plaintext bits, bypassing garbling.
pub(crate) fn plain_eval(c: &Circuit, inputs: &[bool]) -> Vec<bool> {
    assert_eq!(inputs.len(), c.n);
    let mut values = vec![false; c.r];
    values[..c.n].copy_from_slice(inputs);
    values[c.wire_one()] = true;
    for gate in &c.gates {
        let a = values[gate.input0];
        let b = values[gate.input1];
        values[gate.output] = match gate.kind {
            GateKind::And => a && b,
            GateKind::Or => a || b,
            GateKind::Xor => a ^ b,
            GateKind::Not => !a,
            GateKind::Zero => false,
            GateKind::One => true,
            GateKind::Empty => continue,
        };
    }
    c.outputs.iter().map(|&w| values[w]).collect()
}

/// Little-endian bits of `value`.
pub(crate) fn to_bits(value: u64, n: usize) -> Vec<bool> {
    (0..n).map(|i| (value >> i) & 1 == 1).collect()
}

/// Value of little-endian bits.
pub(crate) fn from_bits(bits: &[bool]) -> u64 {
    bits.iter().rev().fold(0, |acc, &bit| (acc << 1) | u64::from(bit))
}
