use aes::Aes128;

use super::{Kernel, hash1, hash2, tweak1};
use crate::block::Block;
use crate::circuit::GateKind;

/// Privacy-free garbling (ZRE15): one ciphertext per AND/OR gate.
///
/// Every wire keeps `lsb(label0) == 0` and `lsb(label1) == 1`, so the
/// evaluator's held bit is its permutation bit. The kernel restores the
/// invariant on the hashes before using them. NOT is a plain label-pair
/// swap and should not appear in circuits garbled under this scheme: the
/// swapped pair carries inverted permutation bits, which misleads any
/// downstream AND/OR gate.
#[derive(Debug)]
pub struct PrivacyFreeKernel;

impl Kernel for PrivacyFreeKernel {
    const ENTRIES_PER_GATE: usize = 1;

    fn garble_gate(
        cipher: &Aes128,
        kind: GateKind,
        a0: Block,
        a1: Block,
        b0: Block,
        b1: Block,
        delta: Block,
        table: &mut [Block],
        gate_id: usize,
    ) -> (Block, Block) {
        match kind {
            GateKind::Xor => {
                let out0 = a0 ^ b0;
                (out0, out0 ^ delta)
            }
            GateKind::Not => (a1, a0),
            GateKind::And | GateKind::Or => {
                let t = tweak1(gate_id);
                let (ha0, ha1) = hash2(cipher, a0, a1, t, t);
                let ha0 = ha0.with_lsb(false);
                let ha1 = ha1.with_lsb(true);
                let tmp = ha0 ^ ha1;
                if kind == GateKind::And {
                    table[0] = tmp ^ b0;
                    (ha0, ha0 ^ delta)
                } else {
                    table[0] = tmp ^ b1;
                    (ha1 ^ delta, ha1)
                }
            }
            _ => unreachable!("kernel cannot garble {kind:?}"),
        }
    }

    fn eval_gate(
        cipher: &Aes128,
        kind: GateKind,
        a: Block,
        b: Block,
        table: &[Block],
        gate_id: usize,
    ) -> Block {
        match kind {
            GateKind::Xor => a ^ b,
            GateKind::Not => a,
            GateKind::And => {
                let sa = a.lsb();
                let ha = hash1(cipher, a, tweak1(gate_id));
                if sa {
                    ha.with_lsb(true) ^ table[0] ^ b
                } else {
                    ha.with_lsb(false)
                }
            }
            // the held bit decides the gate for a=1, so the halves mirror
            GateKind::Or => {
                let sa = a.lsb();
                let ha = hash1(cipher, a, tweak1(gate_id));
                if sa {
                    ha.with_lsb(true)
                } else {
                    ha.with_lsb(false) ^ table[0] ^ b
                }
            }
            _ => unreachable!("kernel cannot evaluate {kind:?}"),
        }
    }
}
