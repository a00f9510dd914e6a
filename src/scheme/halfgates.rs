use aes::Aes128;

use super::{Kernel, hash2, hash4, tweak1, tweak2};
use crate::block::Block;
use crate::circuit::GateKind;

/// Half-gates construction (ZRE15): two ciphertexts per AND/OR gate.
///
/// Row 0 is the generator's half (keyed by the first fan-in), row 1 the
/// evaluator's half (keyed by the second). XOR is free and NOT is a free
/// offset by delta; neither writes a ciphertext.
#[derive(Debug)]
pub struct HalfGatesKernel;

impl Kernel for HalfGatesKernel {
    const ENTRIES_PER_GATE: usize = 2;

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
            GateKind::Not => {
                let out0 = a0 ^ delta;
                (out0, out0 ^ delta)
            }
            GateKind::And => {
                let pa = a0.lsb();
                let pb = b0.lsb();
                let (ha0, ha1, hb0, hb1) =
                    hash4(cipher, a0, a1, b0, b1, tweak1(gate_id), tweak2(gate_id));

                let mut t0 = ha0 ^ ha1;
                if pb {
                    t0 ^= delta;
                }
                let mut w0 = ha0;
                if pa {
                    w0 ^= t0;
                }
                let tmp = hb0 ^ hb1;
                let t1 = tmp ^ a0;
                w0 ^= hb0;
                if pb {
                    w0 ^= tmp;
                }

                table[0] = t0;
                table[1] = t1;
                (w0, w0 ^ delta)
            }
            GateKind::Or => {
                let pa = a0.lsb();
                let pb = b0.lsb();
                let (ha0, ha1, hb0, hb1) =
                    hash4(cipher, a0, a1, b0, b1, tweak1(gate_id), tweak2(gate_id));

                let mut t0 = ha0 ^ ha1;
                if !pb {
                    t0 ^= delta;
                }
                let mut w0 = if pa { ha1 } else { ha0 };
                if !(!pa && !pb) {
                    w0 ^= delta;
                }
                let t1 = hb0 ^ hb1 ^ a1;
                w0 ^= if pb { hb1 } else { hb0 };

                table[0] = t0;
                table[1] = t1;
                (w0, w0 ^ delta)
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
            GateKind::And | GateKind::Or => {
                let sa = a.lsb();
                let sb = b.lsb();
                let (ha, hb) = hash2(cipher, a, b, tweak1(gate_id), tweak2(gate_id));
                let mut w = ha ^ hb;
                if sa {
                    w ^= table[0];
                }
                if sb {
                    w ^= table[1] ^ a;
                }
                w
            }
            _ => unreachable!("kernel cannot evaluate {kind:?}"),
        }
    }
}
