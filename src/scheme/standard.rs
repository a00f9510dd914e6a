use aes::Aes128;

use super::{Kernel, hash_keys};
use crate::block::Block;
use crate::circuit::GateKind;

/// GRR3 row reduction with free XOR: three ciphertexts per non-XOR gate.
///
/// The two fan-ins are domain-separated by doubling the first once and the
/// second twice before hashing; the table row whose ciphertext would be zero
/// (the one selected by the two permutation bits) is omitted.
#[derive(Debug)]
pub struct StandardKernel;

/// Output truth table indexed by `2 * a + b` over plaintext input values.
///
/// The NOT pattern reads the second fan-in, which aliases the first; the two
/// mixed rows are unreachable filler.
fn truth_table(kind: GateKind) -> [bool; 4] {
    match kind {
        GateKind::And => [false, false, false, true],
        GateKind::Or => [false, true, true, true],
        GateKind::Not => [true, false, true, false],
        _ => unreachable!("no truth table for {kind:?}"),
    }
}

impl Kernel for StandardKernel {
    const ENTRIES_PER_GATE: usize = 3;

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
        if kind == GateKind::Xor {
            let out0 = a0 ^ b0;
            return (out0, out0 ^ delta);
        }

        let tweak = Block::make(gate_id as u64, 0);
        let pa = a0.lsb();
        let pb = b0.lsb();

        let da0 = a0.double();
        let da1 = a1.double();
        let db0 = b0.double().double();
        let db1 = b1.double().double();

        // h[2a + b] hashes the label combination for input values (a, b)
        let h = hash_keys(
            cipher,
            [
                da0 ^ db0 ^ tweak,
                da0 ^ db1 ^ tweak,
                da1 ^ db0 ^ tweak,
                da1 ^ db1 ^ tweak,
            ],
        );

        let truth = truth_table(kind);
        let new_token = h[2 * pa as usize + pb as usize];
        let new_token2 = new_token ^ delta;
        let (out0, out1) = if truth[2 * pa as usize + pb as usize] {
            (new_token2, new_token)
        } else {
            (new_token, new_token2)
        };

        for a in 0..2usize {
            for b in 0..2usize {
                // the row lands at the slot named by the signal bits; the
                // all-zero slot is the omitted one
                let row = 2 * ((a == 1) ^ pa) as usize + ((b == 1) ^ pb) as usize;
                if row == 0 {
                    continue;
                }
                let label = if truth[2 * a + b] { out1 } else { out0 };
                table[row - 1] = label ^ h[2 * a + b];
            }
        }

        (out0, out1)
    }

    fn eval_gate(
        cipher: &Aes128,
        kind: GateKind,
        a: Block,
        b: Block,
        table: &[Block],
        gate_id: usize,
    ) -> Block {
        if kind == GateKind::Xor {
            return a ^ b;
        }

        let tweak = Block::make(gate_id as u64, 0);
        let sa = a.lsb();
        let sb = b.lsb();
        let row = 2 * sa as usize + sb as usize;
        let [h] = hash_keys(cipher, [a.double() ^ b.double().double() ^ tweak]);
        if row == 0 { h } else { h ^ table[row - 1] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::test_support::check_gate;

    #[test]
    fn and_gate_all_combinations() {
        check_gate::<StandardKernel>(GateKind::And, [false, false, false, true], false);
    }

    #[test]
    fn or_gate_all_combinations() {
        check_gate::<StandardKernel>(GateKind::Or, [false, true, true, true], false);
    }

    #[test]
    fn xor_gate_all_combinations() {
        check_gate::<StandardKernel>(GateKind::Xor, [false, true, true, false], false);
    }

    #[test]
    fn not_gate_both_values() {
        check_gate::<StandardKernel>(GateKind::Not, [true, false, true, false], false);
    }
}
