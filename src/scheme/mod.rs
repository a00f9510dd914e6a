//! Per-gate garble/evaluate kernels.
//!
//! Each scheme implements the same [`Kernel`] interface: a closed-form
//! transform on at most four input labels that yields the output label(s)
//! and writes this gate's slot of the ciphertext table. The drivers in
//! [`crate::garbler`] and [`crate::evaluator`] are generic over the kernel
//! and dispatch once per circuit.
//!
//! The shared hash is fixed-key AES in a Davies–Meyer arrangement:
//! `H(x, t) = AES_K(double(x) ^ t) ^ (double(x) ^ t)`, with per-gate tweaks
//! keeping every AES call in a garbling unique.

mod halfgates;
mod privacy_free;
mod standard;

use aes::Aes128;
use aes::cipher::BlockEncrypt;

use crate::block::Block;
use crate::circuit::GateKind;

pub use halfgates::HalfGatesKernel;
pub use privacy_free::PrivacyFreeKernel;
pub use standard::StandardKernel;

/// One garbling scheme's per-gate transforms.
///
/// `garble_gate` receives both labels of each fan-in wire and returns the
/// output pair; `eval_gate` receives the single held labels and returns the
/// single output label. `table` is this gate's slot: `ENTRIES_PER_GATE`
/// blocks for gates that consume one, empty for XOR.
pub trait Kernel {
    /// Ciphertext entries reserved per non-XOR gate.
    const ENTRIES_PER_GATE: usize;

    /// Garbles one gate, writing its ciphertexts into `table`.
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
    ) -> (Block, Block);

    /// Evaluates one gate from the held labels and its ciphertexts.
    fn eval_gate(
        cipher: &Aes128,
        kind: GateKind,
        a: Block,
        b: Block,
        table: &[Block],
        gate_id: usize,
    ) -> Block;
}

/// Expands a block into the fixed AES key schedule used by the gate hashes.
pub(crate) fn expand_key(key: Block) -> Aes128 {
    use aes::cipher::KeyInit;
    Aes128::new(&key.into_bytes().into())
}

/// First per-gate tweak: `2 * gate_id` in the low half.
pub(crate) fn tweak1(gate_id: usize) -> Block {
    Block::make(2 * gate_id as u64, 0)
}

/// Second per-gate tweak: `2 * gate_id + 1` in the low half.
pub(crate) fn tweak2(gate_id: usize) -> Block {
    Block::make(2 * gate_id as u64 + 1, 0)
}

/// Encrypts `keys` in one ECB call and folds each ciphertext back onto its
/// key, yielding the Davies–Meyer hashes of the (already tweaked) inputs.
pub(crate) fn hash_keys<const N: usize>(cipher: &Aes128, keys: [Block; N]) -> [Block; N] {
    let mut blocks: [aes::Block; N] = keys.map(|k| k.into_bytes().into());
    cipher.encrypt_blocks(&mut blocks);
    let mut out = [Block::ZERO; N];
    for i in 0..N {
        out[i] = Block::new(blocks[i].into()) ^ keys[i];
    }
    out
}

/// `H(x, tweak)` for a single block.
pub(crate) fn hash1(cipher: &Aes128, x: Block, tweak: Block) -> Block {
    hash_keys(cipher, [x.double() ^ tweak])[0]
}

/// `H` over two blocks with independent tweaks, one two-block ECB call.
pub(crate) fn hash2(cipher: &Aes128, x: Block, y: Block, tx: Block, ty: Block) -> (Block, Block) {
    let [hx, hy] = hash_keys(cipher, [x.double() ^ tx, y.double() ^ ty]);
    (hx, hy)
}

/// `H` over both labels of two wires, one four-block ECB call; the `a`
/// labels use `t1` and the `b` labels `t2`.
pub(crate) fn hash4(
    cipher: &Aes128,
    a0: Block,
    a1: Block,
    b0: Block,
    b1: Block,
    t1: Block,
    t2: Block,
) -> (Block, Block, Block, Block) {
    let [ha0, ha1, hb0, hb1] = hash_keys(
        cipher,
        [
            a0.double() ^ t1,
            a1.double() ^ t1,
            b0.double() ^ t2,
            b1.double() ^ t2,
        ],
    );
    (ha0, ha1, hb0, hb1)
}
