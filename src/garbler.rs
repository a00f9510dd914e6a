use aes::Aes128;
use anyhow::{Result, bail};
use sha1::{Digest, Sha1};

use crate::block::{Block, BlockRng, LabelPair};
use crate::circuit::{Circuit, GateKind, Scheme};
use crate::scheme::{self, HalfGatesKernel, Kernel, PrivacyFreeKernel, StandardKernel};

/// Fresh free-XOR offset: a random block with its permutation bit forced to
/// 1, so paired labels always carry opposite permutation bits.
pub fn create_delta(rng: &mut BlockRng) -> Block {
    rng.next_block().with_lsb(true)
}

/// Generates `n` input label pairs sharing one offset.
///
/// Passing `delta` reuses an existing offset; otherwise a fresh one is
/// drawn. With `privacy_free` the 0-labels get their permutation bit
/// cleared, as that scheme requires of every wire.
pub fn create_input_labels(
    rng: &mut BlockRng,
    n: usize,
    delta: Option<Block>,
    privacy_free: bool,
) -> Vec<LabelPair> {
    let delta = delta.unwrap_or_else(|| create_delta(rng));
    (0..n)
        .map(|_| {
            let mut zero = rng.next_block();
            if privacy_free {
                zero = zero.with_lsb(false);
            }
            LabelPair { zero, one: zero ^ delta }
        })
        .collect()
}

impl Circuit {
    /// Garbles the circuit: samples label material, walks the gate list
    /// through the scheme kernel and fills `wires`, `table` and
    /// `output_perms`.
    ///
    /// When `input_labels` is given its pairs are installed on the input
    /// wires and the offset is derived from the first pair; otherwise fresh
    /// labels are drawn from `rng`. All randomness comes from `rng`, so a
    /// pinned seed garbles to a byte-identical table.
    pub fn garble(&mut self, rng: &mut BlockRng, input_labels: Option<&[LabelPair]>) -> Result<()> {
        if self.r < self.n + 2 {
            bail!("circuit is not finished: total wire count is unset");
        }
        self.wires = vec![LabelPair { zero: Block::ZERO, one: Block::ZERO }; self.r];

        let delta = match input_labels {
            Some(labels) => {
                if labels.len() != self.n {
                    bail!("expected {} input label pairs, got {}", self.n, labels.len());
                }
                let Some(first) = labels.first() else {
                    bail!("cannot derive the offset from an empty label sequence");
                };
                self.wires[..self.n].copy_from_slice(labels);
                first.zero ^ first.one
            }
            None => {
                let delta = create_delta(rng);
                for i in 0..self.n {
                    let mut zero = rng.next_block();
                    if self.scheme == Scheme::PrivacyFree {
                        zero = zero.with_lsb(false);
                    }
                    self.wires[i] = LabelPair { zero, one: zero ^ delta };
                }
                delta
            }
        };

        // constant wires: the evaluator always holds fixed_label with the
        // LSB naming the constant, so wire n stores it as its 0-label and
        // wire n+1 as its 1-label
        self.fixed_label = rng.next_block();
        let zero_label = self.fixed_label.with_lsb(false);
        self.wires[self.n] = LabelPair { zero: zero_label, one: zero_label ^ delta };
        let one_label = self.fixed_label.with_lsb(true);
        self.wires[self.n + 1] = LabelPair { zero: one_label ^ delta, one: one_label };

        self.global_key = rng.next_block();
        let cipher = scheme::expand_key(self.global_key);
        self.table = vec![Block::ZERO; self.table_len()];

        match self.scheme {
            Scheme::Standard => self.garble_gates::<StandardKernel>(&cipher, delta),
            Scheme::HalfGates => self.garble_gates::<HalfGatesKernel>(&cipher, delta),
            Scheme::PrivacyFree => self.garble_gates::<PrivacyFreeKernel>(&cipher, delta),
        }

        self.output_perms = self.outputs.iter().map(|&w| self.wires[w].zero.lsb()).collect();
        Ok(())
    }

    fn garble_gates<K: Kernel>(&mut self, cipher: &Aes128, delta: Block) {
        let mut slot = 0;
        for i in 0..self.gates.len() {
            let gate = self.gates[i];
            let a = self.wires[gate.input0];
            let b = self.wires[gate.input1];
            let pair = match gate.kind {
                GateKind::Zero => {
                    slot += 1;
                    let zero = self.fixed_label.with_lsb(false);
                    LabelPair { zero, one: zero ^ delta }
                }
                GateKind::One => {
                    slot += 1;
                    let one = self.fixed_label.with_lsb(true);
                    LabelPair { zero: one ^ delta, one }
                }
                GateKind::Empty => {
                    slot += 1;
                    continue;
                }
                GateKind::Xor => {
                    let (zero, one) = K::garble_gate(
                        cipher, gate.kind, a.zero, a.one, b.zero, b.one, delta, &mut [], i,
                    );
                    LabelPair { zero, one }
                }
                _ => {
                    let entries = &mut self.table
                        [slot * K::ENTRIES_PER_GATE..(slot + 1) * K::ENTRIES_PER_GATE];
                    slot += 1;
                    let (zero, one) = K::garble_gate(
                        cipher, gate.kind, a.zero, a.one, b.zero, b.one, delta, entries, i,
                    );
                    LabelPair { zero, one }
                }
            };
            self.wires[gate.output] = pair;
        }
    }

    /// Label pairs of the output wires; available after garbling.
    pub fn output_label_pairs(&self) -> Result<Vec<LabelPair>> {
        if self.wires.len() != self.r || self.r == 0 {
            bail!("circuit has not been garbled");
        }
        Ok(self.outputs.iter().map(|&w| self.wires[w]).collect())
    }

    /// SHA-1 digest over the packed ciphertext table.
    pub fn hash(&self) -> [u8; 20] {
        let mut hasher = Sha1::new();
        for entry in &self.table {
            hasher.update(entry.as_bytes());
        }
        hasher.finalize().into()
    }

    /// Recomputes the table digest and compares it byte for byte.
    pub fn check(&self, digest: &[u8; 20]) -> Result<()> {
        if self.hash() != *digest {
            bail!("garbled table digest mismatch");
        }
        Ok(())
    }
}
