use std::path::Path;

use aes::Aes128;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::block::{Block, LabelPair};
use crate::circuit::{Circuit, GateKind, Scheme};
use crate::scheme::{self, HalfGatesKernel, Kernel, PrivacyFreeKernel, StandardKernel};

/// Output of one evaluation: the label reached on each output wire and the
/// plaintext bit it decodes to through the output permutation bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalResult {
    /// One label per output wire.
    pub labels: Vec<Block>,
    /// Decoded plaintext output bits.
    pub bits: Vec<bool>,
}

impl EvalResult {
    /// Save the evaluation result as JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load an evaluation result from JSON.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let result = serde_json::from_str(&data)?;
        Ok(result)
    }
}

/// Picks one label per input wire according to the plaintext input bits.
pub fn extract_labels(pairs: &[LabelPair], bits: &[bool]) -> Vec<Block> {
    pairs.iter().zip(bits).map(|(pair, &bit)| pair.select(bit)).collect()
}

/// Decodes observed output labels against the garbler's label pairs.
///
/// Fails if any observed label matches neither side of its pair.
pub fn map_outputs(pairs: &[LabelPair], observed: &[Block]) -> Result<Vec<bool>> {
    if pairs.len() != observed.len() {
        bail!("expected {} output labels, got {}", pairs.len(), observed.len());
    }
    pairs
        .iter()
        .zip(observed)
        .enumerate()
        .map(|(i, (pair, &label))| {
            if label == pair.zero {
                Ok(false)
            } else if label == pair.one {
                Ok(true)
            } else {
                bail!("output label {i} is not in the encoding")
            }
        })
        .collect()
}

impl Circuit {
    /// Evaluates the garbled circuit on one label per input wire.
    ///
    /// Walks the gates in order with a single-label working array, then maps
    /// the output wires through `output_perms` to recover plaintext bits.
    pub fn eval(&self, inputs: &[Block]) -> Result<EvalResult> {
        if inputs.len() != self.n {
            bail!("expected {} input labels, got {}", self.n, inputs.len());
        }
        if self.r < self.n + 2 {
            bail!("circuit is not finished: total wire count is unset");
        }
        if self.table.len() != self.table_len() {
            bail!("circuit has no garbled table");
        }
        if self.output_perms.len() != self.m {
            bail!("circuit has no output permutation bits");
        }

        let cipher = scheme::expand_key(self.global_key);
        let mut labels = vec![Block::ZERO; self.r];
        labels[..self.n].copy_from_slice(inputs);
        labels[self.n] = self.fixed_label.with_lsb(false);
        labels[self.n + 1] = self.fixed_label.with_lsb(true);

        match self.scheme {
            Scheme::Standard => self.eval_gates::<StandardKernel>(&cipher, &mut labels),
            Scheme::HalfGates => self.eval_gates::<HalfGatesKernel>(&cipher, &mut labels),
            Scheme::PrivacyFree => self.eval_gates::<PrivacyFreeKernel>(&cipher, &mut labels),
        }

        let out_labels: Vec<Block> = self.outputs.iter().map(|&w| labels[w]).collect();
        let bits = out_labels
            .iter()
            .zip(&self.output_perms)
            .map(|(label, &perm)| label.lsb() ^ perm)
            .collect();
        Ok(EvalResult { labels: out_labels, bits })
    }

    fn eval_gates<K: Kernel>(&self, cipher: &Aes128, labels: &mut [Block]) {
        let mut slot = 0;
        for (i, gate) in self.gates.iter().enumerate() {
            let out = match gate.kind {
                GateKind::Zero => {
                    slot += 1;
                    self.fixed_label.with_lsb(false)
                }
                GateKind::One => {
                    slot += 1;
                    self.fixed_label.with_lsb(true)
                }
                GateKind::Empty => {
                    slot += 1;
                    continue;
                }
                GateKind::Xor => K::eval_gate(
                    cipher, gate.kind, labels[gate.input0], labels[gate.input1], &[], i,
                ),
                _ => {
                    let entries =
                        &self.table[slot * K::ENTRIES_PER_GATE..(slot + 1) * K::ENTRIES_PER_GATE];
                    slot += 1;
                    K::eval_gate(
                        cipher, gate.kind, labels[gate.input0], labels[gate.input1], entries, i,
                    )
                }
            };
            labels[gate.output] = out;
        }
    }
}
