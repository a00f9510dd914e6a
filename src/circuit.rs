use serde::{Deserialize, Serialize};

use crate::block::{Block, LabelPair};

/// Gate operations understood by the garbling schemes.
///
/// `Zero` and `One` force their output wire to a constant; `Empty` is an
/// inert placeholder. `Not` stores its single input in both fan-in slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateKind {
    /// Logical conjunction.
    And,
    /// Logical disjunction.
    Or,
    /// Exclusive or; free under every scheme.
    Xor,
    /// Negation of the first input (`input1 == input0`).
    Not,
    /// Constant-0 output wire.
    Zero,
    /// Constant-1 output wire.
    One,
    /// Placeholder gate with no effect.
    Empty,
}

/// One gate of the circuit: two fan-in wire indices and one output wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    /// Operation applied by this gate.
    pub kind: GateKind,
    /// First fan-in wire.
    pub input0: usize,
    /// Second fan-in wire; equals `input0` for NOT gates.
    pub input1: usize,
    /// Output wire; strictly larger than both fan-in indices.
    pub output: usize,
}

/// Which garbling construction a circuit uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scheme {
    /// GRR3 row reduction with free XOR: 3 ciphertexts per non-XOR gate.
    Standard,
    /// Half-gates: 2 ciphertexts per AND/OR gate, XOR and NOT free.
    HalfGates,
    /// Privacy-free half-gates: 1 ciphertext per AND/OR gate.
    PrivacyFree,
}

impl Scheme {
    /// Ciphertext entries reserved per non-XOR gate.
    pub fn entries_per_gate(self) -> usize {
        match self {
            Scheme::Standard => 3,
            Scheme::HalfGates => 2,
            Scheme::PrivacyFree => 1,
        }
    }
}

/// Garbled circuit descriptor.
///
/// Wire indices `[0, n)` are inputs; wires `n` and `n + 1` are the reserved
/// constant-0 and constant-1 wires, present in every circuit. The gate list
/// is in topological order by construction: both fan-ins of a gate have
/// strictly smaller indices than its output. `wires`, `table` and
/// `output_perms` are empty until [`Circuit::garble`] fills them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    /// Number of input wires.
    pub n: usize,
    /// Number of output wires.
    pub m: usize,
    /// Garbling construction used for this circuit.
    pub scheme: Scheme,
    /// Gates in evaluation order.
    pub gates: Vec<Gate>,
    /// How many of `gates` are XOR gates (they occupy no table slot).
    pub nxors: usize,
    /// Total number of wires; set when building finishes.
    pub r: usize,
    /// Indices of the output wires.
    pub outputs: Vec<usize>,
    /// Ciphertext table, `(q - nxors) * entries_per_gate` blocks.
    pub table: Vec<Block>,
    /// Label pair per wire; populated by the garbler.
    pub wires: Vec<LabelPair>,
    /// Permutation bit of the 0-label on each output wire.
    pub output_perms: Vec<bool>,
    /// Label material for the constant wires, sampled at garbling time.
    pub fixed_label: Block,
    /// Fixed AES key for the gate hashes, sampled at garbling time.
    pub global_key: Block,
}

impl Circuit {
    /// Creates an empty circuit with `n` inputs and `m` outputs.
    pub fn new(n: usize, m: usize, scheme: Scheme) -> Self {
        Circuit {
            n,
            m,
            scheme,
            gates: Vec::new(),
            nxors: 0,
            r: 0,
            outputs: vec![0; m],
            table: Vec::new(),
            wires: Vec::new(),
            output_perms: Vec::new(),
            fixed_label: Block::ZERO,
            global_key: Block::ZERO,
        }
    }

    /// Number of gates.
    pub fn q(&self) -> usize {
        self.gates.len()
    }

    /// Length of the ciphertext table in blocks.
    pub fn table_len(&self) -> usize {
        (self.gates.len() - self.nxors) * self.scheme.entries_per_gate()
    }

    /// Index of the reserved constant-0 wire.
    pub fn wire_zero(&self) -> usize {
        self.n
    }

    /// Index of the reserved constant-1 wire.
    pub fn wire_one(&self) -> usize {
        self.n + 1
    }
}
