use crate::circuit::{Circuit, Gate, GateKind};

/// Wire-allocation context held while a circuit is being built.
///
/// Obtained from [`Circuit::start_building`] and consumed by
/// [`Circuit::finish_building`]. Every new wire a consumer invents must come
/// from [`Builder::next_wire`]; fabricated indices break the topological
/// ordering the garbler relies on.
#[derive(Debug)]
pub struct Builder {
    wire_index: usize,
}

impl Builder {
    /// Allocates the next free wire index.
    pub fn next_wire(&mut self) -> usize {
        let wire = self.wire_index;
        self.wire_index += 1;
        wire
    }
}

/// The first `n` wire indices, for treating the circuit inputs as wires.
pub fn init_wires(n: usize) -> Vec<usize> {
    (0..n).collect()
}

impl Circuit {
    /// Begins construction; allocation starts past the inputs and the two
    /// reserved constant wires.
    pub fn start_building(&self) -> Builder {
        Builder { wire_index: self.n + 2 }
    }

    /// Ends construction: fixes the total wire count and records which wires
    /// are the circuit outputs.
    pub fn finish_building(&mut self, ctxt: Builder, outputs: &[usize]) {
        assert_eq!(outputs.len(), self.m, "wrong number of output wires");
        self.r = ctxt.wire_index;
        self.outputs.copy_from_slice(outputs);
    }

    fn push_gate(&mut self, kind: GateKind, input0: usize, input1: usize, output: usize) {
        debug_assert!(input0 < output && input1 < output, "gate output must follow its inputs");
        self.gates.push(Gate { kind, input0, input1, output });
    }

    /// Appends an AND gate.
    pub fn gate_and(&mut self, input0: usize, input1: usize, output: usize) {
        self.push_gate(GateKind::And, input0, input1, output);
    }

    /// Appends an OR gate.
    pub fn gate_or(&mut self, input0: usize, input1: usize, output: usize) {
        self.push_gate(GateKind::Or, input0, input1, output);
    }

    /// Appends an XOR gate.
    pub fn gate_xor(&mut self, input0: usize, input1: usize, output: usize) {
        self.nxors += 1;
        self.push_gate(GateKind::Xor, input0, input1, output);
    }

    /// Appends a NOT gate; the single input occupies both fan-in slots.
    pub fn gate_not(&mut self, input0: usize, output: usize) {
        self.push_gate(GateKind::Not, input0, input0, output);
    }

    /// Allocates a fresh wire forced to constant 0 during garbling.
    pub fn fixed_zero(&mut self, ctxt: &mut Builder) -> usize {
        let wire = ctxt.next_wire();
        self.push_gate(GateKind::Zero, 0, 0, wire);
        wire
    }

    /// Allocates a fresh wire forced to constant 1 during garbling.
    pub fn fixed_one(&mut self, ctxt: &mut Builder) -> usize {
        let wire = ctxt.next_wire();
        self.push_gate(GateKind::One, 0, 0, wire);
        wire
    }
}
