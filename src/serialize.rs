//! Byte-exact circuit snapshots.
//!
//! Layout, little-endian with no padding:
//! `n | m | q | r | nxors` (u64 each), `type` (u8), the ciphertext table,
//! `fixed_label`, `global_key`, `output_perms` (one byte each), then —
//! unless `table_only` — `gates` (kind byte plus three u64 wire indices
//! each), optionally `wires` (two blocks per wire) and `outputs` (u64
//! each). Counts and indices are pinned to these widths so a snapshot
//! reloads on any host.

use std::io::{Read, Write};

use anyhow::{Result, bail};

use crate::block::{Block, LabelPair};
use crate::circuit::{Circuit, Gate, GateKind, Scheme};

fn kind_to_byte(kind: GateKind) -> u8 {
    match kind {
        GateKind::And => 0,
        GateKind::Or => 1,
        GateKind::Xor => 2,
        GateKind::Not => 3,
        GateKind::Zero => 4,
        GateKind::One => 5,
        GateKind::Empty => 6,
    }
}

fn kind_from_byte(byte: u8) -> Result<GateKind> {
    Ok(match byte {
        0 => GateKind::And,
        1 => GateKind::Or,
        2 => GateKind::Xor,
        3 => GateKind::Not,
        4 => GateKind::Zero,
        5 => GateKind::One,
        6 => GateKind::Empty,
        _ => bail!("unknown gate kind byte {byte}"),
    })
}

fn scheme_to_byte(scheme: Scheme) -> u8 {
    match scheme {
        Scheme::Standard => 0,
        Scheme::HalfGates => 1,
        Scheme::PrivacyFree => 2,
    }
}

fn scheme_from_byte(byte: u8) -> Result<Scheme> {
    Ok(match byte {
        0 => Scheme::Standard,
        1 => Scheme::HalfGates,
        2 => Scheme::PrivacyFree,
        _ => bail!("unknown scheme byte {byte}"),
    })
}

struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.buf.len() < len {
            bail!("circuit buffer truncated");
        }
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    fn count(&mut self) -> Result<usize> {
        let value = self.u64()?;
        if value > u64::from(u32::MAX) {
            bail!("count {value} is out of range");
        }
        Ok(value as usize)
    }

    fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn block(&mut self) -> Result<Block> {
        Ok(Block::new(self.take(16)?.try_into().unwrap()))
    }
}

impl Circuit {
    /// Size in bytes of the snapshot [`Circuit::to_buffer`] produces.
    pub fn size(&self, table_only: bool, wires: bool) -> usize {
        let mut size = 5 * 8 + 1; // counts and scheme byte
        size += 16 * self.table_len(); // table
        size += 16 * 2; // fixed_label, global_key
        size += self.m; // output_perms
        if !table_only {
            size += (1 + 3 * 8) * self.q();
            if wires {
                size += 16 * 2 * self.r;
            }
            size += 8 * self.m;
        }
        size
    }

    /// Serializes the circuit into a fresh buffer.
    ///
    /// `table_only` keeps just the garbled material (table, labels, output
    /// permutation bits), for shipping to an evaluator that builds the gate
    /// list itself; `wires` additionally snapshots every label pair.
    pub fn to_buffer(&self, table_only: bool, wires: bool) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.size(table_only, wires));
        buf.extend_from_slice(&(self.n as u64).to_le_bytes());
        buf.extend_from_slice(&(self.m as u64).to_le_bytes());
        buf.extend_from_slice(&(self.q() as u64).to_le_bytes());
        buf.extend_from_slice(&(self.r as u64).to_le_bytes());
        buf.extend_from_slice(&(self.nxors as u64).to_le_bytes());
        buf.push(scheme_to_byte(self.scheme));

        for entry in &self.table {
            buf.extend_from_slice(entry.as_bytes());
        }
        buf.extend_from_slice(self.fixed_label.as_bytes());
        buf.extend_from_slice(self.global_key.as_bytes());
        for &perm in &self.output_perms {
            buf.push(u8::from(perm));
        }

        if !table_only {
            for gate in &self.gates {
                buf.push(kind_to_byte(gate.kind));
                buf.extend_from_slice(&(gate.input0 as u64).to_le_bytes());
                buf.extend_from_slice(&(gate.input1 as u64).to_le_bytes());
                buf.extend_from_slice(&(gate.output as u64).to_le_bytes());
            }
            if wires {
                for pair in &self.wires {
                    buf.extend_from_slice(pair.zero.as_bytes());
                    buf.extend_from_slice(pair.one.as_bytes());
                }
            }
            for &output in &self.outputs {
                buf.extend_from_slice(&(output as u64).to_le_bytes());
            }
        }
        buf
    }

    /// Reloads a snapshot produced with the same `table_only`/`wires`
    /// flags.
    ///
    /// In `table_only` mode the circuit must already carry the same gate
    /// structure (counts and scheme are cross-checked); only the garbled
    /// material is replaced. In full mode the whole descriptor is rebuilt
    /// from the buffer.
    pub fn from_buffer(&mut self, buf: &[u8], table_only: bool, wires: bool) -> Result<()> {
        let mut reader = Reader { buf };
        let n = reader.count()?;
        let m = reader.count()?;
        let q = reader.count()?;
        let r = reader.count()?;
        let nxors = reader.count()?;
        let scheme = scheme_from_byte(reader.byte()?)?;

        if nxors > q || r < n + 2 {
            bail!("inconsistent circuit header");
        }
        if table_only
            && (n, m, q, r, nxors, scheme)
                != (self.n, self.m, self.q(), self.r, self.nxors, self.scheme)
        {
            bail!("snapshot does not match the built circuit");
        }

        let entries = (q - nxors) * scheme.entries_per_gate();
        let body = 16 * entries
            + 32
            + m
            + if table_only { 0 } else { 25 * q + if wires { 32 * r } else { 0 } + 8 * m };
        if reader.buf.len() < body {
            bail!("circuit buffer truncated");
        }

        let mut table = Vec::with_capacity(entries);
        for _ in 0..entries {
            table.push(reader.block()?);
        }
        let fixed_label = reader.block()?;
        let global_key = reader.block()?;
        let mut output_perms = Vec::with_capacity(m);
        for _ in 0..m {
            output_perms.push(reader.byte()? != 0);
        }

        if !table_only {
            let mut gates = Vec::with_capacity(q);
            for _ in 0..q {
                let kind = kind_from_byte(reader.byte()?)?;
                let input0 = reader.count()?;
                let input1 = reader.count()?;
                let output = reader.count()?;
                if input0 >= r || input1 >= r || output >= r {
                    bail!("gate wire index out of range");
                }
                gates.push(Gate { kind, input0, input1, output });
            }
            let mut wire_pairs = Vec::new();
            if wires {
                wire_pairs.reserve(r);
                for _ in 0..r {
                    let zero = reader.block()?;
                    let one = reader.block()?;
                    wire_pairs.push(LabelPair { zero, one });
                }
            }
            let mut outputs = Vec::with_capacity(m);
            for _ in 0..m {
                let output = reader.count()?;
                if output >= r {
                    bail!("output wire index out of range");
                }
                outputs.push(output);
            }

            self.n = n;
            self.m = m;
            self.r = r;
            self.nxors = nxors;
            self.scheme = scheme;
            self.gates = gates;
            self.wires = wire_pairs;
            self.outputs = outputs;
        }

        self.table = table;
        self.fixed_label = fixed_label;
        self.global_key = global_key;
        self.output_perms = output_perms;
        Ok(())
    }

    /// Writes the snapshot to a stream.
    pub fn save<W: Write>(&self, writer: &mut W, table_only: bool, wires: bool) -> Result<()> {
        writer.write_all(&self.to_buffer(table_only, wires))?;
        Ok(())
    }

    /// Reads a snapshot back from a stream.
    pub fn load<R: Read>(&mut self, reader: &mut R, table_only: bool, wires: bool) -> Result<()> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.from_buffer(&buf, table_only, wires)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockRng;

    fn sample_circuit() -> Circuit {
        let mut c = Circuit::new(2, 2, Scheme::HalfGates);
        let mut ctxt = c.start_building();
        let w0 = ctxt.next_wire();
        c.gate_xor(0, 1, w0);
        let w1 = ctxt.next_wire();
        c.gate_and(0, w0, w1);
        c.finish_building(ctxt, &[w0, w1]);
        let mut rng = BlockRng::from_seed(Block::make(8, 8));
        c.garble(&mut rng, None).unwrap();
        c
    }

    #[test]
    fn buffer_length_matches_size() {
        let c = sample_circuit();
        for (table_only, wires) in [(false, false), (false, true), (true, false)] {
            assert_eq!(c.to_buffer(table_only, wires).len(), c.size(table_only, wires));
        }
    }

    #[test]
    fn full_round_trip_preserves_everything() {
        let c = sample_circuit();
        let buf = c.to_buffer(false, true);
        let mut loaded = Circuit::new(0, 0, Scheme::Standard);
        loaded.from_buffer(&buf, false, true).unwrap();
        assert_eq!(loaded, c);
        assert_eq!(loaded.hash(), c.hash());
    }

    #[test]
    fn round_trip_without_wires_keeps_the_table() {
        let c = sample_circuit();
        let buf = c.to_buffer(false, false);
        let mut loaded = Circuit::new(0, 0, Scheme::Standard);
        loaded.from_buffer(&buf, false, false).unwrap();
        assert!(loaded.wires.is_empty());
        assert_eq!(loaded.gates, c.gates);
        assert_eq!(loaded.outputs, c.outputs);
        assert_eq!(loaded.hash(), c.hash());
    }

    #[test]
    fn table_only_merges_into_a_built_circuit() {
        let c = sample_circuit();
        let buf = c.to_buffer(true, false);

        let mut rebuilt = Circuit::new(2, 2, Scheme::HalfGates);
        let mut ctxt = rebuilt.start_building();
        let w0 = ctxt.next_wire();
        rebuilt.gate_xor(0, 1, w0);
        let w1 = ctxt.next_wire();
        rebuilt.gate_and(0, w0, w1);
        rebuilt.finish_building(ctxt, &[w0, w1]);

        rebuilt.from_buffer(&buf, true, false).unwrap();
        assert_eq!(rebuilt.table, c.table);
        assert_eq!(rebuilt.fixed_label, c.fixed_label);
        assert_eq!(rebuilt.global_key, c.global_key);
        assert_eq!(rebuilt.output_perms, c.output_perms);
        rebuilt.check(&c.hash()).unwrap();
    }

    #[test]
    fn table_only_rejects_a_different_circuit() {
        let c = sample_circuit();
        let buf = c.to_buffer(true, false);
        let mut other = Circuit::new(3, 2, Scheme::HalfGates);
        let mut ctxt = other.start_building();
        let w0 = ctxt.next_wire();
        other.gate_xor(0, 1, w0);
        let w1 = ctxt.next_wire();
        other.gate_and(2, w0, w1);
        other.finish_building(ctxt, &[w0, w1]);
        assert!(other.from_buffer(&buf, true, false).is_err());
    }

    #[test]
    fn truncated_and_corrupt_buffers_are_rejected() {
        let c = sample_circuit();
        let buf = c.to_buffer(false, false);
        let mut loaded = Circuit::new(0, 0, Scheme::Standard);
        assert!(loaded.from_buffer(&buf[..buf.len() - 1], false, false).is_err());
        let mut bad = buf.clone();
        bad[40] = 9; // scheme byte
        assert!(loaded.from_buffer(&bad, false, false).is_err());
    }

    #[test]
    fn stream_save_load_round_trips() {
        let c = sample_circuit();
        let mut cursor = Vec::new();
        c.save(&mut cursor, false, true).unwrap();
        let mut loaded = Circuit::new(0, 0, Scheme::Standard);
        loaded.load(&mut cursor.as_slice(), false, true).unwrap();
        assert_eq!(loaded, c);
    }
}
