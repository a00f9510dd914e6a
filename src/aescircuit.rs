//! AES-128 circuit components.
//!
//! The state is the usual column-major 16-byte layout, eight little-endian
//! bits per byte. `sub_bytes` goes through the composite-field tower in
//! [`crate::gadgets::gf256_inv`]: a basis change into the tower
//! representation, inversion, then the combined inverse basis change and
//! S-box affine map. The matrices are applied column-wise (table entry `i`
//! is the image of input bit `i`), with the affine constant folded into the
//! output encoder's accumulator seeds.

use crate::builder::Builder;
use crate::circuit::{Circuit, Scheme};
use crate::gadgets::{gf8_mul, gf256_inv, multi_xor, xor_pairs};

/// Basis change from the AES polynomial basis into the tower representation.
const A2X: [u8; 8] = [0xff, 0xa9, 0x81, 0x09, 0x48, 0xf2, 0xf3, 0x98];

/// Inverse basis change out of the tower, composed with the S-box affine
/// matrix.
const X2S: [u8; 8] = [0x0b, 0x9e, 0x2d, 0x58, 0x24, 0x03, 0x04, 0xdc];

/// The S-box affine constant, added by seeding the output accumulators.
const SBOX_CONSTANT: u8 = 0x63;

/// Applies a bit-matrix to eight wires: output bit `j` accumulates every
/// input bit `i` whose table entry has bit `j` set, starting from the
/// constant named by `constant`'s bit `j`.
fn encoder(
    c: &mut Circuit,
    ctxt: &mut Builder,
    inputs: &[usize; 8],
    enc: [u8; 8],
    constant: u8,
) -> [usize; 8] {
    let mut wires = [0; 8];
    for (j, wire) in wires.iter_mut().enumerate() {
        *wire = if (constant >> j) & 1 == 1 { c.wire_one() } else { c.wire_zero() };
    }
    for i in 0..8 {
        for (j, wire) in wires.iter_mut().enumerate() {
            if (enc[i] >> j) & 1 == 1 {
                let next = ctxt.next_wire();
                c.gate_xor(*wire, inputs[i], next);
                *wire = next;
            }
        }
    }
    wires
}

/// XORs a 128-bit round key into the state; `inputs` is state then key.
pub fn add_round_key(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> Vec<usize> {
    assert_eq!(inputs.len(), 256);
    xor_pairs(c, ctxt, inputs)
}

/// The AES S-box on one byte.
pub fn sub_bytes(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize; 8]) -> [usize; 8] {
    let tower = encoder(c, ctxt, inputs, A2X, 0x00);
    let inverted = gf256_inv(c, ctxt, tower);
    encoder(c, ctxt, &inverted, X2S, SBOX_CONSTANT)
}

const SHIFT_TABLE: [usize; 16] = [0, 5, 10, 15, 4, 9, 14, 3, 8, 13, 2, 7, 12, 1, 6, 11];

/// The ShiftRows byte rotation; pure rewiring, no gates.
pub fn shift_rows(inputs: &[usize]) -> Vec<usize> {
    assert_eq!(inputs.len(), 128);
    let mut outputs = vec![0; 128];
    for i in 0..16 {
        for j in 0..8 {
            outputs[8 * i + j] = inputs[SHIFT_TABLE[i] * 8 + j];
        }
    }
    outputs
}

/// MixColumns on one column (four bytes, 32 wires).
pub fn mix_columns(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> Vec<usize> {
    assert_eq!(inputs.len(), 32);
    let mut doubled = [[0; 8]; 4];
    for (i, out) in doubled.iter_mut().enumerate() {
        let mut byte = [0; 8];
        byte.copy_from_slice(&inputs[8 * i..8 * i + 8]);
        *out = gf8_mul(c, ctxt, byte);
    }

    let mut outputs = Vec::with_capacity(32);
    for i in 0..4 {
        // 2*a_i + 3*a_{i+1} + a_{i+2} + a_{i+3}, with 3*x = 2*x + x
        let mut operands = Vec::with_capacity(40);
        operands.extend_from_slice(&doubled[i]);
        operands.extend_from_slice(&doubled[(i + 1) % 4]);
        operands.extend_from_slice(&inputs[((i + 1) % 4) * 8..((i + 1) % 4) * 8 + 8]);
        operands.extend_from_slice(&inputs[((i + 2) % 4) * 8..((i + 2) % 4) * 8 + 8]);
        operands.extend_from_slice(&inputs[((i + 3) % 4) * 8..((i + 3) % 4) * 8 + 8]);
        outputs.extend(multi_xor(c, ctxt, 5, &operands));
    }
    outputs
}

/// Builds the ten-iteration AES-128 circuit.
///
/// Inputs are the 128-bit plaintext followed by round keys 0 through 9; the
/// output is the state after the last round's ShiftRows. The circuit stops
/// before the final AddRoundKey (round key 10 is not an input), so its
/// output equals the AES ciphertext XOR the last round key.
pub fn build_aes128(scheme: Scheme) -> Circuit {
    let n = 128 * 11;
    let mut c = Circuit::new(n, 128, scheme);
    let mut ctxt = c.start_building();

    let mut state: Vec<usize> = (0..128).collect();
    for round in 0..10 {
        let mut with_key = state;
        with_key.extend(128 * (round + 1)..128 * (round + 2));
        let keyed = add_round_key(&mut c, &mut ctxt, &with_key);

        let mut substituted = Vec::with_capacity(128);
        for byte in 0..16 {
            let mut input = [0; 8];
            input.copy_from_slice(&keyed[8 * byte..8 * byte + 8]);
            substituted.extend(sub_bytes(&mut c, &mut ctxt, &input));
        }

        let shifted = shift_rows(&substituted);

        state = if round != 9 {
            let mut mixed = Vec::with_capacity(128);
            for column in 0..4 {
                mixed.extend(mix_columns(&mut c, &mut ctxt, &shifted[32 * column..32 * column + 32]));
            }
            mixed
        } else {
            shifted
        };
    }

    let outputs = state;
    c.finish_building(ctxt, &outputs);
    c
}
