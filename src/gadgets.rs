//! Reusable circuit gadgets.
//!
//! Every gadget is a pure circuit emitter: it allocates wires through the
//! [`Builder`] and appends gates to the [`Circuit`], returning the wire
//! indices that carry its result. Multi-bit values are little-endian wire
//! slices; two-operand gadgets take one slice holding the first operand in
//! the low half and the second in the high half.

use crate::builder::Builder;
use crate::circuit::Circuit;

/// Folds AND across all inputs into a single wire.
pub fn and_many(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> usize {
    assert!(inputs.len() >= 2);
    let mut acc = ctxt.next_wire();
    c.gate_and(inputs[0], inputs[1], acc);
    for &input in &inputs[2..] {
        let wire = ctxt.next_wire();
        c.gate_and(input, acc, wire);
        acc = wire;
    }
    acc
}

/// Folds OR across all inputs into a single wire.
pub fn or_many(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> usize {
    assert!(inputs.len() >= 2);
    let mut acc = ctxt.next_wire();
    c.gate_or(inputs[0], inputs[1], acc);
    for &input in &inputs[2..] {
        let wire = ctxt.next_wire();
        c.gate_or(input, acc, wire);
        acc = wire;
    }
    acc
}

/// XORs the two halves of `inputs` pairwise, yielding `inputs.len() / 2`
/// wires.
pub fn xor_pairs(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> Vec<usize> {
    let n = inputs.len();
    assert!(n >= 2 && n % 2 == 0);
    let split = n / 2;
    (0..split)
        .map(|i| {
            let wire = ctxt.next_wire();
            c.gate_xor(inputs[i], inputs[split + i], wire);
            wire
        })
        .collect()
}

/// Negates every input wire.
pub fn not_all(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> Vec<usize> {
    inputs
        .iter()
        .map(|&input| {
            let wire = ctxt.next_wire();
            c.gate_not(input, wire);
            wire
        })
        .collect()
}

/// Treats `inputs` as `d` equal groups and XORs them together, yielding
/// `inputs.len() / d` wires.
pub fn multi_xor(c: &mut Circuit, ctxt: &mut Builder, d: usize, inputs: &[usize]) -> Vec<usize> {
    let n = inputs.len();
    assert!(d >= 2 && n % d == 0);
    let div = n / d;
    let mut acc: Vec<usize> = inputs[..div].to_vec();
    for i in 1..d {
        let mut pass = acc;
        pass.extend_from_slice(&inputs[div * i..div * (i + 1)]);
        acc = xor_pairs(c, ctxt, &pass);
    }
    acc
}

/// Two-to-one multiplexer: outputs `input1` when `switch` is set, else
/// `input0`.
pub fn mux21(
    c: &mut Circuit,
    ctxt: &mut Builder,
    switch: usize,
    input0: usize,
    input1: usize,
) -> usize {
    let not_switch = ctxt.next_wire();
    c.gate_not(switch, not_switch);
    let and0 = ctxt.next_wire();
    c.gate_and(not_switch, input0, and0);
    let and1 = ctxt.next_wire();
    c.gate_and(switch, input1, and1);
    let output = ctxt.next_wire();
    c.gate_or(and0, and1, output);
    output
}

/// Adds one to a little-endian value, dropping the final carry.
pub fn inc(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> Vec<usize> {
    assert!(!inputs.is_empty());
    let mut outputs = Vec::with_capacity(inputs.len());
    let first = ctxt.next_wire();
    c.gate_not(inputs[0], first);
    outputs.push(first);
    let mut carry = inputs[0];
    for &input in &inputs[1..] {
        let sum = ctxt.next_wire();
        c.gate_xor(input, carry, sum);
        outputs.push(sum);
        let next_carry = ctxt.next_wire();
        c.gate_and(input, carry, next_carry);
        carry = next_carry;
    }
    outputs
}

/// Half adder: sum and carry of two bits.
pub fn add22(c: &mut Circuit, ctxt: &mut Builder, a: usize, b: usize) -> (usize, usize) {
    let sum = ctxt.next_wire();
    c.gate_xor(a, b, sum);
    let carry = ctxt.next_wire();
    c.gate_and(a, b, carry);
    (sum, carry)
}

/// Full adder: sum and carry of two bits and a carry-in.
pub fn add32(
    c: &mut Circuit,
    ctxt: &mut Builder,
    a: usize,
    b: usize,
    carry_in: usize,
) -> (usize, usize) {
    let t0 = ctxt.next_wire();
    c.gate_xor(carry_in, a, t0);
    let t1 = ctxt.next_wire();
    c.gate_xor(b, a, t1);
    let sum = ctxt.next_wire();
    c.gate_xor(carry_in, t1, sum);
    let t2 = ctxt.next_wire();
    c.gate_and(t0, t1, t2);
    let carry = ctxt.next_wire();
    c.gate_xor(a, t2, carry);
    (sum, carry)
}

/// Ripple adder over the two halves of `inputs`; the final carry is
/// dropped.
pub fn add(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> Vec<usize> {
    let n = inputs.len();
    assert!(n >= 2 && n % 2 == 0);
    let split = n / 2;
    let mut outputs = Vec::with_capacity(split);
    let (sum, mut carry) = add22(c, ctxt, inputs[0], inputs[split]);
    outputs.push(sum);
    for i in 1..split {
        let (sum, next_carry) = add32(c, ctxt, inputs[i], inputs[split + i], carry);
        outputs.push(sum);
        carry = next_carry;
    }
    outputs
}

/// Subtracts the second half from the first via two's complement.
pub fn sub(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> Vec<usize> {
    let n = inputs.len();
    assert!(n >= 2 && n % 2 == 0);
    let split = n / 2;
    let negated = not_all(c, ctxt, &inputs[split..]);
    let complement = inc(c, ctxt, &negated);
    let mut operands = inputs[..split].to_vec();
    operands.extend_from_slice(&complement);
    add(c, ctxt, &operands)
}

/// Shift left by one; the vacated low bit reads the constant-0 wire.
pub fn shl(c: &Circuit, inputs: &[usize]) -> Vec<usize> {
    let n = inputs.len();
    let mut outputs = Vec::with_capacity(n);
    outputs.push(c.wire_zero());
    outputs.extend_from_slice(&inputs[..n - 1]);
    outputs
}

/// Shift right by one; the vacated high bit reads the constant-0 wire.
pub fn shr(c: &Circuit, inputs: &[usize]) -> Vec<usize> {
    let n = inputs.len();
    let mut outputs = Vec::with_capacity(n);
    outputs.extend_from_slice(&inputs[1..]);
    outputs.push(c.wire_zero());
    outputs
}

/// Shift-and-add multiplier over the two halves of `inputs`; yields the
/// full double-width product.
pub fn mul(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> Vec<usize> {
    let nt = inputs.len();
    assert!(nt >= 2 && nt % 2 == 0);
    let n = nt / 2;
    let (a, b) = inputs.split_at(n);

    let mut rows = Vec::with_capacity(n);
    for i in 0..n {
        let mut row = Vec::with_capacity(2 * n);
        row.resize(i, c.wire_zero());
        for j in i..i + n {
            let wire = ctxt.next_wire();
            c.gate_and(a[j - i], b[i], wire);
            row.push(wire);
        }
        row.resize(2 * n, c.wire_zero());
        rows.push(row);
    }

    let mut acc = rows[0].clone();
    for row in &rows[1..] {
        let mut operands = acc;
        operands.extend_from_slice(row);
        acc = add(c, ctxt, &operands);
    }
    acc
}

/// Less-than over the two halves: outputs 1 iff the second number (high
/// half) is strictly less than the first, 0 on equality.
pub fn les(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> usize {
    let n = inputs.len();
    assert!(n >= 2 && n % 2 == 0);
    let split = n / 2;

    // and_inputs[i] collects "second is smaller at bit i and all higher
    // bits are equal"; the final OR aggregates over bit positions
    let mut and_inputs: Vec<Vec<usize>> = (0..split.saturating_sub(1))
        .map(|i| vec![0; split - i])
        .collect();
    let mut final_or_inputs = vec![0; split];

    for i in 0..split {
        let a = inputs[split + i];
        let b = inputs[i];

        let not_a = ctxt.next_wire();
        c.gate_not(a, not_a);
        let not_b = ctxt.next_wire();
        c.gate_not(b, not_b);
        let case1 = ctxt.next_wire();
        c.gate_and(not_a, b, case1);
        let case2 = ctxt.next_wire();
        c.gate_and(a, not_b, case2);

        if i != split - 1 {
            and_inputs[i][0] = case1;
        }

        let or_output = ctxt.next_wire();
        c.gate_or(case1, case2, or_output);
        let nor_output = ctxt.next_wire();
        c.gate_not(or_output, nor_output);

        for j in 0..i {
            and_inputs[j][i - j] = nor_output;
        }
        if i == split - 1 {
            final_or_inputs[split - 1] = case1;
        }
    }

    for (i, group) in and_inputs.iter().enumerate() {
        final_or_inputs[i] = and_many(c, ctxt, group);
    }

    if split == 1 {
        final_or_inputs[0]
    } else {
        or_many(c, ctxt, &final_or_inputs)
    }
}

/// Greater-than over the two halves: outputs 1 iff the second number is
/// strictly greater than the first.
pub fn gre(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> usize {
    let n = inputs.len();
    assert!(n >= 2 && n % 2 == 0);
    let split = n / 2;
    let mut swapped = inputs[split..].to_vec();
    swapped.extend_from_slice(&inputs[..split]);
    les(c, ctxt, &swapped)
}

/// Outputs 1 iff the second number is less than or equal to the first.
pub fn leq(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> usize {
    let greater = gre(c, ctxt, inputs);
    let output = ctxt.next_wire();
    c.gate_not(greater, output);
    output
}

/// Outputs 1 iff the second number is greater than or equal to the first.
pub fn geq(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> usize {
    let less = les(c, ctxt, inputs);
    let output = ctxt.next_wire();
    c.gate_not(less, output);
    output
}

/// Outputs 1 iff the two halves are equal.
pub fn equ(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> usize {
    let n = inputs.len();
    assert!(n >= 2 && n % 2 == 0);
    let diffs = xor_pairs(c, ctxt, inputs);
    let mut acc = diffs[0];
    for &diff in &diffs[1..] {
        let wire = ctxt.next_wire();
        c.gate_or(acc, diff, wire);
        acc = wire;
    }
    let output = ctxt.next_wire();
    c.gate_not(acc, output);
    output
}

/// Elementwise minimum of the two halves.
pub fn min(c: &mut Circuit, ctxt: &mut Builder, inputs: &[usize]) -> Vec<usize> {
    let n = inputs.len();
    assert!(n >= 2 && n % 2 == 0);
    let split = n / 2;
    let second_is_less = les(c, ctxt, inputs);
    (0..split)
        .map(|i| mux21(c, ctxt, second_is_less, inputs[i], inputs[split + i]))
        .collect()
}

/// GF(2^2) multiplication.
pub fn gf4_mul(c: &mut Circuit, ctxt: &mut Builder, inputs: [usize; 4]) -> [usize; 2] {
    let a = inputs[1];
    let b = inputs[0];
    let cc = inputs[3];
    let d = inputs[2];

    let t0 = ctxt.next_wire();
    c.gate_xor(a, b, t0);
    let t1 = ctxt.next_wire();
    c.gate_xor(cc, d, t1);
    let e = ctxt.next_wire();
    c.gate_and(t0, t1, e);
    let t2 = ctxt.next_wire();
    c.gate_and(a, cc, t2);
    let p = ctxt.next_wire();
    c.gate_xor(t2, e, p);
    let t3 = ctxt.next_wire();
    c.gate_and(b, d, t3);
    let q = ctxt.next_wire();
    c.gate_xor(t3, e, q);

    [q, p]
}

/// GF(2^2) scaling by N.
pub fn gf4_scln(c: &mut Circuit, ctxt: &mut Builder, inputs: [usize; 2]) -> [usize; 2] {
    let low = ctxt.next_wire();
    c.gate_xor(inputs[0], inputs[1], low);
    [low, inputs[0]]
}

/// GF(2^2) scaling by N^2.
pub fn gf4_scln2(c: &mut Circuit, ctxt: &mut Builder, inputs: [usize; 2]) -> [usize; 2] {
    let high = ctxt.next_wire();
    c.gate_xor(inputs[0], inputs[1], high);
    [inputs[1], high]
}

/// GF(2^2) squaring; a pure bit swap, no gates.
pub fn gf4_sq(inputs: [usize; 2]) -> [usize; 2] {
    [inputs[1], inputs[0]]
}

/// GF(2^4) multiplication.
pub fn gf16_mul(c: &mut Circuit, ctxt: &mut Builder, inputs: [usize; 8]) -> [usize; 4] {
    let ab = [inputs[2], inputs[3], inputs[0], inputs[1]];
    let cd = [inputs[6], inputs[7], inputs[4], inputs[5]];

    let abx = xor_pairs(c, ctxt, &ab);
    let cdx = xor_pairs(c, ctxt, &cd);
    let e = gf4_mul(c, ctxt, [abx[0], abx[1], cdx[0], cdx[1]]);
    let em = gf4_scln(c, ctxt, e);

    let ac = [ab[0], ab[1], cd[0], cd[1]];
    let bd = [ab[2], ab[3], cd[2], cd[3]];
    let t1 = gf4_mul(c, ctxt, ac);
    let t2 = gf4_mul(c, ctxt, bd);

    let p = xor_pairs(c, ctxt, &[t1[0], t1[1], em[0], em[1]]);
    let q = xor_pairs(c, ctxt, &[t2[0], t2[1], em[0], em[1]]);

    [q[0], q[1], p[0], p[1]]
}

/// GF(2^4) inversion.
pub fn gf16_inv(c: &mut Circuit, ctxt: &mut Builder, inputs: [usize; 4]) -> [usize; 4] {
    let a = [inputs[2], inputs[3]];
    let b = [inputs[0], inputs[1]];
    let ab = [a[0], a[1], b[0], b[1]];

    let abx = xor_pairs(c, ctxt, &ab);
    let sq = gf4_sq([abx[0], abx[1]]);
    let cc = gf4_scln(c, ctxt, sq);
    let d = gf4_mul(c, ctxt, ab);

    let cdx = xor_pairs(c, ctxt, &[cc[0], cc[1], d[0], d[1]]);
    let e = gf4_sq([cdx[0], cdx[1]]);

    let p = gf4_mul(c, ctxt, [e[0], e[1], b[0], b[1]]);
    let q = gf4_mul(c, ctxt, [e[0], e[1], a[0], a[1]]);

    [q[0], q[1], p[0], p[1]]
}

/// GF(2^4) combined squaring and scaling.
pub fn gf16_sqcl(c: &mut Circuit, ctxt: &mut Builder, inputs: [usize; 4]) -> [usize; 4] {
    let a = [inputs[2], inputs[3]];
    let b = [inputs[0], inputs[1]];

    let abx = xor_pairs(c, ctxt, &[a[0], a[1], b[0], b[1]]);
    let p = gf4_sq([abx[0], abx[1]]);
    let bsq = gf4_sq(b);
    let q = gf4_scln2(c, ctxt, bsq);

    [q[0], q[1], p[0], p[1]]
}

/// GF(2^8) multiplication by the AES generator x (xtime).
pub fn gf8_mul(c: &mut Circuit, ctxt: &mut Builder, inputs: [usize; 8]) -> [usize; 8] {
    let mut outputs = [0; 8];
    outputs[0] = inputs[7];
    outputs[2] = inputs[1];
    outputs[3] = ctxt.next_wire();
    c.gate_xor(inputs[7], inputs[2], outputs[3]);
    outputs[4] = ctxt.next_wire();
    c.gate_xor(inputs[7], inputs[3], outputs[4]);
    outputs[5] = inputs[4];
    outputs[6] = inputs[5];
    outputs[7] = inputs[6];
    outputs[1] = ctxt.next_wire();
    c.gate_xor(inputs[7], inputs[0], outputs[1]);
    outputs
}

/// GF(2^8) inversion through the GF(2^4) tower.
pub fn gf256_inv(c: &mut Circuit, ctxt: &mut Builder, inputs: [usize; 8]) -> [usize; 8] {
    let folded = xor_pairs(c, ctxt, &inputs);
    let mut cd = [0; 8];
    cd[..4].copy_from_slice(&gf16_sqcl(c, ctxt, [folded[0], folded[1], folded[2], folded[3]]));
    cd[4..].copy_from_slice(&gf16_mul(c, ctxt, inputs));

    let cdx = xor_pairs(c, ctxt, &cd);
    let e = gf16_inv(c, ctxt, [cdx[0], cdx[1], cdx[2], cdx[3]]);

    let mut eb = [0; 8];
    eb[..4].copy_from_slice(&e);
    eb[4..].copy_from_slice(&inputs[4..]);
    let mut ea = [0; 8];
    ea[..4].copy_from_slice(&e);
    ea[4..].copy_from_slice(&inputs[..4]);

    let p = gf16_mul(c, ctxt, eb);
    let q = gf16_mul(c, ctxt, ea);

    let mut outputs = [0; 8];
    outputs[..4].copy_from_slice(&q);
    outputs[4..].copy_from_slice(&p);
    outputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Scheme;
    use crate::testutil::{from_bits, plain_eval, to_bits};

    /// Builds a circuit computing `gadget` over `n` input wires.
    fn build<F>(n: usize, m: usize, gadget: F) -> Circuit
    where
        F: FnOnce(&mut Circuit, &mut Builder, &[usize]) -> Vec<usize>,
    {
        let mut c = Circuit::new(n, m, Scheme::HalfGates);
        let mut ctxt = c.start_building();
        let inputs = crate::builder::init_wires(n);
        let outputs = gadget(&mut c, &mut ctxt, &inputs);
        c.finish_building(ctxt, &outputs);
        c
    }

    fn eval_binary<F>(width: usize, a: u64, b: u64, gadget: F) -> Vec<bool>
    where
        F: FnOnce(&mut Circuit, &mut Builder, &[usize]) -> Vec<usize>,
    {
        let mut c = Circuit::new(2 * width, 0, Scheme::HalfGates);
        let mut ctxt = c.start_building();
        let inputs = crate::builder::init_wires(2 * width);
        let outputs = gadget(&mut c, &mut ctxt, &inputs);
        c.m = outputs.len();
        c.outputs = vec![0; outputs.len()];
        c.finish_building(ctxt, &outputs);
        let mut bits = to_bits(a, width);
        bits.extend(to_bits(b, width));
        plain_eval(&c, &bits)
    }

    #[test]
    fn adder_matches_wrapping_addition() {
        for (a, b) in [(5u64, 11), (3, 4), (255, 1), (170, 85), (127, 129)] {
            let out = eval_binary(8, a, b, |c, ctxt, w| add(c, ctxt, w));
            assert_eq!(from_bits(&out), (a + b) & 0xff, "{a} + {b}");
        }
    }

    #[test]
    fn subtracter_matches_wrapping_subtraction() {
        for (a, b) in [(9u64, 3), (3, 9), (0, 1), (200, 200), (255, 254)] {
            let out = eval_binary(8, a, b, |c, ctxt, w| sub(c, ctxt, w));
            assert_eq!(from_bits(&out), a.wrapping_sub(b) & 0xff, "{a} - {b}");
        }
    }

    #[test]
    fn multiplier_matches_full_product() {
        for (a, b) in [(0u64, 7), (3, 5), (15, 15), (12, 10), (9, 14)] {
            let out = eval_binary(4, a, b, |c, ctxt, w| mul(c, ctxt, w));
            assert_eq!(from_bits(&out), a * b, "{a} * {b}");
        }
    }

    #[test]
    fn increment_wraps() {
        for value in [0u64, 1, 7, 255] {
            let c = build(8, 8, |c, ctxt, w| inc(c, ctxt, w));
            let out = plain_eval(&c, &to_bits(value, 8));
            assert_eq!(from_bits(&out), (value + 1) & 0xff);
        }
    }

    #[test]
    fn comparisons_follow_the_second_operand_convention() {
        for (a, b) in [(3u64, 5), (5, 3), (7, 7), (0, 15), (15, 0), (9, 9)] {
            let second_less = eval_binary(4, a, b, |c, ctxt, w| vec![les(c, ctxt, w)]);
            assert_eq!(second_less[0], b < a, "les({a}, {b})");
            let second_greater = eval_binary(4, a, b, |c, ctxt, w| vec![gre(c, ctxt, w)]);
            assert_eq!(second_greater[0], b > a, "gre({a}, {b})");
            let second_leq = eval_binary(4, a, b, |c, ctxt, w| vec![leq(c, ctxt, w)]);
            assert_eq!(second_leq[0], b <= a, "leq({a}, {b})");
            let second_geq = eval_binary(4, a, b, |c, ctxt, w| vec![geq(c, ctxt, w)]);
            assert_eq!(second_geq[0], b >= a, "geq({a}, {b})");
            let equal = eval_binary(4, a, b, |c, ctxt, w| vec![equ(c, ctxt, w)]);
            assert_eq!(equal[0], a == b, "equ({a}, {b})");
        }
    }

    #[test]
    fn les_handles_wide_operands() {
        // widths past the original's quadratic-temporary ceiling
        for (a, b) in [(0x5a5a5au64, 0x5a5a59), (1, 1 << 23), (0, 0)] {
            let out = eval_binary(24, a, b, |c, ctxt, w| vec![les(c, ctxt, w)]);
            assert_eq!(out[0], b < a, "les({a}, {b}) at 24 bits");
        }
    }

    #[test]
    fn min_selects_the_smaller_value() {
        for (a, b) in [(3u64, 5), (5, 3), (7, 7), (0, 15)] {
            let out = eval_binary(4, a, b, |c, ctxt, w| min(c, ctxt, w));
            assert_eq!(from_bits(&out), a.min(b), "min({a}, {b})");
        }
    }

    #[test]
    fn mux_selects_by_switch() {
        for (s, a, b) in [(false, false, true), (true, false, true), (true, true, false)] {
            let c = build(3, 1, |c, ctxt, w| vec![mux21(c, ctxt, w[0], w[1], w[2])]);
            let out = plain_eval(&c, &[s, a, b]);
            assert_eq!(out[0], if s { b } else { a });
        }
    }

    #[test]
    fn shifts_insert_the_constant_zero() {
        let c = build(4, 4, |c, _ctxt, w| shl(c, w));
        assert_eq!(from_bits(&plain_eval(&c, &to_bits(0b1011, 4))), 0b0110);
        let c = build(4, 4, |c, _ctxt, w| shr(c, w));
        assert_eq!(from_bits(&plain_eval(&c, &to_bits(0b1011, 4))), 0b0101);
    }

    #[test]
    fn logic_fans_fold() {
        let c = build(4, 1, |c, ctxt, w| vec![and_many(c, ctxt, w)]);
        assert_eq!(plain_eval(&c, &[true, true, true, true]), vec![true]);
        assert_eq!(plain_eval(&c, &[true, true, false, true]), vec![false]);
        let c = build(4, 1, |c, ctxt, w| vec![or_many(c, ctxt, w)]);
        assert_eq!(plain_eval(&c, &[false, false, false, false]), vec![false]);
        assert_eq!(plain_eval(&c, &[false, false, true, false]), vec![true]);
        let c = build(4, 2, |c, ctxt, w| xor_pairs(c, ctxt, w));
        assert_eq!(plain_eval(&c, &[true, false, true, true]), vec![false, true]);
    }

    #[test]
    fn multi_xor_folds_groups() {
        let c = build(6, 2, |c, ctxt, w| multi_xor(c, ctxt, 3, w));
        // 0b01 ^ 0b11 ^ 0b10 = 0b00
        let out = plain_eval(&c, &[true, false, true, true, false, true]);
        assert_eq!(out, vec![false, false]);
    }

    #[test]
    fn gf4_mul_matches_the_field_table() {
        // GF(4) in the normal basis (W, W^2): 0b11 is the field identity,
        // the nonzero elements cycle W -> W^2 -> 1
        fn field_mul(a: u64, b: u64) -> u64 {
            match (a, b) {
                (0, _) | (_, 0) => 0,
                (3, x) | (x, 3) => x,
                (1, 1) => 2,
                (2, 2) => 1,
                _ => 3,
            }
        }
        for a in 0..4u64 {
            for b in 0..4u64 {
                let out = eval_binary(2, a, b, |c, ctxt, w| {
                    gf4_mul(c, ctxt, [w[0], w[1], w[2], w[3]]).to_vec()
                });
                assert_eq!(from_bits(&out), field_mul(a, b), "gf4 {a} * {b}");
            }
        }
    }
}
