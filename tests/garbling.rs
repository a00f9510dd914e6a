//! End-to-end garble/evaluate scenarios over built circuits.

#![allow(unused_crate_dependencies)]

mod common;

use garble::block::{Block, BlockRng};
use garble::builder::init_wires;
use garble::circuit::{Circuit, Scheme};
use garble::evaluator::{extract_labels, map_outputs};
use garble::gadgets;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

use common::{from_bits, plain_eval, to_bits};

const ALL_SCHEMES: [Scheme; 3] = [Scheme::Standard, Scheme::HalfGates, Scheme::PrivacyFree];

/// Schemes that support NOT gates (privacy-free circuits must avoid them).
const NOT_SCHEMES: [Scheme; 2] = [Scheme::Standard, Scheme::HalfGates];

fn garble_and_eval(c: &mut Circuit, seed: Block, inputs: &[bool]) -> Vec<bool> {
    let mut rng = BlockRng::from_seed(seed);
    c.garble(&mut rng, None).unwrap();
    let input_pairs = c.wires[..c.n].to_vec();
    let result = c.eval(&extract_labels(&input_pairs, inputs)).unwrap();

    // the decoded bits must agree with the label-pair decoding
    let pairs = c.output_label_pairs().unwrap();
    assert_eq!(map_outputs(&pairs, &result.labels).unwrap(), result.bits);
    result.bits
}

#[test]
fn one_bit_and_all_schemes() {
    for scheme in ALL_SCHEMES {
        for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
            let mut c = Circuit::new(2, 1, scheme);
            let mut ctxt = c.start_building();
            let out = ctxt.next_wire();
            c.gate_and(0, 1, out);
            c.finish_building(ctxt, &[out]);

            let bits = garble_and_eval(&mut c, Block::make(1, 1), &[a, b]);
            assert_eq!(bits, vec![a && b], "{scheme:?}: {a} AND {b}");
        }
    }
}

fn adder4(scheme: Scheme) -> Circuit {
    let mut c = Circuit::new(8, 4, scheme);
    let mut ctxt = c.start_building();
    let inputs = init_wires(8);
    let outputs = gadgets::add(&mut c, &mut ctxt, &inputs);
    c.finish_building(ctxt, &outputs);
    c
}

#[test]
fn four_bit_adder_all_schemes() {
    for scheme in ALL_SCHEMES {
        // 5 + 11 wraps to 0; the carry-out is dropped at width 4
        for (a, b, want) in [(5u64, 11, 0), (3, 4, 7)] {
            let mut c = adder4(scheme);
            let mut bits = to_bits(a, 4);
            bits.extend(to_bits(b, 4));
            let out = garble_and_eval(&mut c, Block::make(2, a), &bits);
            assert_eq!(from_bits(&out), want, "{scheme:?}: {a} + {b}");
        }
    }
}

#[test]
fn four_bit_les_polarity() {
    // les outputs 1 iff the second (high-half) number is less
    for scheme in NOT_SCHEMES {
        for (a, b, want) in [(3u64, 5, false), (5, 3, true), (7, 7, false)] {
            let mut c = Circuit::new(8, 1, scheme);
            let mut ctxt = c.start_building();
            let inputs = init_wires(8);
            let out = gadgets::les(&mut c, &mut ctxt, &inputs);
            c.finish_building(ctxt, &[out]);

            let mut bits = to_bits(a, 4);
            bits.extend(to_bits(b, 4));
            let got = garble_and_eval(&mut c, Block::make(3, b), &bits);
            assert_eq!(got, vec![want], "{scheme:?}: les({a}, {b})");
        }
    }
}

#[test]
fn garbled_eval_agrees_with_plain_eval_on_random_inputs() {
    let mut input_rng = ChaCha12Rng::from_seed([42; 32]);
    for scheme in ALL_SCHEMES {
        let mut c = adder4(scheme);
        let mut rng = BlockRng::from_seed(Block::make(4, 4));
        c.garble(&mut rng, None).unwrap();
        let input_pairs = c.wires[..c.n].to_vec();

        for _ in 0..16 {
            let bits: Vec<bool> = (0..8).map(|_| input_rng.random()).collect();
            let want = plain_eval(&c, &bits);
            let result = c.eval(&extract_labels(&input_pairs, &bits)).unwrap();
            assert_eq!(result.bits, want, "{scheme:?} on {bits:?}");
        }
    }
}

#[test]
fn mixed_gadget_circuit_with_constants() {
    // exercise OR, NOT, mux and the reserved constant wires in one circuit
    let mut input_rng = ChaCha12Rng::from_seed([7; 32]);
    for scheme in NOT_SCHEMES {
        let mut c = Circuit::new(8, 5, scheme);
        let mut ctxt = c.start_building();
        let inputs = init_wires(8);
        let minimum = gadgets::min(&mut c, &mut ctxt, &inputs);
        let equal = gadgets::equ(&mut c, &mut ctxt, &inputs);
        let mut outputs = minimum;
        outputs.push(equal);
        c.finish_building(ctxt, &outputs);

        let mut rng = BlockRng::from_seed(Block::make(5, 5));
        c.garble(&mut rng, None).unwrap();
        let input_pairs = c.wires[..c.n].to_vec();

        for _ in 0..16 {
            let a = input_rng.random_range(0..16u64);
            let b = input_rng.random_range(0..16u64);
            let mut bits = to_bits(a, 4);
            bits.extend(to_bits(b, 4));
            let result = c.eval(&extract_labels(&input_pairs, &bits)).unwrap();
            assert_eq!(from_bits(&result.bits[..4]), a.min(b), "{scheme:?}: min({a}, {b})");
            assert_eq!(result.bits[4], a == b, "{scheme:?}: equ({a}, {b})");
        }
    }
}

#[test]
fn caller_supplied_input_labels_evaluate_correctly() {
    let mut rng = BlockRng::from_seed(Block::make(6, 6));
    let delta = garble::garbler::create_delta(&mut rng);
    let labels = garble::garbler::create_input_labels(&mut rng, 8, Some(delta), false);

    let mut c = adder4(Scheme::HalfGates);
    c.garble(&mut rng, Some(&labels)).unwrap();

    let mut bits = to_bits(9, 4);
    bits.extend(to_bits(4, 4));
    let result = c.eval(&extract_labels(&labels, &bits)).unwrap();
    assert_eq!(from_bits(&result.bits), 13);
}

#[test]
fn fixed_constant_gates_round_through_garbling() {
    for scheme in ALL_SCHEMES {
        let mut c = Circuit::new(1, 3, scheme);
        let mut ctxt = c.start_building();
        let zero = c.fixed_zero(&mut ctxt);
        let one = c.fixed_one(&mut ctxt);
        let mixed = ctxt.next_wire();
        c.gate_xor(one, 0, mixed);
        c.finish_building(ctxt, &[zero, one, mixed]);

        for input in [false, true] {
            let bits = garble_and_eval(&mut c, Block::make(7, 7), &[input]);
            assert_eq!(bits, vec![false, true, !input], "{scheme:?} with input {input}");
        }
    }
}
