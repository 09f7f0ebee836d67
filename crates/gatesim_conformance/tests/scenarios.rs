//! Small-circuit scenarios run end to end from netlist and stimulus text.

use gatesim_common::Bit;
use gatesim_conformance::{run, trace_text};

const AND_GATE: &str = "\
module and_gate(a, b, out);
  input a, b;
  output out;
  and #1 g1 (out, a, b);
endmodule
";

#[test]
fn and_gate_both_inputs_rise() {
    assert_eq!(
        trace_text(AND_GATE, "#0 a=1;\n#0 b=1;\n"),
        "0, a, 1\n0, b, 1\n1, out, 1"
    );
}

#[test]
fn and_gate_one_input_rises() {
    // AND(1, 0) is 0, the initial value, so out never appears.
    assert_eq!(trace_text(AND_GATE, "#0 a=1;\n"), "0, a, 1");
}

#[test]
fn and_gate_falls_after_delay() {
    assert_eq!(
        trace_text(AND_GATE, "#0 a=1;\n#0 b=1;\n#4 b=0;\n"),
        "0, a, 1\n0, b, 1\n1, out, 1\n4, b, 0\n5, out, 0"
    );
}

fn inverter_chain(depth: usize) -> String {
    let mut text = String::from("module chain;\n  input n0;\n");
    for i in 1..=depth {
        text.push_str(&format!("  wire n{i};\n  not #1 (n{i}, n{});\n", i - 1));
    }
    text.push_str("endmodule\n");
    text
}

#[test]
fn inverter_chain_cascades_once_consistent() {
    // Drive the odd stages so every inverter agrees with its input, then
    // toggle the head: each stage flips one tick after the previous one.
    let depth = 5;
    let netlist = inverter_chain(depth);
    let stimulus = "#0 n1=1;\n#0 n3=1;\n#0 n5=1;\n#10 n0=1;\n";
    let result = run(&netlist, stimulus);

    let cascade: Vec<String> = result
        .trace
        .entries()
        .iter()
        .filter(|e| e.time.ticks() > 10)
        .map(|e| e.to_string())
        .collect();
    assert_eq!(
        cascade,
        ["11, n1, 0", "12, n2, 1", "13, n3, 0", "14, n4, 1", "15, n5, 0"]
    );
    assert_eq!(result.final_time.ticks(), 10 + depth as u64);
}

#[test]
fn inverter_chain_from_all_zero_stops_at_first_stage() {
    // No initial evaluation happens, so NOT(1) = 0 at n1 is not a change.
    assert_eq!(trace_text(&inverter_chain(4), "#0 n0=1;\n"), "0, n0, 1");
}

#[test]
fn inverter_chain_falling_head_flips_one_stage() {
    let trace = trace_text(&inverter_chain(4), "#0 n0=1;\n#3 n0=0;\n");
    assert_eq!(trace, "0, n0, 1\n3, n0, 0\n4, n1, 1");
}

#[test]
fn buffer_chain_cascades_from_all_zero() {
    let mut netlist = String::from("module bufs;\n  input n0;\n");
    for i in 1..=6 {
        netlist.push_str(&format!("  wire n{i};\n  buf #1 (n{i}, n{});\n", i - 1));
    }
    netlist.push_str("endmodule\n");
    let result = run(&netlist, "#0 n0=1;\n");
    let times: Vec<u64> = result.trace.entries().iter().map(|e| e.time.ticks()).collect();
    assert_eq!(times, [0, 1, 2, 3, 4, 5, 6]);
}

const XOR_GATE: &str = "\
module parity(a, b, y);
  input a, b;
  output y;
  xor #2 (y, a, b);
endmodule
";

#[test]
fn xor_same_parity_flip_is_silent() {
    assert_eq!(trace_text(XOR_GATE, "#0 a=1;\n#0 b=1;\n"), "0, a, 1\n0, b, 1");
}

#[test]
fn xor_same_parity_flip_from_odd_state() {
    let result = run(XOR_GATE, "#0 a=1;\n#5 a=0;\n#5 b=1;\n");
    assert_eq!(
        result.trace.to_string(),
        "0, a, 1\n2, y, 1\n5, a, 0\n5, b, 1"
    );
    assert_eq!(result.value("y"), Some(Bit::One));
}

#[test]
fn xor_staggered_flips_glitch() {
    // Inputs move further apart than the gate delay, so y shows the
    // intermediate parity.
    assert_eq!(
        trace_text(XOR_GATE, "#0 a=1;\n#3 b=1;\n"),
        "0, a, 1\n2, y, 1\n3, b, 1\n5, y, 0"
    );
}

#[test]
fn xor_flips_within_delay_are_absorbed() {
    // Both evaluations run after b has already risen and see even parity.
    assert_eq!(trace_text(XOR_GATE, "#0 a=1;\n#1 b=1;\n"), "0, a, 1\n1, b, 1");
}
