//! Integration tests for the IPPcode22 execution engine.
//!
//! Programs are built directly from instruction records, the way a
//! loader hands them over.

use ippcode_common::{DataType, FrameTag, Instruction, Opcode, Operand, Program, Value, VarRef};
use ippcode_vm::{run, Fault, Machine, Outcome, RuntimeError};
use proptest::prelude::*;

// ============================================================
// Helper functions
// ============================================================

fn var(frame: FrameTag, name: &str) -> Operand {
    Operand::variable(0, VarRef::new(frame, name))
}

fn gf(name: &str) -> Operand {
    var(FrameTag::Global, name)
}

fn lf(name: &str) -> Operand {
    var(FrameTag::Local, name)
}

fn tf(name: &str) -> Operand {
    var(FrameTag::Temporary, name)
}

fn int(n: i64) -> Operand {
    Operand::literal(0, n.to_string(), Value::Int(n))
}

fn string(s: &str) -> Operand {
    Operand::literal(0, s, Value::Str(s.to_string()))
}

fn boolean(b: bool) -> Operand {
    Operand::literal(0, b.to_string(), Value::Bool(b))
}

fn nil() -> Operand {
    Operand::literal(0, "nil", Value::Nil)
}

fn float(x: f64) -> Operand {
    Operand::literal(0, x.to_string(), Value::Float(x))
}

fn label(name: &str) -> Operand {
    Operand::label(0, name)
}

fn ty(kind: DataType) -> Operand {
    Operand::type_name(0, kind)
}

/// Shorthand for one instruction; operand positions are assigned 1..N.
fn ins(opcode: Opcode, operands: Vec<Operand>) -> (Opcode, Vec<Operand>) {
    (opcode, operands)
}

/// Build a program, numbering instructions 1..N in list order.
fn program(list: Vec<(Opcode, Vec<Operand>)>) -> Program {
    let instructions = list
        .into_iter()
        .enumerate()
        .map(|(i, (opcode, mut operands))| {
            for (pos, op) in operands.iter_mut().enumerate() {
                op.position = (pos + 1) as u8;
            }
            Instruction::new(opcode, (i + 1) as u32, operands)
        })
        .collect();
    Program::new(instructions).unwrap()
}

struct RunResult {
    result: Result<Outcome, RuntimeError>,
    stdout: String,
    stderr: String,
}

fn execute_with_input(program: &Program, input: &str) -> RunResult {
    let mut input = input.as_bytes();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let result = run(program, &mut input, &mut stdout, &mut stderr);
    RunResult {
        result,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
    }
}

fn execute(program: &Program) -> RunResult {
    execute_with_input(program, "")
}

fn fault_of(run: &RunResult) -> &Fault {
    &run.result.as_ref().unwrap_err().fault
}

// ============================================================
// End-to-end scenarios
// ============================================================

#[test]
fn add_two_globals_prints_sum() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("x")]),
        ins(Opcode::Move, vec![gf("x"), int(5)]),
        ins(Opcode::DefVar, vec![gf("y")]),
        ins(Opcode::Move, vec![gf("y"), int(3)]),
        ins(Opcode::Add, vec![gf("x"), gf("x"), gf("y")]),
        ins(Opcode::Write, vec![gf("x")]),
    ]);
    let r = execute(&p);
    assert_eq!(r.stdout, "8");
    assert_eq!(
        r.result,
        Ok(Outcome {
            exit_code: None,
            executed: 6
        })
    );
}

#[test]
fn concat_strings() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("s")]),
        ins(Opcode::Move, vec![gf("s"), string("ab")]),
        ins(Opcode::Concat, vec![gf("s"), gf("s"), string("cd")]),
        ins(Opcode::Write, vec![gf("s")]),
    ]);
    assert_eq!(execute(&p).stdout, "abcd");
}

#[test]
fn call_returns_after_call_site() {
    let p = program(vec![
        ins(Opcode::Jump, vec![label("main")]),
        ins(Opcode::Label, vec![label("greet")]),
        ins(Opcode::Write, vec![string("in ")]),
        ins(Opcode::Break, vec![]),
        ins(Opcode::Return, vec![]),
        ins(Opcode::Label, vec![label("main")]),
        ins(Opcode::Call, vec![label("greet")]),
        ins(Opcode::Write, vec![string("after")]),
        ins(Opcode::Break, vec![]),
    ]);
    let r = execute(&p);
    assert_eq!(r.stdout, "in after");
    r.result.unwrap();

    let breaks: Vec<&str> = r
        .stderr
        .lines()
        .filter(|l| l.trim_start().starts_with("function:"))
        .collect();
    assert_eq!(breaks, vec!["  function: greet", "  function: <main>"]);
}

#[test]
fn nested_calls_restore_function() {
    let p = program(vec![
        ins(Opcode::Call, vec![label("outer")]),
        ins(Opcode::Write, vec![string("done")]),
        ins(Opcode::Exit, vec![int(0)]),
        ins(Opcode::Label, vec![label("outer")]),
        ins(Opcode::Call, vec![label("inner")]),
        ins(Opcode::Write, vec![string("o")]),
        ins(Opcode::Return, vec![]),
        ins(Opcode::Label, vec![label("inner")]),
        ins(Opcode::Write, vec![string("i")]),
        ins(Opcode::Return, vec![]),
    ]);

    let mut input: &[u8] = b"";
    let mut out = Vec::new();
    let mut diag = Vec::new();
    let mut machine = Machine::new(&p, &mut input, &mut out, &mut diag);
    let outcome = machine.execute().unwrap();
    assert_eq!(outcome.exit_code, Some(0));
    assert_eq!(machine.current_function(), None);
    assert_eq!(machine.call_depth(), 0);
    assert!(!machine.is_running());
    assert_eq!(out, b"iodone");
}

// ============================================================
// Labels
// ============================================================

#[test]
fn labels_map_to_following_instruction() {
    let p = program(vec![
        ins(Opcode::Nop, vec![]),
        ins(Opcode::Label, vec![label("a")]),
        ins(Opcode::Nop, vec![]),
        ins(Opcode::Label, vec![label("b")]),
    ]);
    let mut input: &[u8] = b"";
    let mut out = Vec::new();
    let mut diag = Vec::new();
    let mut machine = Machine::new(&p, &mut input, &mut out, &mut diag);
    machine.map_labels().unwrap();
    assert_eq!(machine.label_target("a"), Some(2));
    assert_eq!(machine.label_target("b"), Some(4));
    assert_eq!(machine.label_target("c"), None);
}

#[test]
fn duplicate_label_fails_before_execution() {
    let p = program(vec![
        ins(Opcode::Write, vec![string("x")]),
        ins(Opcode::Label, vec![label("l")]),
        ins(Opcode::Label, vec![label("l")]),
    ]);
    let r = execute(&p);
    assert_eq!(r.stdout, "");
    let err = r.result.unwrap_err();
    assert_eq!(
        err.fault,
        Fault::LabelRedefinition {
            label: "l".into()
        }
    );
    assert_eq!(err.exit_code(), 52);
    assert_eq!(err.site.map(|s| s.order), Some(3));
}

#[test]
fn jump_to_undefined_label_at_runtime() {
    let p = program(vec![ins(Opcode::Jump, vec![label("nowhere")])]);
    let r = execute(&p);
    assert_eq!(
        fault_of(&r),
        &Fault::UndefinedLabel {
            label: "nowhere".into()
        }
    );
}

#[test]
fn jump_skips_instructions() {
    let p = program(vec![
        ins(Opcode::Jump, vec![label("end")]),
        ins(Opcode::Write, vec![string("skipped")]),
        ins(Opcode::Label, vec![label("end")]),
        ins(Opcode::Write, vec![string("reached")]),
    ]);
    assert_eq!(execute(&p).stdout, "reached");
}

#[test]
fn jump_to_trailing_label_halts() {
    let p = program(vec![
        ins(Opcode::Jump, vec![label("end")]),
        ins(Opcode::Write, vec![string("skipped")]),
        ins(Opcode::Label, vec![label("end")]),
    ]);
    let r = execute(&p);
    assert_eq!(r.stdout, "");
    assert_eq!(r.result.map(|o| o.executed), Ok(1));
}

#[test]
fn counting_loop() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("i")]),
        ins(Opcode::Move, vec![gf("i"), int(0)]),
        ins(Opcode::Label, vec![label("loop")]),
        ins(Opcode::Write, vec![gf("i")]),
        ins(Opcode::Add, vec![gf("i"), gf("i"), int(1)]),
        ins(Opcode::JumpIfNeq, vec![label("loop"), gf("i"), int(3)]),
    ]);
    assert_eq!(execute(&p).stdout, "012");
}

#[test]
fn conditional_jump_on_nil() {
    let p = program(vec![
        ins(Opcode::JumpIfEq, vec![label("yes"), nil(), nil()]),
        ins(Opcode::Write, vec![string("no")]),
        ins(Opcode::Exit, vec![int(0)]),
        ins(Opcode::Label, vec![label("yes")]),
        ins(Opcode::JumpIfEq, vec![label("bad"), nil(), int(0)]),
        ins(Opcode::Write, vec![string("yes")]),
        ins(Opcode::Label, vec![label("bad")]),
    ]);
    assert_eq!(execute(&p).stdout, "yes");
}

#[test]
fn conditional_jump_type_mismatch() {
    let p = program(vec![
        ins(Opcode::Label, vec![label("l")]),
        ins(Opcode::JumpIfEq, vec![label("l"), int(1), string("1")]),
    ]);
    let r = execute(&p);
    assert!(matches!(fault_of(&r), Fault::BadTypes { .. }));
    assert_eq!(r.result.unwrap_err().exit_code(), 53);
}

#[test]
fn stack_conditional_jumps() {
    let p = program(vec![
        ins(Opcode::Pushs, vec![int(4)]),
        ins(Opcode::Pushs, vec![int(4)]),
        ins(Opcode::JumpIfEqs, vec![label("eq")]),
        ins(Opcode::Write, vec![string("ne")]),
        ins(Opcode::Label, vec![label("eq")]),
        ins(Opcode::Pushs, vec![string("a")]),
        ins(Opcode::Pushs, vec![string("b")]),
        ins(Opcode::JumpIfNeqs, vec![label("end")]),
        ins(Opcode::Write, vec![string("same")]),
        ins(Opcode::Label, vec![label("end")]),
        ins(Opcode::Write, vec![string("ok")]),
    ]);
    let mut input: &[u8] = b"";
    let mut out = Vec::new();
    let mut diag = Vec::new();
    let mut machine = Machine::new(&p, &mut input, &mut out, &mut diag);
    machine.execute().unwrap();
    assert_eq!(machine.data_stack().count(), 0);
    assert_eq!(out, b"ok");
}

// ============================================================
// EXIT
// ============================================================

#[test]
fn exit_49_sets_code_and_halts() {
    let p = program(vec![
        ins(Opcode::Exit, vec![int(49)]),
        ins(Opcode::Write, vec![string("unreachable")]),
    ]);
    let r = execute(&p);
    assert_eq!(r.stdout, "");
    assert_eq!(
        r.result,
        Ok(Outcome {
            exit_code: Some(49),
            executed: 1
        })
    );
}

#[test]
fn exit_50_is_bad_value() {
    let p = program(vec![ins(Opcode::Exit, vec![int(50)])]);
    let r = execute(&p);
    assert!(matches!(fault_of(&r), Fault::BadValue { .. }));
    assert_eq!(r.result.unwrap_err().exit_code(), 57);
}

#[test]
fn exit_negative_is_bad_value() {
    let p = program(vec![ins(Opcode::Exit, vec![int(-1)])]);
    assert!(matches!(fault_of(&execute(&p)), Fault::BadValue { .. }));
}

#[test]
fn exit_float_is_bad_types() {
    let p = program(vec![ins(Opcode::Exit, vec![float(1.0)])]);
    let r = execute(&p);
    assert_eq!(
        fault_of(&r),
        &Fault::BadTypes {
            operation: "EXIT",
            found: "float".into()
        }
    );
}

// ============================================================
// Frames
// ============================================================

#[test]
fn temporary_frame_lifecycle() {
    let p = program(vec![
        ins(Opcode::CreateFrame, vec![]),
        ins(Opcode::DefVar, vec![tf("a")]),
        ins(Opcode::Move, vec![tf("a"), int(1)]),
        ins(Opcode::PushFrame, vec![]),
        ins(Opcode::Add, vec![lf("a"), lf("a"), int(41)]),
        ins(Opcode::PopFrame, vec![]),
        ins(Opcode::Write, vec![tf("a")]),
    ]);
    let r = execute(&p);
    assert_eq!(r.stdout, "42");
    r.result.unwrap();
}

#[test]
fn createframe_discards_previous_temporary() {
    let p = program(vec![
        ins(Opcode::CreateFrame, vec![]),
        ins(Opcode::DefVar, vec![tf("a")]),
        ins(Opcode::CreateFrame, vec![]),
        ins(Opcode::Write, vec![tf("a")]),
    ]);
    let r = execute(&p);
    assert!(matches!(fault_of(&r), Fault::VarNotExists { .. }));
    assert_eq!(r.result.unwrap_err().exit_code(), 54);
}

#[test]
fn local_redefinition_detected_at_runtime() {
    let p = program(vec![
        ins(Opcode::CreateFrame, vec![]),
        ins(Opcode::PushFrame, vec![]),
        ins(Opcode::DefVar, vec![lf("x")]),
        ins(Opcode::DefVar, vec![lf("x")]),
    ]);
    let r = execute(&p);
    let err = r.result.unwrap_err();
    assert_eq!(
        err.fault,
        Fault::VariableRedefinition {
            var: VarRef::new(FrameTag::Local, "x")
        }
    );
    assert_eq!(err.exit_code(), 52);
    assert_eq!(err.site.map(|s| s.order), Some(4));
}

#[test]
fn temporary_frame_missing() {
    let p = program(vec![ins(Opcode::DefVar, vec![tf("x")])]);
    let r = execute(&p);
    assert_eq!(
        fault_of(&r),
        &Fault::FrameNotExists {
            frame: FrameTag::Temporary
        }
    );
    assert_eq!(r.result.unwrap_err().exit_code(), 55);
}

#[test]
fn local_frame_missing() {
    let p = program(vec![ins(Opcode::Write, vec![lf("x")])]);
    assert_eq!(
        fault_of(&execute(&p)),
        &Fault::FrameNotExists {
            frame: FrameTag::Local
        }
    );
}

#[test]
fn pushframe_without_temporary() {
    let p = program(vec![ins(Opcode::PushFrame, vec![])]);
    assert!(matches!(
        fault_of(&execute(&p)),
        Fault::FrameNotExists { .. }
    ));
}

#[test]
fn popframe_on_empty_stack() {
    let p = program(vec![ins(Opcode::PopFrame, vec![])]);
    let r = execute(&p);
    assert_eq!(r.result.unwrap_err().exit_code(), 55);
}

#[test]
fn undeclared_variable() {
    let p = program(vec![ins(Opcode::Move, vec![gf("nope"), int(1)])]);
    let r = execute(&p);
    assert_eq!(
        fault_of(&r),
        &Fault::VarNotExists {
            var: VarRef::new(FrameTag::Global, "nope")
        }
    );
}

#[test]
fn uninitialized_read_is_missing_value() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("x")]),
        ins(Opcode::Write, vec![gf("x")]),
    ]);
    let r = execute(&p);
    assert!(matches!(fault_of(&r), Fault::MissingValue { .. }));
    assert_eq!(r.result.unwrap_err().exit_code(), 56);
}

#[test]
fn type_of_uninitialized_is_empty() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("x")]),
        ins(Opcode::DefVar, vec![gf("t")]),
        ins(Opcode::Type, vec![gf("t"), gf("x")]),
        ins(Opcode::Write, vec![string("[")]),
        ins(Opcode::Write, vec![gf("t")]),
        ins(Opcode::Write, vec![string("]")]),
        ins(Opcode::Type, vec![gf("t"), float(0.5)]),
        ins(Opcode::Write, vec![gf("t")]),
    ]);
    assert_eq!(execute(&p).stdout, "[]float");
}

// ============================================================
// Stacks
// ============================================================

#[test]
fn stack_forms_pop_right_operand_first() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("r")]),
        ins(Opcode::Pushs, vec![int(7)]),
        ins(Opcode::Pushs, vec![int(2)]),
        ins(Opcode::Subs, vec![]),
        ins(Opcode::Pops, vec![gf("r")]),
        ins(Opcode::Write, vec![gf("r")]),
        ins(Opcode::Pushs, vec![int(7)]),
        ins(Opcode::Pushs, vec![int(2)]),
        ins(Opcode::IDivs, vec![]),
        ins(Opcode::Pushs, vec![int(3)]),
        ins(Opcode::Lts, vec![]),
        ins(Opcode::Nots, vec![]),
        ins(Opcode::Pops, vec![gf("r")]),
        ins(Opcode::Write, vec![gf("r")]),
    ]);
    assert_eq!(execute(&p).stdout, "5true");
}

#[test]
fn stack_conversions() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("r")]),
        ins(Opcode::Pushs, vec![string("AB")]),
        ins(Opcode::Pushs, vec![int(1)]),
        ins(Opcode::Stri2Ints, vec![]),
        ins(Opcode::Int2Chars, vec![]),
        ins(Opcode::Pops, vec![gf("r")]),
        ins(Opcode::Write, vec![gf("r")]),
        ins(Opcode::Pushs, vec![int(3)]),
        ins(Opcode::Int2Floats, vec![]),
        ins(Opcode::Pops, vec![gf("r")]),
        ins(Opcode::Write, vec![gf("r")]),
    ]);
    assert_eq!(execute(&p).stdout, "B0x1.8p+1");
}

#[test]
fn pops_on_empty_stack() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("x")]),
        ins(Opcode::Pops, vec![gf("x")]),
    ]);
    let r = execute(&p);
    assert!(matches!(fault_of(&r), Fault::MissingValue { .. }));
}

#[test]
fn clears_empties_data_stack() {
    let p = program(vec![
        ins(Opcode::Pushs, vec![int(1)]),
        ins(Opcode::Pushs, vec![int(2)]),
        ins(Opcode::Clears, vec![]),
        ins(Opcode::Adds, vec![]),
    ]);
    assert!(matches!(
        fault_of(&execute(&p)),
        Fault::MissingValue { .. }
    ));
}

#[test]
fn return_without_call() {
    let p = program(vec![ins(Opcode::Return, vec![])]);
    let r = execute(&p);
    assert_eq!(r.result.unwrap_err().exit_code(), 56);
}

// ============================================================
// Arithmetic and strings
// ============================================================

#[test]
fn mixed_int_float_is_bad_types() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("x")]),
        ins(Opcode::Add, vec![gf("x"), int(1), float(1.0)]),
    ]);
    assert!(matches!(fault_of(&execute(&p)), Fault::BadTypes { .. }));
}

#[test]
fn idiv_by_zero() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("x")]),
        ins(Opcode::IDiv, vec![gf("x"), int(1), int(0)]),
    ]);
    let r = execute(&p);
    assert_eq!(r.result.unwrap_err().exit_code(), 57);
}

#[test]
fn float_division_and_conversion() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("f")]),
        ins(Opcode::Int2Float, vec![gf("f"), int(7)]),
        ins(Opcode::Div, vec![gf("f"), gf("f"), float(2.0)]),
        ins(Opcode::Write, vec![gf("f")]),
        ins(Opcode::Write, vec![string(" ")]),
        ins(Opcode::Float2Int, vec![gf("f"), gf("f")]),
        ins(Opcode::Write, vec![gf("f")]),
    ]);
    assert_eq!(execute(&p).stdout, "0x1.cp+1 3");
}

#[test]
fn string_operations() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("s")]),
        ins(Opcode::DefVar, vec![gf("n")]),
        ins(Opcode::Move, vec![gf("s"), string("kůň")]),
        ins(Opcode::Strlen, vec![gf("n"), gf("s")]),
        ins(Opcode::Write, vec![gf("n")]),
        ins(Opcode::SetChar, vec![gf("s"), int(1), string("o")]),
        ins(Opcode::Write, vec![gf("s")]),
        ins(Opcode::GetChar, vec![gf("s"), gf("s"), int(2)]),
        ins(Opcode::Write, vec![gf("s")]),
        ins(Opcode::Stri2Int, vec![gf("n"), string("a"), int(0)]),
        ins(Opcode::Write, vec![gf("n")]),
    ]);
    assert_eq!(execute(&p).stdout, "3koňň97");
}

#[test]
fn getchar_out_of_range() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("c")]),
        ins(Opcode::GetChar, vec![gf("c"), string("abc"), int(3)]),
    ]);
    let r = execute(&p);
    assert!(matches!(fault_of(&r), Fault::InvalidStringOp { .. }));
    assert_eq!(r.result.unwrap_err().exit_code(), 58);
}

#[test]
fn setchar_on_uninitialized_target() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("s")]),
        ins(Opcode::SetChar, vec![gf("s"), int(0), string("x")]),
    ]);
    assert!(matches!(
        fault_of(&execute(&p)),
        Fault::MissingValue { .. }
    ));
}

#[test]
fn comparisons_and_logic() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("b")]),
        ins(Opcode::Lt, vec![gf("b"), string("abc"), string("abd")]),
        ins(Opcode::Write, vec![gf("b")]),
        ins(Opcode::Gt, vec![gf("b"), boolean(false), boolean(true)]),
        ins(Opcode::Write, vec![gf("b")]),
        ins(Opcode::Eq, vec![gf("b"), nil(), string("")]),
        ins(Opcode::Write, vec![gf("b")]),
        ins(Opcode::Or, vec![gf("b"), gf("b"), boolean(true)]),
        ins(Opcode::And, vec![gf("b"), gf("b"), boolean(true)]),
        ins(Opcode::Not, vec![gf("b"), gf("b")]),
        ins(Opcode::Write, vec![gf("b")]),
    ]);
    assert_eq!(execute(&p).stdout, "truefalsefalsefalse");
}

#[test]
fn lt_with_nil_is_bad_types() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("b")]),
        ins(Opcode::Lt, vec![gf("b"), nil(), nil()]),
    ]);
    assert!(matches!(fault_of(&execute(&p)), Fault::BadTypes { .. }));
}

// ============================================================
// I/O
// ============================================================

#[test]
fn read_each_type() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("v")]),
        ins(Opcode::DefVar, vec![gf("t")]),
        ins(Opcode::Read, vec![gf("v"), ty(DataType::Int)]),
        ins(Opcode::Write, vec![gf("v")]),
        ins(Opcode::Read, vec![gf("v"), ty(DataType::Str)]),
        ins(Opcode::Write, vec![gf("v")]),
        ins(Opcode::Read, vec![gf("v"), ty(DataType::Bool)]),
        ins(Opcode::Write, vec![gf("v")]),
        ins(Opcode::Read, vec![gf("v"), ty(DataType::Float)]),
        ins(Opcode::Write, vec![gf("v")]),
        ins(Opcode::Read, vec![gf("v"), ty(DataType::Int)]),
        ins(Opcode::Type, vec![gf("t"), gf("v")]),
        ins(Opcode::Write, vec![gf("t")]),
    ]);
    let r = execute_with_input(&p, "42\nhello world\nTrue\n0x1p-1\n");
    assert_eq!(r.stdout, "42hello worldtrue0x1p-1nil");
    r.result.unwrap();
}

#[test]
fn read_unparsable_gives_nil() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("v")]),
        ins(Opcode::DefVar, vec![gf("t")]),
        ins(Opcode::Read, vec![gf("v"), ty(DataType::Int)]),
        ins(Opcode::Type, vec![gf("t"), gf("v")]),
        ins(Opcode::Write, vec![gf("t")]),
    ]);
    assert_eq!(execute_with_input(&p, "forty-two\n").stdout, "nil");
}

#[test]
fn read_invalid_utf8_gives_nil_and_continues() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("x")]),
        ins(Opcode::Read, vec![gf("x"), ty(DataType::Str)]),
        ins(Opcode::Type, vec![gf("x"), gf("x")]),
        ins(Opcode::Write, vec![gf("x")]),
        ins(Opcode::Read, vec![gf("x"), ty(DataType::Str)]),
        ins(Opcode::Write, vec![gf("x")]),
    ]);
    let mut input: &[u8] = b"\xff\xfe\nnext\n";
    let mut out = Vec::new();
    let mut diag = Vec::new();
    let result = run(&p, &mut input, &mut out, &mut diag);
    assert!(result.is_ok(), "{result:?}");
    assert_eq!(out, b"nilnext");
}

#[test]
fn read_nil_type_is_bad_value() {
    let p = program(vec![
        ins(Opcode::DefVar, vec![gf("v")]),
        ins(Opcode::Read, vec![gf("v"), ty(DataType::Nil)]),
    ]);
    assert!(matches!(
        fault_of(&execute_with_input(&p, "nil\n")),
        Fault::BadValue { .. }
    ));
}

#[test]
fn write_renderings() {
    let p = program(vec![
        ins(Opcode::Write, vec![boolean(true)]),
        ins(Opcode::Write, vec![nil()]),
        ins(Opcode::Write, vec![int(-3)]),
        ins(Opcode::Write, vec![float(0.1)]),
    ]);
    assert_eq!(execute(&p).stdout, "true-30x1.999999999999ap-4");
}

#[test]
fn debug_output_goes_to_diagnostics_and_is_not_counted() {
    let p = program(vec![
        ins(Opcode::DPrint, vec![string("dbg")]),
        ins(Opcode::Write, vec![string("out")]),
        ins(Opcode::Break, vec![]),
        ins(Opcode::Label, vec![label("l")]),
    ]);
    let r = execute(&p);
    assert_eq!(r.stdout, "out");
    assert!(r.stderr.starts_with("dbg"));
    assert!(r.stderr.contains("BREAK at order 3"));
    assert!(r.stderr.contains("GF: {}"));
    assert_eq!(r.result.map(|o| o.executed), Ok(2));
}

#[test]
fn empty_program_runs_nothing() {
    let p = program(vec![]);
    assert_eq!(
        execute(&p).result,
        Ok(Outcome {
            exit_code: None,
            executed: 0
        })
    );
}

#[test]
fn error_names_failing_instruction() {
    let p = program(vec![
        ins(Opcode::Nop, vec![]),
        ins(Opcode::Write, vec![gf("missing")]),
    ]);
    let err = execute(&p).result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "WRITE (order 2): variable GF@missing does not exist"
    );
}

// ============================================================
// Properties
// ============================================================

proptest! {
    /// MOVE then WRITE prints the integer unchanged.
    #[test]
    fn write_prints_int(n in any::<i64>()) {
        let p = program(vec![
            ins(Opcode::DefVar, vec![gf("x")]),
            ins(Opcode::Move, vec![gf("x"), int(n)]),
            ins(Opcode::Write, vec![gf("x")]),
        ]);
        prop_assert_eq!(execute(&p).stdout, n.to_string());
    }

    /// Stack forms agree with their three-address counterparts.
    #[test]
    fn stack_and_register_forms_agree(a in any::<i64>(), b in any::<i64>()) {
        let p = program(vec![
            ins(Opcode::DefVar, vec![gf("r")]),
            ins(Opcode::Sub, vec![gf("r"), int(a), int(b)]),
            ins(Opcode::Write, vec![gf("r")]),
            ins(Opcode::Write, vec![string(" ")]),
            ins(Opcode::Pushs, vec![int(a)]),
            ins(Opcode::Pushs, vec![int(b)]),
            ins(Opcode::Subs, vec![]),
            ins(Opcode::Pops, vec![gf("r")]),
            ins(Opcode::Write, vec![gf("r")]),
        ]);
        let out = execute(&p).stdout;
        let (left, right) = out.split_once(' ').unwrap();
        prop_assert_eq!(left, right);
    }

    /// READ stores either Nil or a value of the requested type.
    #[test]
    fn read_result_matches_requested_type(
        kind in prop::sample::select(vec![DataType::Int, DataType::Float, DataType::Bool, DataType::Str]),
        line in "[ -~]{0,12}",
    ) {
        let p = program(vec![
            ins(Opcode::DefVar, vec![gf("v")]),
            ins(Opcode::DefVar, vec![gf("t")]),
            ins(Opcode::Read, vec![gf("v"), ty(kind)]),
            ins(Opcode::Type, vec![gf("t"), gf("v")]),
            ins(Opcode::Write, vec![gf("t")]),
        ]);
        let r = execute_with_input(&p, &format!("{line}\n"));
        prop_assert!(r.result.is_ok());
        prop_assert!(r.stdout == "nil" || r.stdout == kind.name(), "{} for {:?}", r.stdout, kind);
    }

    /// EXIT accepts exactly 0..=49.
    #[test]
    fn exit_code_range(n in -100i64..100) {
        let p = program(vec![ins(Opcode::Exit, vec![int(n)])]);
        let r = execute(&p);
        if (0..=49).contains(&n) {
            prop_assert_eq!(r.result.map(|o| o.exit_code), Ok(Some(n as u8)));
        } else {
            prop_assert_eq!(r.result.unwrap_err().exit_code(), 57);
        }
    }
}
