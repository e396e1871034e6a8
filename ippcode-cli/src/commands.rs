//! CLI command implementations.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

use ippcode_common::Program;
use tracing::{debug, info};

/// Exit code for an input file that cannot be opened or read.
const EXIT_INPUT: i32 = 11;

/// Exit code for output that cannot be written.
const EXIT_OUTPUT: i32 = 12;

/// Load, verify and execute a program.
///
/// `Err` carries the process exit code; a nonzero EXIT code is
/// reported the same way.
pub fn run(source: Option<&Path>, input: Option<&Path>) -> Result<(), i32> {
    let program = load(source)?;
    verify(&program)?;

    let mut input: Box<dyn BufRead> = match input {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                eprintln!("error: cannot open '{}': {e}", path.display());
                EXIT_INPUT
            })?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr();

    let result = ippcode_vm::run(&program, &mut *input, &mut stdout, &mut stderr);

    stdout.flush().map_err(|e| {
        eprintln!("error: cannot write output: {e}");
        EXIT_OUTPUT
    })?;

    let outcome = result.map_err(|e| {
        eprintln!("error: {e}");
        e.exit_code()
    })?;

    info!(
        executed = outcome.executed,
        exit_code = ?outcome.exit_code,
        "program finished"
    );
    match outcome.exit_code {
        Some(code) if code != 0 => Err(i32::from(code)),
        _ => Ok(()),
    }
}

/// Load and verify a program without running it.
pub fn check(source: Option<&Path>) -> Result<(), i32> {
    let program = load(source)?;
    verify(&program)?;
    println!("OK ({} instructions)", program.len());
    Ok(())
}

fn load(source: Option<&Path>) -> Result<Program, i32> {
    let text = read_source(source)?;
    let program = ippcode_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {e}");
        e.exit_code()
    })?;
    debug!(instructions = program.len(), "program loaded");
    Ok(program)
}

fn read_source(source: Option<&Path>) -> Result<String, i32> {
    match source {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            eprintln!("error: cannot read '{}': {e}", path.display());
            EXIT_INPUT
        }),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).map_err(|e| {
                eprintln!("error: cannot read stdin: {e}");
                EXIT_INPUT
            })?;
            Ok(text)
        }
    }
}

/// Print every semantic error; the first one decides the exit code.
fn verify(program: &Program) -> Result<(), i32> {
    let errors = match ippcode_verifier::verify(program) {
        Ok(()) => return Ok(()),
        Err(errors) => errors,
    };
    for e in &errors {
        eprintln!("error: {e}");
    }
    Err(errors.first().map_or(52, |e| e.exit_code()))
}
