//! State carried across the single scan over a program.

use std::collections::{HashMap, HashSet};

use ippcode_common::VarRef;

/// What the scan has seen so far.
#[derive(Debug, Clone, Default)]
pub struct ScanContext {
    /// Label name to the order of its LABEL instruction.
    pub labels: HashMap<String, u32>,
    /// Jump targets with the order of the instruction naming them, in
    /// program order.
    pub jumps: Vec<(u32, String)>,
    /// Global variables declared by DEFVAR.
    pub globals: HashSet<VarRef>,
}

impl ScanContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_defined(&self, label: &str) -> bool {
        self.labels.contains_key(label)
    }
}
