//! Variable frames and the frame store.
//!
//! The global frame always exists. The local frame is the top of the
//! frame stack and is absent while the stack is empty. The temporary
//! frame exists from CREATEFRAME until PUSHFRAME moves it onto the stack.

use std::collections::BTreeMap;
use std::fmt;

use ippcode_common::{FrameTag, Value, VarRef};

use crate::error::Fault;
use crate::stack::Stack;

/// A scope of variables. `None` marks a declared but uninitialized variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    vars: BTreeMap<String, Option<Value>>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` uninitialized. Returns false if it already exists.
    pub fn declare(&mut self, name: &str) -> bool {
        if self.vars.contains_key(name) {
            return false;
        }
        self.vars.insert(name.to_string(), None);
        true
    }

    /// The slot for `name`: `None` if undeclared, `Some(None)` if uninitialized.
    pub fn get(&self, name: &str) -> Option<&Option<Value>> {
        self.vars.get(name)
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Option<Value>> {
        self.vars.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Renders as `{x=int@5, y=<uninit>}`.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, slot)) in self.vars.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match slot {
                Some(value) => write!(f, "{name}={}@{value}", value.data_type())?,
                None => write!(f, "{name}=<uninit>")?,
            }
        }
        f.write_str("}")
    }
}

/// All variable frames of a running program.
#[derive(Debug, Clone)]
pub struct FrameStore {
    global: Frame,
    temporary: Option<Frame>,
    stack: Stack<Frame>,
}

fn no_local_frame() -> Fault {
    Fault::FrameNotExists {
        frame: FrameTag::Local,
    }
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStore {
    pub fn new() -> Self {
        Self {
            global: Frame::new(),
            temporary: None,
            stack: Stack::new(no_local_frame),
        }
    }

    /// The frame `tag` currently denotes, if it exists.
    pub fn frame(&self, tag: FrameTag) -> Option<&Frame> {
        match tag {
            FrameTag::Global => Some(&self.global),
            FrameTag::Local => self.stack.top_tolerant(),
            FrameTag::Temporary => self.temporary.as_ref(),
        }
    }

    fn frame_mut(&mut self, tag: FrameTag) -> Result<&mut Frame, Fault> {
        match tag {
            FrameTag::Global => Ok(&mut self.global),
            FrameTag::Local => self.stack.top_mut(),
            FrameTag::Temporary => self.temporary.as_mut().ok_or(Fault::FrameNotExists {
                frame: FrameTag::Temporary,
            }),
        }
    }

    fn existing(&self, tag: FrameTag) -> Result<&Frame, Fault> {
        self.frame(tag).ok_or(Fault::FrameNotExists { frame: tag })
    }

    /// DEFVAR: declare `var` uninitialized in its frame.
    pub fn declare(&mut self, var: &VarRef) -> Result<(), Fault> {
        if self.frame_mut(var.frame)?.declare(&var.name) {
            Ok(())
        } else {
            Err(Fault::VariableRedefinition { var: var.clone() })
        }
    }

    /// Read `var`. Uninitialized yields `Ok(None)` only if `allow_uninitialized`.
    pub fn read(&self, var: &VarRef, allow_uninitialized: bool) -> Result<Option<&Value>, Fault> {
        let slot = self
            .existing(var.frame)?
            .get(&var.name)
            .ok_or_else(|| Fault::VarNotExists { var: var.clone() })?;
        match slot {
            Some(value) => Ok(Some(value)),
            None if allow_uninitialized => Ok(None),
            None => Err(Fault::missing(format!("variable {var} is uninitialized"))),
        }
    }

    /// Store `value` into a declared variable.
    pub fn write(&mut self, var: &VarRef, value: Value) -> Result<(), Fault> {
        let slot = self
            .frame_mut(var.frame)?
            .slot_mut(&var.name)
            .ok_or_else(|| Fault::VarNotExists { var: var.clone() })?;
        *slot = Some(value);
        Ok(())
    }

    /// CREATEFRAME: replace the temporary frame with an empty one.
    pub fn create_temporary(&mut self) {
        self.temporary = Some(Frame::new());
    }

    /// PUSHFRAME: move the temporary frame onto the frame stack.
    pub fn push_temporary(&mut self) -> Result<(), Fault> {
        let frame = self.temporary.take().ok_or(Fault::FrameNotExists {
            frame: FrameTag::Temporary,
        })?;
        self.stack.push(frame);
        Ok(())
    }

    /// POPFRAME: move the local frame back into the temporary slot.
    pub fn pop_temporary(&mut self) -> Result<(), Fault> {
        let frame = self.stack.pop()?;
        self.temporary = Some(frame);
        Ok(())
    }

    /// Number of frames on the frame stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
