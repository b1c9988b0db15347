//! Instruction start offsets, for validating jump targets.

use minfuck_bytecode::Module;

/// Offsets at which the linear decoding from the code start places an
/// instruction. A truncated tail instruction still counts as a start.
#[derive(Clone, Debug)]
pub(crate) struct Boundaries {
    starts: Vec<bool>,
}

impl Boundaries {
    pub(crate) fn scan(module: &Module) -> Self {
        let mut starts = vec![false; module.size()];
        for (offset, _) in module.instructions() {
            starts[offset] = true;
        }
        Self { starts }
    }

    pub(crate) fn contains(&self, offset: usize) -> bool {
        self.starts.get(offset).copied().unwrap_or(false)
    }
}
