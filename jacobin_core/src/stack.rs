use crate::jvm_error::{VmError, VmExecResult};
use crate::stack_frame::Frame;
use log::trace;

/// Per-thread LIFO of frames. The current frame is the last element.
#[derive(Debug, Default)]
pub struct FrameStack {
    frames: Vec<Frame>,
}

impl FrameStack {
    pub fn new() -> FrameStack {
        FrameStack { frames: Vec::new() }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn push_frame(&mut self, frame: Frame) {
        trace!(
            "push frame {} (depth {})",
            frame.qualified_name(),
            self.frames.len() + 1
        );
        self.frames.push(frame);
    }

    pub fn pop_frame(&mut self) -> VmExecResult<Frame> {
        let frame = self.frames.pop().ok_or(VmError::PopFromEmptyStack)?;
        trace!(
            "pop frame {} (depth {})",
            frame.qualified_name(),
            self.frames.len()
        );
        Ok(frame)
    }

    /// The frame `depth` calls below the current one; 0 is the current frame.
    pub fn peek_frame(&self, depth: usize) -> VmExecResult<&Frame> {
        let len = self.frames.len();
        if depth >= len {
            return Err(VmError::IndexOutOfBounds);
        }
        Ok(&self.frames[len - 1 - depth])
    }

    pub fn current(&self) -> VmExecResult<&Frame> {
        self.frames.last().ok_or(VmError::PopFromEmptyStack)
    }

    pub fn current_mut(&mut self) -> VmExecResult<&mut Frame> {
        self.frames.last_mut().ok_or(VmError::PopFromEmptyStack)
    }

    /// Frames from the current one outwards.
    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter().rev()
    }
}
