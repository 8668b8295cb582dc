use crate::jvm_error::{VmError, VmExecResult};
use crate::jvm_values::Value;
use log::trace;

/// 操作数栈，容量在创建帧时按 max_stack 固定
#[derive(Debug)]
pub struct OperandStack {
    stack: Vec<Value>,
    max_size: usize,
}

impl OperandStack {
    pub fn new(max_size: usize) -> OperandStack {
        OperandStack {
            stack: Vec::with_capacity(max_size),
            max_size,
        }
    }

    /// Index of the top slot, `-1` when empty.
    pub fn tos(&self) -> isize {
        self.stack.len() as isize - 1
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Pops `n` values, returned in push order.
    pub fn pop_n(&mut self, n: usize) -> VmExecResult<Vec<Value>> {
        if n > self.stack.len() {
            return Err(VmError::PopFromEmptyStack);
        }
        let values = self.stack.split_off(self.stack.len() - n);
        trace!("--- value stack --- {:?}", self.stack);
        Ok(values)
    }

    pub fn pop(&mut self) -> VmExecResult<Value> {
        let result = self.stack.pop().ok_or(VmError::PopFromEmptyStack);
        trace!("--- value stack --- {:?}", self.stack);
        result
    }

    pub fn peek(&self) -> VmExecResult<&Value> {
        self.stack.last().ok_or(VmError::PopFromEmptyStack)
    }

    pub fn push(&mut self, value: Value) -> VmExecResult<()> {
        if self.stack.len() < self.max_size {
            self.stack.push(value);
            trace!("--- value stack --- {:?}", self.stack);
            Ok(())
        } else {
            Err(VmError::StackOverFlow)
        }
    }

    pub fn dup(&mut self) -> VmExecResult<()> {
        let head = self.peek()?.clone();
        self.push(head)
    }

    pub fn dup_x1(&mut self) -> VmExecResult<()> {
        let value1 = self.pop()?;
        let value2 = self.pop()?;
        self.push(value1.clone())?;
        self.push(value2)?;
        self.push(value1)
    }

    pub fn dup_x2(&mut self) -> VmExecResult<()> {
        let value1 = self.pop()?;
        let value2 = self.pop()?;
        let value3 = self.pop()?;
        self.push(value1.clone())?;
        self.push(value3)?;
        self.push(value2)?;
        self.push(value1)
    }

    pub fn dup2(&mut self) -> VmExecResult<()> {
        let value1 = self.pop()?;
        let value2 = self.pop()?;
        self.push(value2.clone())?;
        self.push(value1.clone())?;
        self.push(value2)?;
        self.push(value1)
    }

    pub fn dup2_x1(&mut self) -> VmExecResult<()> {
        let value1 = self.pop()?;
        let value2 = self.pop()?;
        let value3 = self.pop()?;
        self.push(value2.clone())?;
        self.push(value1.clone())?;
        self.push(value3)?;
        self.push(value2)?;
        self.push(value1)
    }

    pub fn dup2_x2(&mut self) -> VmExecResult<()> {
        let value1 = self.pop()?;
        let value2 = self.pop()?;
        let value3 = self.pop()?;
        let value4 = self.pop()?;
        self.push(value2.clone())?;
        self.push(value1.clone())?;
        self.push(value4)?;
        self.push(value3)?;
        self.push(value2)?;
        self.push(value1)
    }

    pub fn swap(&mut self) -> VmExecResult<()> {
        let value1 = self.pop()?;
        let value2 = self.pop()?;
        self.push(value1)?;
        self.push(value2)
    }
}
