//! The content stream state machine: every operator a page draws passes
//! through a [ContentStream], which rejects operators that are illegal in the
//! current [GraphicsObject], drops ones that would not change the graphics
//! state, folds adjacent operators together where possible, and finally
//! serializes the result.

mod operator;
mod parse;
mod state;

pub use operator::*;
pub use parse::parse;
pub use state::*;

use crate::PDFError;

/// Builds a single page's content stream
#[derive(Debug, Default)]
pub struct ContentStream {
    operators: Vec<Operator>,
    /// the state in effect before each entry of `operators` was applied
    history: Vec<GraphicsState>,
    mode: GraphicsObject,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
}

impl ContentStream {
    pub fn new() -> ContentStream {
        ContentStream::default()
    }

    /// The graphics object the stream is currently in
    pub fn mode(&self) -> GraphicsObject {
        self.mode
    }

    /// The live graphics state
    pub fn state(&self) -> &GraphicsState {
        &self.state
    }

    /// How many `q` are waiting on a `Q`
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The operators accepted so far, after collapsing
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Offer an operator to the stream
    pub fn push(&mut self, op: Operator) -> Result<(), PDFError> {
        if !op.is_legal_in(self.mode) {
            return Err(PDFError::IllegalOperator {
                operator: op.mnemonic(),
                mode: self.mode,
            });
        }
        if op == Operator::RestoreState && self.stack.is_empty() {
            return Err(PDFError::StateStackUnderflow);
        }

        if op.category().sets_state() {
            let mut probe = self.state;
            if !probe.apply(&op) {
                log::trace!("eliding redundant `{op}`");
                return Ok(());
            }
        }

        if let Some(previous) = self.operators.last() {
            match previous.collapse(&op) {
                operator::Collapse::Keep => {}
                operator::Collapse::Merge(merged) => {
                    let before = self.history.last().copied().unwrap_or_default();
                    if merged.category().sets_state() {
                        let mut probe = before;
                        if !probe.apply(&merged) {
                            // the pair leaves the state where it was
                            self.operators.pop();
                            self.history.pop();
                            self.state = before;
                            return Ok(());
                        }
                    }
                    self.apply(&op)?;
                    if let Some(last) = self.operators.last_mut() {
                        *last = merged;
                    }
                    return Ok(());
                }
                operator::Collapse::Cancel => {
                    self.operators.pop();
                    self.history.pop();
                    self.apply(&op)?;
                    return Ok(());
                }
            }
        }

        self.history.push(self.state);
        self.apply(&op)?;
        self.operators.push(op);
        Ok(())
    }

    /// Push several operators in order
    pub fn extend<I: IntoIterator<Item = Operator>>(&mut self, ops: I) -> Result<(), PDFError> {
        for op in ops {
            self.push(op)?;
        }
        Ok(())
    }

    fn apply(&mut self, op: &Operator) -> Result<(), PDFError> {
        match op {
            Operator::SaveState => self.stack.push(self.state),
            Operator::RestoreState => {
                self.state = self.stack.pop().ok_or(PDFError::StateStackUnderflow)?;
            }
            other => {
                self.state.apply(other);
            }
        }
        self.mode = op.transition(self.mode);
        Ok(())
    }

    /// Serialize the stream. Only a stream back in page description mode,
    /// with every `q` restored and at least one operator, can be finished.
    pub fn finish(self) -> Result<Vec<u8>, PDFError> {
        if self.mode != GraphicsObject::PageDescription {
            return Err(PDFError::IncompleteContentStream(
                "a text or path object is still open",
            ));
        }
        if !self.stack.is_empty() {
            return Err(PDFError::IncompleteContentStream(
                "a saved graphics state was never restored",
            ));
        }
        if self.operators.is_empty() {
            return Err(PDFError::IncompleteContentStream("no operators were emitted"));
        }
        let mut out = Vec::with_capacity(self.operators.len() * 12);
        for op in self.operators.iter() {
            op.write(&mut out)?;
        }
        Ok(out)
    }
}
