//! Per-evaluation state threaded through compiled closures.

/// Mutable state shared by the links of one evaluation.
///
/// The only state today is the optional-chaining short circuit: once an
/// optional link (`a?.b`, `f?.(x)`) meets a nullish receiver, every later
/// link of the same syntactic chain yields `undefined` without touching its
/// receiver. The flag is scoped to a chain by [`EvalContext::enter_chain`]
/// and [`EvalContext::exit_chain`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalContext {
    short_circuit: bool,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an earlier optional link of the current chain hit a nullish
    /// receiver.
    #[inline]
    pub fn is_short_circuited(&self) -> bool {
        self.short_circuit
    }

    /// Record a nullish receiver on an optional link.
    #[inline]
    pub fn short_circuit(&mut self) {
        self.short_circuit = true;
    }

    /// Start a fresh chain, returning the enclosing chain's state.
    #[inline]
    #[must_use]
    pub fn enter_chain(&mut self) -> bool {
        std::mem::take(&mut self.short_circuit)
    }

    /// Leave a chain, restoring the state saved by `enter_chain`.
    #[inline]
    pub fn exit_chain(&mut self, saved: bool) {
        self.short_circuit = saved;
    }
}
