use bitflags::bitflags;

bitflags! {
    /// Context-sensitive parsing rules.
    ///
    /// Set for the extent of a construct and restored when it ends.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub(crate) struct ParseContext: u8 {
        /// Inside `(..)`, `[..]` or `{..}`. Newlines are insignificant.
        const IN_GROUP = 1 << 0;
        /// In the true branch of `c ? a : b`. A `:` ends the branch
        /// instead of starting a range.
        const IN_CONDITIONAL = 1 << 1;
        /// Inside an index `[..]`. A bare `:` selects a whole dimension and
        /// a range may leave out its end.
        const IN_INDEX = 1 << 2;
    }
}

impl ParseContext {
    /// Context for the inside of a bracket pair.
    #[must_use]
    pub(crate) fn enter_group(self, index: bool) -> Self {
        let mut inner = (self | ParseContext::IN_GROUP) - ParseContext::IN_CONDITIONAL;
        inner.set(ParseContext::IN_INDEX, index);
        inner
    }

    pub(crate) fn skips_newlines(self) -> bool {
        self.contains(ParseContext::IN_GROUP)
    }

    pub(crate) fn colon_is_range(self) -> bool {
        !self.contains(ParseContext::IN_CONDITIONAL)
    }

    pub(crate) fn in_index(self) -> bool {
        self.contains(ParseContext::IN_INDEX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_reset_conditional_state() {
        let ctx = ParseContext::IN_CONDITIONAL;
        assert!(!ctx.colon_is_range());
        let inner = ctx.enter_group(true);
        assert!(inner.colon_is_range());
        assert!(inner.skips_newlines());
        assert!(inner.in_index());
        assert!(!inner.enter_group(false).in_index());
    }
}
