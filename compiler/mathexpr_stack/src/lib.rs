//! Stack growth for deep expression trees.
//!
//! Parsing, compiling and evaluating an expression all recurse once per
//! nesting level, so `((((...))))` or a user function that calls itself a
//! few thousand times would otherwise hit the native stack limit. Each
//! recursive entry point wraps itself in [`ensure_sufficient_stack`].
//!
//! On native targets the stack is extended in 1 MiB segments once less than
//! 128 KiB remains. On `wasm32` the closure runs directly.

const RED_ZONE: usize = 128 * 1024;

const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the remaining space is low.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
