//! Mathexpr runtime values.
//!
//! Everything a compiled expression touches at run time lives here: the
//! [`Value`] union and its type tags, typed multi-signature dispatch, the
//! variable [`Scope`] abstraction, the function [`Namespace`] with its access
//! policy, and the subset/assign primitives used by subscripts.
//!
//! # Architecture
//!
//! - [`value`]: the closed value union, `type_of`, truthiness, formatting
//! - [`errors`]: `EvalError` with a structured `EvalErrorKind`
//! - [`function`]: native, raw and typed functions
//! - [`scope`]: the `Scope` trait, `MapScope` and `PartitionedScope`
//! - [`namespace`]: built-in bindings plus the forbidden-name policy
//! - [`access`]: index values, `subset`, `assign`, `size`, property access
//! - [`fraction`], [`unit`]: small numeric kinds
//! - [`json`]: value encoding and the reviver shared with node JSON

pub mod access;
pub mod errors;
pub mod fraction;
pub mod function;
pub mod json;
pub mod namespace;
pub mod scope;
pub mod unit;
pub mod value;

pub use access::{assign, get_property, set_property, size, subset, IndexDim, IndexValue};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use fraction::Fraction;
pub use function::{Function, FunctionKind, NativeFn, RawFn, TypedFunction};
pub use json::revive;
pub use namespace::Namespace;
pub use scope::{Args, MapScope, PartitionedScope, Scope, ScopeRef};
pub use unit::{Dimension, Unit, UnitDef};
pub use value::{Heap, Value};

pub use num_complex::Complex64;
pub use rust_decimal::Decimal;
