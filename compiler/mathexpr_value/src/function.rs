//! Callable values and typed multi-signature dispatch.
//!
//! A [`Function`] is one of three kinds:
//!
//! - **Typed**: a [`TypedFunction`] holding several implementations keyed
//!   by type patterns such as `"number, number"` or `"Array|Matrix"`.
//! - **Native**: a closure over evaluated arguments. User-defined functions
//!   (`f(x) = ...`) are native closures built by the evaluator.
//! - **Raw**: receives the unevaluated argument nodes, the namespace and a
//!   sub-scope instead of values. Used where a function needs the syntax of
//!   its arguments, or must not evaluate all of them.

use std::fmt;
use std::rc::Rc;

use mathexpr_ir::NodeRef;
use num_complex::Complex64;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::errors::{arity_mismatch, no_matching_signature, EvalError, EvalResult};
use crate::fraction::Fraction;
use crate::namespace::Namespace;
use crate::scope::ScopeRef;
use crate::value::Value;

/// Implementation over evaluated arguments.
pub type NativeFn = Rc<dyn Fn(&[Value]) -> EvalResult>;

/// Implementation over unevaluated argument nodes.
pub type RawFn = Rc<dyn Fn(&[NodeRef], &Rc<Namespace>, &ScopeRef) -> EvalResult>;

#[derive(Clone)]
pub enum FunctionKind {
    Typed(Rc<TypedFunction>),
    Native(NativeFn),
    Raw(RawFn),
}

/// A named callable value. Cloning shares the implementation.
#[derive(Clone)]
pub struct Function {
    name: Rc<str>,
    kind: FunctionKind,
}

impl Function {
    pub fn native(
        name: impl Into<Rc<str>>,
        implementation: impl Fn(&[Value]) -> EvalResult + 'static,
    ) -> Self {
        Function {
            name: name.into(),
            kind: FunctionKind::Native(Rc::new(implementation)),
        }
    }

    pub fn raw(
        name: impl Into<Rc<str>>,
        implementation: impl Fn(&[NodeRef], &Rc<Namespace>, &ScopeRef) -> EvalResult + 'static,
    ) -> Self {
        Function {
            name: name.into(),
            kind: FunctionKind::Raw(Rc::new(implementation)),
        }
    }

    pub fn typed(function: TypedFunction) -> Self {
        Function {
            name: function.name.as_str().into(),
            kind: FunctionKind::Typed(Rc::new(function)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FunctionKind {
        &self.kind
    }

    #[inline]
    pub fn is_raw(&self) -> bool {
        matches!(self.kind, FunctionKind::Raw(_))
    }

    /// Call with evaluated arguments.
    pub fn call(&self, args: &[Value]) -> EvalResult {
        match &self.kind {
            FunctionKind::Typed(typed) => typed.call(args),
            FunctionKind::Native(native) => native(args),
            FunctionKind::Raw(_) => Err(EvalError::new(format!(
                "Function {} expects unevaluated arguments",
                self.name
            ))),
        }
    }

    /// Call with unevaluated argument nodes.
    pub fn call_raw(
        &self,
        args: &[NodeRef],
        namespace: &Rc<Namespace>,
        scope: &ScopeRef,
    ) -> EvalResult {
        match &self.kind {
            FunctionKind::Raw(raw) => raw(args, namespace, scope),
            _ => Err(EvalError::new(format!(
                "Function {} expects evaluated arguments",
                self.name
            ))),
        }
    }

    /// Identity comparison: two functions are equal only if they share an
    /// implementation.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        match (&self.kind, &other.kind) {
            (FunctionKind::Typed(a), FunctionKind::Typed(b)) => Rc::ptr_eq(a, b),
            (FunctionKind::Native(a), FunctionKind::Native(b)) => Rc::ptr_eq(a, b),
            (FunctionKind::Raw(a), FunctionKind::Raw(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            FunctionKind::Typed(_) => "typed",
            FunctionKind::Native(_) => "native",
            FunctionKind::Raw(_) => "raw",
        };
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

// Typed dispatch

#[derive(Clone, Debug, PartialEq)]
enum ParamType {
    Any,
    OneOf(Vec<String>),
}

impl ParamType {
    fn parse(text: &str) -> ParamType {
        let text = text.trim();
        if text.is_empty() || text == "any" {
            return ParamType::Any;
        }
        let alternatives: Vec<String> = text.split('|').map(|t| t.trim().to_owned()).collect();
        if alternatives.iter().any(|t| t == "any") {
            ParamType::Any
        } else {
            ParamType::OneOf(alternatives)
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::Any => true,
            ParamType::OneOf(types) => types.iter().any(|t| type_matches(t, value)),
        }
    }

    /// Exact match, or the first alternative reachable by one conversion.
    fn coerce(&self, value: &Value) -> Option<Value> {
        match self {
            ParamType::Any => Some(value.clone()),
            ParamType::OneOf(types) => {
                if self.accepts(value) {
                    return Some(value.clone());
                }
                types.iter().find_map(|t| convert(value, t))
            }
        }
    }
}

fn type_matches(pattern: &str, value: &Value) -> bool {
    match (pattern, value) {
        ("Matrix", Value::Array(_))
        | ("Node", Value::Node(_))
        | ("Function", Value::Function(_)) => true,
        _ => pattern == value.type_of(),
    }
}

/// The implicit conversions, at most one per argument.
fn convert(value: &Value, to: &str) -> Option<Value> {
    match (value, to) {
        (Value::Boolean(b), "number") => Some(Value::Number(f64::from(u8::from(*b)))),
        (Value::Null, "number") => Some(Value::Number(0.0)),
        (Value::Boolean(b), "BigNumber") => Some(Value::BigNumber(Decimal::from(u8::from(*b)))),
        (Value::Number(n), "BigNumber") => Decimal::try_from(*n).ok().map(Value::BigNumber),
        (Value::Number(n), "Complex") => Some(Value::Complex(Complex64::new(*n, 0.0))),
        (Value::Number(n), "Fraction") => Fraction::from_f64(*n).ok().map(Value::Fraction),
        (Value::BigNumber(d), "Complex") => d.to_f64().map(|n| Value::complex(n, 0.0)),
        (Value::Fraction(f), "Complex") => Some(Value::complex(f.to_f64(), 0.0)),
        _ => None,
    }
}

struct Signature {
    pattern: String,
    params: Vec<ParamType>,
    rest: Option<ParamType>,
    implementation: NativeFn,
}

impl Signature {
    fn parse(pattern: &str, implementation: NativeFn) -> Signature {
        let mut params = Vec::new();
        let mut rest = None;
        if !pattern.trim().is_empty() {
            for part in pattern.split(',') {
                match part.trim().strip_prefix("...") {
                    Some(variadic) => rest = Some(ParamType::parse(variadic)),
                    None => params.push(ParamType::parse(part)),
                }
            }
        }
        Signature {
            pattern: pattern.to_owned(),
            params,
            rest,
            implementation,
        }
    }

    fn accepts_count(&self, count: usize) -> bool {
        match self.rest {
            Some(_) => count > self.params.len(),
            None => count == self.params.len(),
        }
    }

    fn min_count(&self) -> usize {
        self.params.len() + usize::from(self.rest.is_some())
    }

    fn param(&self, i: usize) -> Option<&ParamType> {
        self.params.get(i).or(self.rest.as_ref())
    }

    fn matches_exact(&self, args: &[Value]) -> bool {
        self.accepts_count(args.len())
            && args
                .iter()
                .enumerate()
                .all(|(i, arg)| self.param(i).is_some_and(|p| p.accepts(arg)))
    }

    fn coerce(&self, args: &[Value]) -> Option<Vec<Value>> {
        if !self.accepts_count(args.len()) {
            return None;
        }
        args.iter()
            .enumerate()
            .map(|(i, arg)| self.param(i).and_then(|p| p.coerce(arg)))
            .collect()
    }
}

/// A function with several implementations selected by runtime argument
/// types.
///
/// Resolution runs in two passes: first the earliest signature whose every
/// parameter matches exactly, then the earliest signature reachable when
/// each argument may take one implicit conversion (`boolean` to `number`,
/// `number` to `BigNumber`, `Complex` or `Fraction`, `BigNumber` or
/// `Fraction` to `Complex`, `null` to `number`).
pub struct TypedFunction {
    name: String,
    signatures: Vec<Signature>,
}

impl TypedFunction {
    pub fn new(name: impl Into<String>) -> Self {
        TypedFunction {
            name: name.into(),
            signatures: Vec::new(),
        }
    }

    /// Add an implementation for a comma-separated type pattern. `any`
    /// matches every type, `A|B` either, and a trailing `...T` one or more
    /// further arguments of type `T`.
    #[must_use]
    pub fn signature(
        mut self,
        pattern: &str,
        implementation: impl Fn(&[Value]) -> EvalResult + 'static,
    ) -> Self {
        self.signatures
            .push(Signature::parse(pattern, Rc::new(implementation)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.signatures.iter().map(|s| s.pattern.as_str())
    }

    pub fn call(&self, args: &[Value]) -> EvalResult {
        if let Some(sig) = self.signatures.iter().find(|s| s.matches_exact(args)) {
            return (sig.implementation)(args);
        }
        for sig in &self.signatures {
            if let Some(converted) = sig.coerce(args) {
                tracing::trace!(
                    function = %self.name,
                    signature = %sig.pattern,
                    "converted arguments"
                );
                return (sig.implementation)(&converted);
            }
        }
        Err(self.mismatch(args))
    }

    fn mismatch(&self, args: &[Value]) -> EvalError {
        let got = args.len();
        if self.signatures.iter().any(|s| s.accepts_count(got)) {
            return no_matching_signature(&self.name, args);
        }
        let counts: Vec<usize> = self.signatures.iter().map(Signature::min_count).collect();
        let expected = counts
            .iter()
            .copied()
            .filter(|n| *n > got)
            .min()
            .or_else(|| counts.iter().copied().max())
            .unwrap_or(0);
        arity_mismatch(&self.name, expected, got)
    }
}

impl fmt::Debug for TypedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedFunction")
            .field("name", &self.name)
            .field("signatures", &self.patterns().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
