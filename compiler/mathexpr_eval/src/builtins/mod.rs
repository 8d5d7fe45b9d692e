//! The standard namespace: operator kernels, functions and constants.
//!
//! Every operator node is bound to a function here by name (`a + b` calls
//! `add`). Kernels are typed functions; most also accept arrays and apply
//! element-wise.
//!
//! # Module Structure
//!
//! - [`helpers`]: argument extraction, element-wise lifting, tolerant comparison
//! - [`arithmetic`]: `add`, `subtract`, `multiply`, `divide`, `mod`, `pow` and unary signs
//! - [`matrix`]: the matrix product behind `multiply`
//! - [`compare`]: `equal`, `unequal`, `smaller`, `larger`, `smallerEq`, `largerEq`
//! - [`logic`]: lazy `and`/`or`, `not`, `xor`
//! - [`numeric`]: `sqrt`, `abs`, `exp`, `log`, trigonometry, rounding
//! - [`collections`]: `max`, `min`, `sum`, `size`, `range`, `subset`
//! - [`construct`]: constants, `typeOf` and kind conversions
//! - [`meta`]: `parse` and `evaluate`

mod arithmetic;
mod collections;
mod compare;
mod construct;
mod helpers;
mod logic;
mod matrix;
mod meta;
mod numeric;

pub(crate) use meta::parse_source;

use mathexpr_value::Namespace;

use crate::config::Config;

/// Build the namespace every engine starts from, with the configured
/// forbidden names applied.
pub fn standard_namespace(config: &Config) -> Namespace {
    let mut namespace = Namespace::new();
    construct::register_constants(&mut namespace);
    arithmetic::register(&mut namespace, config);
    compare::register(&mut namespace, config);
    logic::register(&mut namespace);
    numeric::register(&mut namespace, config);
    collections::register(&mut namespace, config);
    construct::register(&mut namespace);
    meta::register(&mut namespace);
    for name in &config.forbidden {
        namespace.forbid(name.as_str());
    }
    namespace
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
