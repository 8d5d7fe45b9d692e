//! Matrix product over nested arrays.

use mathexpr_value::errors::dimension_mismatch;
use mathexpr_value::{EvalResult, TypedFunction, Value};

/// `a * b` for two arrays.
///
/// Two vectors give their dot product, a matrix and a vector give a vector,
/// two matrices give a matrix. Element products and sums go through `mul`
/// and `add`, so every scalar kind with those signatures works.
pub(super) fn matrix_product(
    mul: &TypedFunction,
    add: &TypedFunction,
    a: &Value,
    b: &Value,
) -> EvalResult {
    let (Value::Array(a), Value::Array(b)) = (a, b) else {
        return mul.call(&[a.clone(), b.clone()]);
    };
    match (rows(a), rows(b)) {
        (None, None) => dot(mul, add, a, b),
        (Some(a_rows), None) => a_rows
            .iter()
            .map(|row| dot(mul, add, row, b))
            .collect::<EvalResult<Vec<_>>>()
            .map(Value::array),
        (None, Some(b_rows)) => columns(&b_rows)?
            .iter()
            .map(|column| dot(mul, add, a, column))
            .collect::<EvalResult<Vec<_>>>()
            .map(Value::array),
        (Some(a_rows), Some(b_rows)) => {
            let b_columns = columns(&b_rows)?;
            a_rows
                .iter()
                .map(|row| {
                    b_columns
                        .iter()
                        .map(|column| dot(mul, add, row, column))
                        .collect::<EvalResult<Vec<_>>>()
                        .map(Value::array)
                })
                .collect::<EvalResult<Vec<_>>>()
                .map(Value::array)
        }
    }
}

/// Rows of a two-dimensional array; `None` for a vector.
fn rows(items: &[Value]) -> Option<Vec<&[Value]>> {
    if !matches!(items.first(), Some(Value::Array(_))) {
        return None;
    }
    items
        .iter()
        .map(|item| match item {
            Value::Array(row) => Some(row.as_slice()),
            _ => None,
        })
        .collect()
}

fn columns(rows: &[&[Value]]) -> EvalResult<Vec<Vec<Value>>> {
    let width = rows.first().map_or(0, |row| row.len());
    if let Some(row) = rows.iter().find(|row| row.len() != width) {
        return Err(dimension_mismatch(width, row.len()));
    }
    Ok((0..width)
        .map(|j| rows.iter().map(|row| row[j].clone()).collect())
        .collect())
}

fn dot(mul: &TypedFunction, add: &TypedFunction, xs: &[Value], ys: &[Value]) -> EvalResult {
    if xs.len() != ys.len() {
        return Err(dimension_mismatch(xs.len(), ys.len()));
    }
    let mut total: Option<Value> = None;
    for (x, y) in xs.iter().zip(ys) {
        let product = mul.call(&[x.clone(), y.clone()])?;
        total = Some(match total {
            Some(sum) => add.call(&[sum, product])?,
            None => product,
        });
    }
    Ok(total.unwrap_or(Value::Number(0.0)))
}
