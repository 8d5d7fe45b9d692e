use super::*;

use crate::errors::EvalErrorKind;

#[test]
fn reduces_and_normalizes_sign() {
    let f = Fraction::new(4, -6).unwrap();
    assert_eq!((f.numerator(), f.denominator()), (-2, 3));
    assert_eq!(f.to_string(), "-2/3");
}

#[test]
fn zero_denominator() {
    assert_eq!(
        Fraction::new(1, 0).unwrap_err().kind,
        EvalErrorKind::DivisionByZero
    );
}

#[test]
fn arithmetic() {
    let third = Fraction::new(1, 3).unwrap();
    let half = Fraction::new(1, 2).unwrap();
    assert_eq!(third.checked_add(&half).unwrap(), Fraction::new(5, 6).unwrap());
    assert_eq!(third.checked_sub(&half).unwrap(), Fraction::new(-1, 6).unwrap());
    assert_eq!(third.checked_mul(&half).unwrap(), Fraction::new(1, 6).unwrap());
    assert_eq!(third.checked_div(&half).unwrap(), Fraction::new(2, 3).unwrap());
    assert!(third.checked_div(&Fraction::integer(0)).is_err());
}

#[test]
fn from_decimal_numbers() {
    assert_eq!(Fraction::from_f64(0.25).unwrap(), Fraction::new(1, 4).unwrap());
    assert_eq!(Fraction::from_f64(-1.5).unwrap(), Fraction::new(-3, 2).unwrap());
    assert_eq!(Fraction::from_f64(3.0).unwrap().to_string(), "3");
    assert!(Fraction::from_f64(f64::INFINITY).is_err());
}

#[test]
fn ordering() {
    assert!(Fraction::new(1, 3).unwrap() < Fraction::new(1, 2).unwrap());
    assert!(Fraction::new(-1, 2).unwrap() < Fraction::integer(0));
}
