use super::*;

#[test]
fn aliases_resolve_to_canonical_name() {
    assert_eq!(Unit::parse("inches").unwrap().name(), "inch");
    assert_eq!(Unit::parse("meters").unwrap().name(), "m");
    assert!(Unit::parse("parsec").is_none());
    assert!(!Unit::is_unit_name("foo"));
}

#[test]
fn valueless_display() {
    let cm = Unit::parse("cm").unwrap();
    assert_eq!(cm.value(), None);
    assert_eq!(cm.to_string(), "cm");
    assert_eq!(cm.scale(5.0).to_string(), "5 cm");
}

#[test]
fn conversion() {
    let two_inch = Unit::parse("inch").unwrap().with_value(2.0);
    let cm = Unit::parse("cm").unwrap();
    let converted = two_inch.to(&cm).unwrap();
    assert_eq!(converted.name(), "cm");
    assert!((converted.value().unwrap() - 5.08).abs() < 1e-12);
}

#[test]
fn cross_dimension_conversion_fails() {
    let kg = Unit::parse("kg").unwrap();
    let m = Unit::parse("m").unwrap();
    assert!(kg.to(&m).is_err());
    assert!(kg.checked_add(&m).is_err());
}

#[test]
fn addition_keeps_left_unit() {
    let m = Unit::parse("m").unwrap().with_value(1.0);
    let cm = Unit::parse("cm").unwrap().with_value(50.0);
    let sum = m.checked_add(&cm).unwrap();
    assert_eq!(sum.name(), "m");
    assert!((sum.value().unwrap() - 1.5).abs() < 1e-12);
}

#[test]
fn comparison_uses_si_magnitude() {
    let km = Unit::parse("km").unwrap().with_value(1.0);
    let m = Unit::parse("m").unwrap().with_value(999.0);
    assert!(km.compare(&m).unwrap() > 0.0);
}
