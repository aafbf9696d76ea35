//! Size constraint semantics

use reslint::constraint::ConstraintError;
use reslint::SizeConstraint;

fn range(min: i64, max: i64) -> SizeConstraint {
    SizeConstraint::range(min, max).unwrap()
}

fn stepped(min: i64, max: i64, multiple: i64) -> SizeConstraint {
    SizeConstraint::range_with_multiple(min, max, multiple).unwrap()
}

#[test]
fn test_nested_ranges_with_multiples() {
    assert!(stepped(10, 100, 2).contains(&stepped(20, 40, 4)));
    assert!(!stepped(10, 100, 4).contains(&stepped(20, 40, 2)));
    assert!(!stepped(10, 100, 2).contains(&range(20, 40)));
    assert!(range(1, 100).contains(&stepped(20, 40, 4)));
    assert!(!stepped(30, 100, 2).contains(&stepped(20, 40, 2)));
    assert!(!stepped(10, 30, 2).contains(&stepped(20, 40, 2)));
}

#[test]
fn test_multiples() {
    let two = SizeConstraint::multiple(2).unwrap();
    assert!(two.contains(&SizeConstraint::multiple(6).unwrap()));
    assert!(!SizeConstraint::multiple(4).unwrap().contains(&SizeConstraint::multiple(6).unwrap()));
    assert!(!range(1, 5).contains(&two));
}

#[test]
fn test_exactly_is_a_degenerate_range() {
    let exact = SizeConstraint::exactly(3).unwrap();
    assert_eq!(exact, range(3, 3));
    assert!(range(1, 5).contains(&exact));
    assert!(!exact.contains(&range(1, 5)));
    assert!(exact.is_satisfied_by(3));
    assert!(!exact.is_satisfied_by(4));
}

#[test]
fn test_open_bounds_never_mix_with_ranges() {
    let at_least = SizeConstraint::at_least(2).unwrap();
    let at_most = SizeConstraint::at_most(8).unwrap();
    // Every value of 3..=5 satisfies both, yet neither contains the range
    assert!(!at_least.contains(&range(3, 5)));
    assert!(!at_most.contains(&range(3, 5)));
    assert!(!range(0, 100).contains(&at_least));
    assert!(!at_least.contains(&at_most));
}

#[test]
fn test_describe_and_violations() {
    assert_eq!(range(1, 5).describe(), "Size must be at least 1 and at most 5");
    assert_eq!(
        stepped(20, 40, 2).describe_value(41),
        "Expected Size ≤ 40 (was 41)"
    );
    assert_eq!(
        stepped(20, 40, 4).describe_value(30),
        "Expected Size to be a multiple of 4 (was 30 and should be either 28 or 32)"
    );
    assert_eq!(
        stepped(20, 40, 4).describe_value(32),
        "Size must be at least 20 and at most 40 and a multiple of 4 (was 32)"
    );
}

#[test]
fn test_invalid_constraints() {
    assert!(matches!(
        SizeConstraint::range(3, 1),
        Err(ConstraintError::InvertedRange { min: 3, max: 1 })
    ));
    assert!(SizeConstraint::range_with_multiple(1, 3, 0).is_err());
    assert!(SizeConstraint::exactly(-2).is_err());
}
