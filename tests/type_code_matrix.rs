//! Parameterized coverage of §6.1's type-code table: every export code
//! classifies as `Export`, `U` classifies as `Import`, and `?` only parses
//! (as an import) under lenient mode.

use objlink::{Class, TypeCode};
use rstest::rstest;

#[rstest]
#[case('T')]
#[case('D')]
#[case('B')]
#[case('R')]
#[case('G')]
#[case('S')]
#[case('A')]
#[case('C')]
#[case('W')]
#[case('V')]
fn export_codes_classify_as_export(#[case] code: char) {
    let ty = TypeCode::parse(code, false).unwrap();
    assert_eq!(ty.class(), Class::Export);
}

#[rstest]
#[case('U')]
fn undefined_code_classifies_as_import(#[case] code: char) {
    let ty = TypeCode::parse(code, false).unwrap();
    assert_eq!(ty.class(), Class::Import);
}

#[rstest]
#[case('Z')]
#[case('x')]
#[case('?')]
fn unrecognized_or_lenient_only_codes_are_rejected_strictly(#[case] code: char) {
    assert!(TypeCode::parse(code, false).is_err());
}

#[rstest]
#[case('t', 'T')]
#[case('d', 'D')]
#[case('u', 'U')]
#[case('w', 'W')]
fn lowercase_codes_upcase_under_lenient_mode(#[case] raw: char, #[case] expected: char) {
    let ty = TypeCode::parse(raw, true).unwrap();
    assert_eq!(ty.as_char(), expected);
}

#[rstest]
#[case('W')]
#[case('V')]
fn weak_codes_are_flagged_weak(#[case] code: char) {
    let ty = TypeCode::parse(code, false).unwrap();
    assert!(ty.is_weak());
}

#[rstest]
#[case('T')]
#[case('D')]
#[case('U')]
fn non_weak_codes_are_not_flagged_weak(#[case] code: char) {
    let ty = TypeCode::parse(code, false).unwrap();
    assert!(!ty.is_weak());
}
