//! Integer decode semantics: every conversion is overflow-checked, never
//! silently wrapping.

use voltic_primitives::{I16, I256, I8, U256, U64};

#[test]
fn u256_from_strings() {
    assert_eq!("1000000000".parse::<U256>().unwrap(), U256::from(1_000_000_000u64));
    assert_eq!("0x3b9aca00".parse::<U256>().unwrap(), U256::from(1_000_000_000u64));
    assert!("not a number".parse::<U256>().is_err());
}

#[test]
fn u256_from_be_bytes_checks_width() {
    assert_eq!(U256::try_from_be_slice(&[0x01, 0x00]), Some(U256::from(256u64)));
    // a 33-byte slice cannot fit
    assert_eq!(U256::try_from_be_slice(&[0xffu8; 33]), None);
}

#[test]
fn narrowing_is_checked() {
    let big = U256::from(u128::MAX);
    assert!(u64::try_from(big).is_err());
    assert_eq!(u128::try_from(big).unwrap(), u128::MAX);

    let small = U64::from(42u64);
    assert_eq!(u64::try_from(small).unwrap(), 42);
}

#[test]
fn pow_is_the_documented_wrapping_exception() {
    // pow wraps modulo 2^256; checked_pow reports the overflow
    let base = U256::from(2u64);
    assert_eq!(base.pow(U256::from(256u64)), U256::ZERO);
    assert_eq!(base.checked_pow(U256::from(256u64)), None);
    assert_eq!(base.checked_pow(U256::from(255u64)), Some(base.pow(U256::from(255u64))));
}

#[test]
fn signed_conversions_are_checked() {
    assert!(I256::try_from(U256::MAX).is_err());
    assert_eq!(I256::try_from(U256::from(7u64)).unwrap(), I256::try_from(7i64).unwrap());
    assert_eq!(I256::try_from(-1i64).unwrap().to_be_bytes(), [0xffu8; 32]);
}

#[test]
fn every_signed_width_is_distinct() {
    // each width enforces its own domain
    assert!(I8::try_from(1_000i64).is_err());
    assert!(I16::try_from(1_000i64).is_ok());
    assert_eq!(I8::MIN.to_string(), "-128");
    assert_eq!(I16::MIN.to_string(), "-32768");
}
