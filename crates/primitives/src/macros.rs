/// Constructs a [`B256`](crate::B256) from a hex literal at compile time.
#[macro_export]
macro_rules! b256 {
    ($hex:literal) => {
        $crate::B256::new($crate::hex_literal::hex!($hex))
    };
}

/// Constructs a [`B64`](crate::B64) from a hex literal at compile time.
#[macro_export]
macro_rules! b64 {
    ($hex:literal) => {
        $crate::B64::new($crate::hex_literal::hex!($hex))
    };
}

/// Constructs an [`Address`](crate::Address) from a hex literal at compile
/// time.
#[macro_export]
macro_rules! address {
    ($hex:literal) => {
        $crate::Address::new($crate::hex_literal::hex!($hex))
    };
}

/// Constructs a [`FixedBytes`](crate::FixedBytes) of inferred width from a
/// hex literal at compile time.
#[macro_export]
macro_rules! fixed_bytes {
    ($hex:literal) => {
        $crate::FixedBytes::new($crate::hex_literal::hex!($hex))
    };
}
