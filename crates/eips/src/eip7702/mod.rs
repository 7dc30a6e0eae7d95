//! [EIP-7702] set-code authorizations.
//!
//! [EIP-7702]: https://eips.ethereum.org/EIPS/eip-7702

mod auth_list;
pub mod constants;

pub use auth_list::{Authorization, AuthorizationError, SignedAuthorization};
pub use constants::{authorization_list_gas, PER_AUTH_BASE_COST, PER_EMPTY_ACCOUNT_COST};
