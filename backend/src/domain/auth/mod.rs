//! Authentication primitives: signed identity tokens and password
//! credential handling.

mod password;
mod token;

pub use password::{
    hash_password, hash_reset_token, issue_reset_token, verify_password, ResetToken, BCRYPT_COST,
    RESET_TOKEN_TTL,
};
pub use token::{TokenError, TokenService, TOKEN_TTL};
