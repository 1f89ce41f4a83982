mod activation_email;
mod signed_token;

pub use activation_email::ActivationEmail;
pub use signed_token::{SignedToken, SIGNATURE_HEX_LEN, TOKEN_ID_HEX_LEN};
