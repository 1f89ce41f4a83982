/// Hex length of the random identifier (128 bits).
pub const TOKEN_ID_HEX_LEN: usize = 32;
/// Hex length of an HMAC-SHA256 tag.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// A `<id>.<signature>` token where `signature = HMAC-SHA256(secret, id)`.
///
/// `parse` only checks the shape; the signature itself is checked by
/// [`ActivationTokenManager::verify_signed_token`](crate::activation::ActivationTokenManager::verify_signed_token).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    id: String,
    signature: String,
}

impl SignedToken {
    pub(crate) fn new(id: String, signature: String) -> Self {
        Self { id, signature }
    }

    pub fn parse(token: &str) -> Result<SignedToken, String> {
        let (id, signature) = token
            .split_once('.')
            .ok_or_else(|| "The signed token has no separator".to_string())?;
        if is_lower_hex(id, TOKEN_ID_HEX_LEN) && is_lower_hex(signature, SIGNATURE_HEX_LEN) {
            Ok(Self::new(id.to_string(), signature.to_string()))
        } else {
            Err("The signed token format is not valid".to_string())
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }
}

fn is_lower_hex(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

impl std::fmt::Display for SignedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.id, self.signature)
    }
}
