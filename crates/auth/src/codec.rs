//! Session token decoding.
//!
//! Tokens are three dot-separated base64url segments (`header.payload.signature`).
//! Codecs turn the payload into typed [`Claims`]; expiry is deliberately *not*
//! enforced here so the guard can tell an expired token from a malformed one.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::{Claims, TokenPayload};

/// Why a token could not be turned into claims.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeFailure {
    /// Not three segments, bad base64url, bad UTF-8 or an unreadable header.
    #[error("malformed token encoding: {0}")]
    Encoding(String),

    #[error("token signature does not verify")]
    Signature,

    /// The payload decoded but is not the expected JSON shape.
    #[error("invalid token payload: {0}")]
    Payload(String),

    #[error("expiry timestamp {0} is out of range")]
    TimestampOutOfRange(f64),
}

impl From<jsonwebtoken::errors::Error> for DecodeFailure {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => Self::Signature,
            ErrorKind::Json(e) => Self::Payload(e.to_string()),
            _ => Self::Encoding(err.to_string()),
        }
    }
}

/// Decodes an opaque bearer token into claims.
pub trait TokenCodec: Send + Sync {
    fn decode(&self, token: &str) -> Result<Claims, DecodeFailure>;
}

/// Claims checks shared by both codecs: only structure is validated here.
fn structural_validation(mut validation: Validation) -> Validation {
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

fn decode_with(token: &str, key: &DecodingKey, validation: &Validation) -> Result<Claims, DecodeFailure> {
    let data = jsonwebtoken::decode::<TokenPayload>(token, key, validation)?;
    Claims::try_from(data.claims)
}

/// Reads the payload segment without verifying the signature.
///
/// This mirrors what a browser client can do with a token it was handed: it
/// has no key, so it can only trust the token as far as routing decisions go.
/// Servers holding the signing secret should prefer [`Hs256Codec`].
pub struct PayloadCodec {
    key: DecodingKey,
    validation: Validation,
}

impl PayloadCodec {
    pub fn new() -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();

        Self {
            key: DecodingKey::from_secret(&[]),
            validation: structural_validation(validation),
        }
    }
}

impl Default for PayloadCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCodec for PayloadCodec {
    fn decode(&self, token: &str) -> Result<Claims, DecodeFailure> {
        decode_with(token, &self.key, &self.validation)
    }
}

/// Verifies an HS256 signature with a shared secret before reading claims.
pub struct Hs256Codec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Hs256Codec {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: structural_validation(Validation::new(Algorithm::HS256)),
        }
    }

    /// Mint a signed token for `payload`.
    pub fn encode(&self, payload: &TokenPayload) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), payload, &self.encoding_key)
    }
}

impl TokenCodec for Hs256Codec {
    fn decode(&self, token: &str) -> Result<Claims, DecodeFailure> {
        decode_with(token, &self.decoding_key, &self.validation)
    }
}
