// ABOUTME: Service account token module
// ABOUTME: Generation, hashing, authentication, and issuance of service account tokens

pub mod authenticator;
pub mod codec;
pub mod entropy;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use authenticator::TokenAuthenticator;
pub use codec::{split_token, TokenCodec};
pub use entropy::{EntropySource, SystemEntropy};
pub use error::{AuthError, CodecError, RejectionReason, TokenServiceError};
pub use service::TokenService;
pub use types::{AuthenticatedToken, GeneratedToken, IssuedToken};
