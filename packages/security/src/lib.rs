// ABOUTME: Service account token security for Warden
// ABOUTME: Token generation, salted digests, authentication, and revocation

pub mod tokens;

// Re-export main types for convenience
pub use tokens::{
    AuthError, AuthenticatedToken, CodecError, EntropySource, IssuedToken, RejectionReason,
    SystemEntropy, TokenAuthenticator, TokenCodec, TokenService, TokenServiceError,
};
