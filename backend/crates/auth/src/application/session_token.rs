//! Session Token
//!
//! Cookie value `<session_id>.<base64url HMAC-SHA256(session_id)>`.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

fn mac_for(secret: &[u8; 32], session_id: &str) -> AuthResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AuthError::Internal(format!("HMAC key rejected: {e}")))?;
    mac.update(session_id.as_bytes());
    Ok(mac)
}

/// Generate signed session token
pub fn sign(secret: &[u8; 32], session_id: Uuid) -> AuthResult<String> {
    let session_id = session_id.to_string();
    let signature = mac_for(secret, &session_id)?.finalize().into_bytes();
    Ok(format!("{}.{}", session_id, URL_SAFE_NO_PAD.encode(signature)))
}

/// Parse and verify session token
pub fn verify(secret: &[u8; 32], token: &str) -> AuthResult<Uuid> {
    let (session_id, signature_b64) = token.split_once('.').ok_or(AuthError::SessionInvalid)?;

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AuthError::SessionInvalid)?;

    mac_for(secret, session_id)?
        .verify_slice(&signature)
        .map_err(|_| AuthError::SessionInvalid)?;

    session_id.parse().map_err(|_| AuthError::SessionInvalid)
}
