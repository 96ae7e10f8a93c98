use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::{Claims, Role, TokenKind};
use crate::error::AppError;

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as usize)
        .unwrap_or_default()
}

pub fn encode_token(keys: &JwtKeys, claims: &Claims) -> Result<String, AppError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
        .map_err(|err| AppError::internal(format!("Token encoding failed: {err}")))
}

/// Decodes and checks signature, expiry and that the token is of `kind`.
pub fn decode_token(keys: &JwtKeys, token: &str, kind: TokenKind) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let claims = decode::<Claims>(token, &keys.dec, &validation)?.claims;
    if claims.kind != kind {
        return Err(AppError::authentication("Invalid token type"));
    }
    Ok(claims)
}

pub fn make_claims(
    admin_id: &Uuid,
    session_id: &Uuid,
    role: Role,
    kind: TokenKind,
    ttl_secs: usize,
) -> Result<Claims, AppError> {
    let iat = now_unix();
    let exp = iat
        .checked_add(ttl_secs)
        .ok_or_else(|| AppError::internal("Token lifetime out of range"))?;
    Ok(Claims {
        sub: admin_id.to_string(),
        sid: session_id.to_string(),
        role,
        kind,
        jti: Uuid::new_v4().to_string(),
        iat,
        exp,
    })
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!(error = %err, "jwt rejected");
        AppError::authentication("Invalid or expired token")
    }
}
