use std::sync::Arc;

use auth::CredentialHasher;
use auth::JwtHandler;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::identity::models::Principal;
use crate::domain::role::models::RoleKey;
use crate::domain::token::errors::TokenError;
use crate::domain::token::models::AccessClaims;
use crate::domain::token::models::IssuedTokens;
use crate::domain::token::models::RefreshTokenId;
use crate::domain::token::models::RefreshTokenRecord;
use crate::domain::token::ports::RefreshTokenStore;

/// Mints access/refresh token pairs.
///
/// The access token is a signed, short-lived JWT. The refresh token is an
/// opaque 256-bit secret returned to the caller exactly once; only its
/// Argon2 hash reaches the store.
pub struct TokenIssuer {
    jwt: JwtHandler,
    hasher: CredentialHasher,
    store: Arc<dyn RefreshTokenStore>,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(
        jwt_secret: &[u8],
        access_token_ttl: Duration,
        refresh_token_ttl: Duration,
        store: Arc<dyn RefreshTokenStore>,
    ) -> Self {
        Self {
            jwt: JwtHandler::new(jwt_secret),
            hasher: CredentialHasher::new(),
            store,
            access_token_ttl,
            refresh_token_ttl,
        }
    }

    /// Issue a fresh token pair for a principal.
    ///
    /// Always inserts a brand-new ledger record; rotation of the consumed
    /// token is the caller's responsibility.
    pub async fn issue(
        &self,
        principal: &Principal,
        roles: &[RoleKey],
        now: DateTime<Utc>,
    ) -> Result<IssuedTokens, TokenError> {
        let claims = AccessClaims {
            sub: principal.id.to_string(),
            email: principal.email.as_str().to_string(),
            roles: roles.iter().map(|key| key.as_str().to_string()).collect(),
            iat: now.timestamp(),
            exp: (now + self.access_token_ttl).timestamp(),
        };
        let access_token = self.jwt.encode(&claims)?;

        let refresh_token = auth::secret::generate();
        let token_hash = self.hasher.hash(&refresh_token)?;
        let expires_at = now + self.refresh_token_ttl;

        self.store
            .insert(RefreshTokenRecord {
                id: RefreshTokenId::new(),
                principal_id: principal.id,
                token_hash,
                expires_at,
                revoked_at: None,
                created_at: now,
            })
            .await?;

        Ok(IssuedTokens {
            access_token,
            access_token_expires_in: self.access_token_ttl.num_seconds(),
            refresh_token,
            refresh_token_expires_at: expires_at,
        })
    }
}
