#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use identity_service::config::EngineConfig;
use identity_service::config::JwtConfig;
use identity_service::config::TokenConfig;
use identity_service::domain::access::gate::AccessRequirements;
use identity_service::domain::clock::Clock;
use identity_service::domain::identity::errors::IdentityError;
use identity_service::domain::identity::errors::NotifierError;
use identity_service::domain::identity::models::CredentialRecord;
use identity_service::domain::identity::models::NormalizedEmail;
use identity_service::domain::identity::models::Principal;
use identity_service::domain::identity::models::PrincipalId;
use identity_service::domain::identity::ports::CredentialStore;
use identity_service::domain::identity::ports::Notifier;
use identity_service::domain::identity::ports::PrincipalStore;
use identity_service::domain::reset::errors::ResetError;
use identity_service::domain::reset::models::ResetTokenId;
use identity_service::domain::reset::models::ResetTokenRecord;
use identity_service::domain::reset::ports::ResetTokenStore;
use identity_service::domain::role::errors::RoleError;
use identity_service::domain::role::models::Role;
use identity_service::domain::role::models::RoleAssignment;
use identity_service::domain::role::models::RoleId;
use identity_service::domain::role::models::RoleKey;
use identity_service::domain::role::ports::RoleAssignmentStore;
use identity_service::domain::role::ports::RoleStore;
use identity_service::domain::token::errors::TokenError;
use identity_service::domain::token::models::RefreshTokenId;
use identity_service::domain::token::models::RefreshTokenRecord;
use identity_service::domain::token::ports::RefreshTokenStore;
use identity_service::AccessWorkflowService;
use identity_service::IdentityService;
use uuid::Uuid;

/// Engine wired against in-memory stores, a recording notifier, and a
/// settable clock.
pub struct TestHarness {
    pub identity: IdentityService,
    pub workflow: AccessWorkflowService,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<FixedClock>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_requirements(AccessRequirements::default())
    }

    pub fn with_requirements(requirements: AccessRequirements) -> Self {
        let config = EngineConfig {
            jwt: JwtConfig {
                secret: "integration-test-signing-secret-32b!".to_string(),
                access_token_ttl_minutes: 15,
            },
            tokens: TokenConfig::default(),
            access: requirements,
        };

        let store = Arc::new(MemoryStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let clock = Arc::new(FixedClock::new(Utc::now()));

        let identity = IdentityService::new(
            &config,
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            notifier.clone(),
            clock.clone(),
        );
        let workflow = AccessWorkflowService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            notifier.clone(),
            clock.clone(),
        );

        Self {
            identity,
            workflow,
            store,
            notifier,
            clock,
        }
    }

    /// Register a principal and walk it to a fully loginable state:
    /// email verified and admin approved.
    pub async fn register_ready(&self, email: &str, password: &str) -> Principal {
        let principal = self
            .identity
            .register(email, password, Some("Test".to_string()), None)
            .await
            .unwrap();
        let token = self.notifier.last_verification_token().unwrap();
        self.identity.verify_email_by_token(&token).await.unwrap();
        self.workflow
            .set_admin_approval(&principal.id, true)
            .await
            .unwrap();
        principal
    }
}

/// Deterministic clock; tests move time themselves.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    EmailVerification {
        email: String,
        token: String,
    },
    PasswordReset {
        email: String,
        token: String,
    },
    AdminsAccountVerified {
        admin_emails: Vec<String>,
        principal_email: String,
    },
    AccountApproved {
        email: String,
        name: Option<String>,
    },
}

/// Captures every outbound notification for assertion.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_verification_token(&self) -> Option<String> {
        self.sent().into_iter().rev().find_map(|n| match n {
            Notification::EmailVerification { token, .. } => Some(token),
            _ => None,
        })
    }

    pub fn last_reset_token(&self) -> Option<String> {
        self.sent().into_iter().rev().find_map(|n| match n {
            Notification::PasswordReset { token, .. } => Some(token),
            _ => None,
        })
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_email_verification(&self, email: &str, token: &str) -> Result<(), NotifierError> {
        self.sent.lock().unwrap().push(Notification::EmailVerification {
            email: email.to_string(),
            token: token.to_string(),
        });
        Ok(())
    }

    async fn send_password_reset(&self, email: &str, token: &str) -> Result<(), NotifierError> {
        self.sent.lock().unwrap().push(Notification::PasswordReset {
            email: email.to_string(),
            token: token.to_string(),
        });
        Ok(())
    }

    async fn send_admins_account_verified(
        &self,
        admin_emails: &[String],
        principal: &Principal,
    ) -> Result<(), NotifierError> {
        self.sent
            .lock()
            .unwrap()
            .push(Notification::AdminsAccountVerified {
                admin_emails: admin_emails.to_vec(),
                principal_email: principal.email.as_str().to_string(),
            });
        Ok(())
    }

    async fn send_account_approved(
        &self,
        email: &str,
        name: Option<&str>,
    ) -> Result<(), NotifierError> {
        self.sent.lock().unwrap().push(Notification::AccountApproved {
            email: email.to_string(),
            name: name.map(str::to_string),
        });
        Ok(())
    }
}

/// One struct backing every store port, so cross-entity queries (like the
/// active-admins join) can see all the tables.
#[derive(Default)]
pub struct MemoryStore {
    principals: Mutex<Vec<Principal>>,
    credentials: Mutex<Vec<CredentialRecord>>,
    refresh_tokens: Mutex<Vec<RefreshTokenRecord>>,
    reset_tokens: Mutex<Vec<ResetTokenRecord>>,
    roles: Mutex<Vec<Role>>,
    assignments: Mutex<Vec<RoleAssignment>>,
}

impl MemoryStore {
    pub fn credential_of(&self, id: &PrincipalId) -> Option<CredentialRecord> {
        self.credentials
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.principal_id == *id)
            .cloned()
    }

    pub fn refresh_token_count(&self) -> usize {
        self.refresh_tokens.lock().unwrap().len()
    }

    pub fn role_count(&self) -> usize {
        self.roles.lock().unwrap().len()
    }
}

#[async_trait]
impl PrincipalStore for MemoryStore {
    async fn insert(&self, principal: Principal) -> Result<Principal, IdentityError> {
        self.principals.lock().unwrap().push(principal.clone());
        Ok(principal)
    }

    async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, IdentityError> {
        Ok(self
            .principals
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == *id)
            .cloned())
    }

    async fn find_by_email(
        &self,
        email: &NormalizedEmail,
    ) -> Result<Option<Principal>, IdentityError> {
        Ok(self
            .principals
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.email == *email)
            .cloned())
    }

    async fn find_active_emails_with_role(
        &self,
        role: &RoleKey,
    ) -> Result<Vec<String>, IdentityError> {
        let role_id = match self
            .roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.key == *role)
        {
            Some(role) => role.id,
            None => return Ok(Vec::new()),
        };

        let holder_ids: Vec<PrincipalId> = self
            .assignments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.role_id == role_id)
            .map(|a| a.principal_id)
            .collect();

        let credentials = self.credentials.lock().unwrap();
        let principals = self.principals.lock().unwrap();
        let emails = holder_ids
            .iter()
            .filter(|id| {
                credentials
                    .iter()
                    .any(|c| c.principal_id == **id && c.is_active)
            })
            .filter_map(|id| principals.iter().find(|p| p.id == *id))
            .map(|p| p.email.as_str().to_string())
            .collect();
        Ok(emails)
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert(&self, record: CredentialRecord) -> Result<CredentialRecord, IdentityError> {
        self.credentials.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_by_principal(
        &self,
        id: &PrincipalId,
    ) -> Result<Option<CredentialRecord>, IdentityError> {
        Ok(self.credential_of(id))
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<CredentialRecord>, IdentityError> {
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.email_verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn update_password_hash(
        &self,
        id: &PrincipalId,
        password_hash: &str,
    ) -> Result<(), IdentityError> {
        for record in self.credentials.lock().unwrap().iter_mut() {
            if record.principal_id == *id {
                record.password_hash = password_hash.to_string();
            }
        }
        Ok(())
    }

    async fn set_email_verified(
        &self,
        id: &PrincipalId,
        verified_at: DateTime<Utc>,
    ) -> Result<(), IdentityError> {
        for record in self.credentials.lock().unwrap().iter_mut() {
            if record.principal_id == *id {
                record.email_verified_at = Some(verified_at);
                record.email_verification_token = None;
            }
        }
        Ok(())
    }

    async fn set_admin_approved(
        &self,
        id: &PrincipalId,
        approved_at: Option<DateTime<Utc>>,
    ) -> Result<(), IdentityError> {
        for record in self.credentials.lock().unwrap().iter_mut() {
            if record.principal_id == *id {
                record.admin_approved_at = approved_at;
            }
        }
        Ok(())
    }

    async fn set_active(&self, id: &PrincipalId, active: bool) -> Result<(), IdentityError> {
        for record in self.credentials.lock().unwrap().iter_mut() {
            if record.principal_id == *id {
                record.is_active = active;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn insert(&self, record: RefreshTokenRecord) -> Result<(), TokenError> {
        self.refresh_tokens.lock().unwrap().push(record);
        Ok(())
    }

    async fn find_recent_active(
        &self,
        limit: usize,
    ) -> Result<Vec<RefreshTokenRecord>, TokenError> {
        // Insertion order stands in for created_at recency
        Ok(self
            .refresh_tokens
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| r.revoked_at.is_none())
            .take(limit)
            .cloned()
            .collect())
    }

    async fn revoke(
        &self,
        id: &RefreshTokenId,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, TokenError> {
        for record in self.refresh_tokens.lock().unwrap().iter_mut() {
            if record.id == *id && record.revoked_at.is_none() {
                record.revoked_at = Some(revoked_at);
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[async_trait]
impl ResetTokenStore for MemoryStore {
    async fn insert(&self, record: ResetTokenRecord) -> Result<(), ResetError> {
        self.reset_tokens.lock().unwrap().push(record);
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ResetTokenRecord>, ResetError> {
        Ok(self
            .reset_tokens
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.token == token)
            .cloned())
    }

    async fn mark_used(
        &self,
        id: &ResetTokenId,
        used_at: DateTime<Utc>,
    ) -> Result<bool, ResetError> {
        for record in self.reset_tokens.lock().unwrap().iter_mut() {
            if record.id == *id && record.used_at.is_none() {
                record.used_at = Some(used_at);
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn insert(&self, role: Role) -> Result<Role, RoleError> {
        self.roles.lock().unwrap().push(role.clone());
        Ok(role)
    }

    async fn update_description(
        &self,
        id: &RoleId,
        description: Option<String>,
    ) -> Result<(), RoleError> {
        for role in self.roles.lock().unwrap().iter_mut() {
            if role.id == *id {
                role.description = description.clone();
            }
        }
        Ok(())
    }

    async fn find_by_key(&self, key: &RoleKey) -> Result<Option<Role>, RoleError> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.key == *key)
            .cloned())
    }

    async fn find_by_keys(&self, keys: &[RoleKey]) -> Result<Vec<Role>, RoleError> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .filter(|r| keys.contains(&r.key))
            .cloned()
            .collect())
    }

    async fn find_by_ids(&self, ids: &[RoleId]) -> Result<Vec<Role>, RoleError> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Role>, RoleError> {
        Ok(self.roles.lock().unwrap().clone())
    }

    async fn delete(&self, id: &RoleId) -> Result<(), RoleError> {
        self.roles.lock().unwrap().retain(|r| r.id != *id);
        Ok(())
    }
}

#[async_trait]
impl RoleAssignmentStore for MemoryStore {
    async fn find_by_principal(
        &self,
        principal_id: &PrincipalId,
    ) -> Result<Vec<RoleAssignment>, RoleError> {
        Ok(self
            .assignments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.principal_id == *principal_id)
            .cloned()
            .collect())
    }

    async fn replace_for_principal(
        &self,
        principal_id: &PrincipalId,
        role_ids: &[RoleId],
    ) -> Result<(), RoleError> {
        let mut assignments = self.assignments.lock().unwrap();
        assignments.retain(|a| a.principal_id != *principal_id);
        for role_id in role_ids {
            assignments.push(RoleAssignment {
                id: Uuid::new_v4(),
                principal_id: *principal_id,
                role_id: *role_id,
            });
        }
        Ok(())
    }

    async fn delete_by_role(&self, role_id: &RoleId) -> Result<(), RoleError> {
        self.assignments
            .lock()
            .unwrap()
            .retain(|a| a.role_id != *role_id);
        Ok(())
    }
}
