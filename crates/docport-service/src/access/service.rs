//! Access orchestration: gate chain, view recording, token minting.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use docport_auth::gate::{CredentialBundle, DenialCode, GateOutcome, PolicyEvaluator};
use docport_auth::token::TokenIssuer;
use docport_core::error::AppError;
use docport_core::events::AccessEvent;
use docport_core::result::AppResult;
use docport_core::traits::CaptchaVerifier;
use docport_entity::audit::{AccessAction, AccessAttempt, AccessOutcome, NdaAcceptance, PasswordFailure};
use docport_entity::document::DocumentRef;
use docport_entity::link::ShareLink;
use docport_store::{LinkStore, StoreManager, ViewOutcome};

use crate::audit::AuditLogger;
use crate::context::RequestContext;
use crate::notify::NotificationDispatcher;

use super::outcome::{AccessEvaluation, GrantedAccess};

/// Orchestrates the two access paths for a share link.
///
/// The no-credential GET path probes the gate chain and, on an open link,
/// consumes a view. The credentialed POST path checks every enabled
/// factor, consumes a view, and mints a bearer token. All side effects
/// happen here; the gate chain itself stays pure.
#[derive(Debug, Clone)]
pub struct AccessService {
    /// The link store.
    store: StoreManager,
    /// The pure gate chain.
    evaluator: PolicyEvaluator,
    /// Token minting for granted credentialed sessions.
    issuer: TokenIssuer,
    /// Captcha verification backend, consulted only on the granted path.
    captcha: Arc<dyn CaptchaVerifier>,
    /// Best-effort audit appends.
    audit: AuditLogger,
    /// Fire-and-forget access notifications.
    notifications: NotificationDispatcher,
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(
        store: StoreManager,
        evaluator: PolicyEvaluator,
        issuer: TokenIssuer,
        captcha: Arc<dyn CaptchaVerifier>,
        audit: AuditLogger,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            store,
            evaluator,
            issuer,
            captcha,
            audit,
            notifications,
        }
    }

    /// The no-credential evaluation path (GET).
    ///
    /// Links with credential factors get a requirement listing and no
    /// side effects. Open links consume a view and return the document.
    pub async fn evaluate(
        &self,
        link_id: Uuid,
        ctx: &RequestContext,
    ) -> AppResult<AccessEvaluation> {
        let (link, document) = self.load_pair(link_id).await?;

        match self.evaluator.evaluate(&link, None, ctx.request_time)? {
            GateOutcome::NeedsCredentials(req) => {
                let attempt = self.attempt(
                    &link,
                    ctx,
                    None,
                    AccessAction::View,
                    AccessOutcome::RequiresCredentials,
                );
                self.audit.access_attempt(&attempt).await;
                Ok(AccessEvaluation::NeedsCredentials(req))
            }
            GateOutcome::Denied(code) => {
                Ok(self.deny(&link, ctx, None, AccessAction::View, code).await)
            }
            GateOutcome::Granted(_) => {
                self.grant(link, document, ctx, None, AccessAction::View, false)
                    .await
            }
        }
    }

    /// The credentialed grant path (POST).
    ///
    /// All enabled factors must pass. A granted session consumes a view
    /// and receives a minted bearer token scoped to this link.
    pub async fn authenticate(
        &self,
        link_id: Uuid,
        credentials: &CredentialBundle,
        ctx: &RequestContext,
    ) -> AppResult<AccessEvaluation> {
        let (link, document) = self.load_pair(link_id).await?;
        let email = credentials.normalized_email();

        let mut outcome = self
            .evaluator
            .evaluate(&link, Some(credentials), ctx.request_time)?;

        // The gate chain only checks captcha token presence; the
        // provider-backed verification happens here, on the granted path.
        if matches!(outcome, GateOutcome::Granted(_)) && link.require_captcha {
            let token = credentials.captcha_token.as_deref().unwrap_or("");
            if !self.captcha.verify(token).await? {
                outcome = GateOutcome::Denied(DenialCode::CaptchaRequired);
            }
        }

        match outcome {
            // The evaluator only probes when no bundle is supplied; with a
            // bundle every enabled factor resolves to Granted or Denied, so
            // this arm never runs on this path.
            GateOutcome::NeedsCredentials(req) => Ok(AccessEvaluation::NeedsCredentials(req)),
            GateOutcome::Denied(code) => {
                if code == DenialCode::InvalidPassword {
                    self.audit
                        .password_failure(&PasswordFailure {
                            id: Uuid::new_v4(),
                            link_id: link.id,
                            email: email.clone(),
                            visitor_id: ctx.visitor_id(email.as_deref()),
                            occurred_at: Utc::now(),
                        })
                        .await;
                }
                Ok(self
                    .deny(&link, ctx, email, AccessAction::AuthenticatedView, code)
                    .await)
            }
            GateOutcome::Granted(_) => {
                if link.require_nda {
                    self.audit
                        .nda_acceptance(&NdaAcceptance {
                            id: Uuid::new_v4(),
                            link_id: link.id,
                            email: email.clone(),
                            visitor_id: ctx.visitor_id(email.as_deref()),
                            occurred_at: Utc::now(),
                        })
                        .await;
                    if link.notify_on_access {
                        self.notifications.dispatch(AccessEvent::NdaAccepted {
                            link_id: link.id,
                            email: email.clone(),
                            occurred_at: Utc::now(),
                        });
                    }
                }
                self.grant(
                    link,
                    document,
                    ctx,
                    email,
                    AccessAction::AuthenticatedView,
                    true,
                )
                .await
            }
        }
    }

    /// Loads the link and its backing document.
    ///
    /// A missing link and a missing document produce the same error, so
    /// callers cannot distinguish dangling links from absent ones.
    async fn load_pair(&self, link_id: Uuid) -> AppResult<(ShareLink, DocumentRef)> {
        let link = self
            .store
            .find_link(link_id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found"))?;
        let document = self
            .store
            .find_document(link.document_id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found"))?;
        Ok((link, document))
    }

    /// Consumes a view and assembles the granted session.
    async fn grant(
        &self,
        link: ShareLink,
        document: DocumentRef,
        ctx: &RequestContext,
        email: Option<String>,
        action: AccessAction,
        mint_token: bool,
    ) -> AppResult<AccessEvaluation> {
        let visit = ctx.visit(email.as_deref());

        // The quota decision belongs to the store: the gate chain already
        // passed, but a concurrent grant may have consumed the last slot.
        let access_count = match self.store.record_view(link.id, &visit).await? {
            ViewOutcome::Recorded { access_count } => access_count,
            ViewOutcome::LimitReached => {
                return Ok(self
                    .deny(&link, ctx, email, action, DenialCode::MaxAccessReached)
                    .await);
            }
        };

        let token = if mint_token {
            let token = self.issuer.issue(&link, email.clone());
            self.store.insert_token(&token).await?;
            Some(token)
        } else {
            None
        };

        let attempt = self.attempt(&link, ctx, email.clone(), action, AccessOutcome::Granted);
        self.audit.access_attempt(&attempt).await;

        if link.notify_on_access {
            self.notifications.dispatch(AccessEvent::Granted {
                link_id: link.id,
                document_id: link.document_id,
                visitor_id: visit.visitor_id.clone(),
                email,
                country: visit.country.clone(),
                access_count,
                occurred_at: Utc::now(),
            });
        }

        // Re-read so the returned analytics include this grant.
        let link = self.store.find_link(link.id).await?.unwrap_or(link);

        Ok(AccessEvaluation::Granted(Box::new(GrantedAccess {
            link,
            document,
            token,
        })))
    }

    /// Records and reports a denial.
    async fn deny(
        &self,
        link: &ShareLink,
        ctx: &RequestContext,
        email: Option<String>,
        action: AccessAction,
        code: DenialCode,
    ) -> AccessEvaluation {
        let visitor_id = ctx.visitor_id(email.as_deref());
        let attempt = self.attempt(
            link,
            ctx,
            email,
            action,
            AccessOutcome::Denied(code.as_str().to_string()),
        );
        self.audit.access_attempt(&attempt).await;

        if link.notify_on_access {
            self.notifications.dispatch(AccessEvent::Denied {
                link_id: link.id,
                code: code.as_str().to_string(),
                visitor_id,
                occurred_at: Utc::now(),
            });
        }

        AccessEvaluation::Denied(code)
    }

    /// Builds one access attempt record.
    fn attempt(
        &self,
        link: &ShareLink,
        ctx: &RequestContext,
        email: Option<String>,
        action: AccessAction,
        outcome: AccessOutcome,
    ) -> AccessAttempt {
        AccessAttempt {
            id: Uuid::new_v4(),
            link_id: link.id,
            document_id: link.document_id,
            visitor_id: ctx.visitor_id(email.as_deref()),
            email,
            country: ctx.country(),
            device: ctx.device().as_str().to_string(),
            user_agent: ctx.user_agent.clone(),
            referrer: ctx.referrer.clone(),
            action,
            outcome,
            occurred_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use docport_auth::password::PasswordHasher;
    use docport_core::config::auth::AuthConfig;
    use docport_core::error::ErrorKind;
    use docport_core::traits::captcha::PresenceVerifier;
    use docport_store::memory::MemoryLinkStore;

    use super::*;

    fn ctx() -> RequestContext {
        RequestContext::new("203.0.113.7".into(), Some("Mozilla/5.0".into()), None, None)
    }

    fn service(memory: &MemoryLinkStore) -> AccessService {
        let store = StoreManager::from_provider(Arc::new(memory.clone()));
        AccessService::new(
            store.clone(),
            PolicyEvaluator::new(PasswordHasher::new()),
            TokenIssuer::new(&AuthConfig::default()),
            Arc::new(PresenceVerifier),
            AuditLogger::new(store),
            NotificationDispatcher::disabled(),
        )
    }

    async fn seed(memory: &MemoryLinkStore, link: &ShareLink) {
        let mut document = DocumentRef::new("report.pdf", "application/pdf");
        document.id = link.document_id;
        memory.put_document(&document).await.unwrap();
        memory.put_link(link).await.unwrap();
    }

    async fn seeded_link(memory: &MemoryLinkStore) -> ShareLink {
        let link = ShareLink::new(Uuid::new_v4());
        seed(memory, &link).await;
        link
    }

    #[tokio::test]
    async fn open_link_grant_consumes_a_view_and_records_an_attempt() {
        let memory = MemoryLinkStore::new();
        let link = seeded_link(&memory).await;
        let svc = service(&memory);

        let result = svc.evaluate(link.id, &ctx()).await.unwrap();
        let granted = match result {
            AccessEvaluation::Granted(g) => g,
            other => panic!("expected grant, got {other:?}"),
        };
        assert_eq!(granted.link.access_count, 1);
        assert!(granted.token.is_none());

        let attempts = memory.access_attempts().await;
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].outcome, AccessOutcome::Granted);
        assert_eq!(attempts[0].action, AccessAction::View);
    }

    #[tokio::test]
    async fn protected_link_probe_returns_requirements_without_consuming() {
        let memory = MemoryLinkStore::new();
        let mut link = ShareLink::new(Uuid::new_v4());
        link.require_password = true;
        link.password_hash = Some(PasswordHasher::new().hash_password("pw123456").unwrap());
        seed(&memory, &link).await;
        let svc = service(&memory);

        let result = svc.evaluate(link.id, &ctx()).await.unwrap();
        assert!(matches!(result, AccessEvaluation::NeedsCredentials(req) if req.password));

        let stored = memory.find_link(link.id).await.unwrap().unwrap();
        assert_eq!(stored.access_count, 0);
    }

    #[tokio::test]
    async fn missing_link_and_missing_document_are_indistinguishable() {
        let memory = MemoryLinkStore::new();
        // A dangling link: document never seeded.
        let dangling = ShareLink::new(Uuid::new_v4());
        memory.put_link(&dangling).await.unwrap();
        let svc = service(&memory);

        let absent = svc.evaluate(Uuid::new_v4(), &ctx()).await.unwrap_err();
        let dangled = svc.evaluate(dangling.id, &ctx()).await.unwrap_err();
        assert_eq!(absent.kind, ErrorKind::NotFound);
        assert_eq!(dangled.kind, ErrorKind::NotFound);
        assert_eq!(absent.message, dangled.message);
    }

    #[tokio::test]
    async fn wrong_password_records_exactly_one_failure_and_no_view() {
        let memory = MemoryLinkStore::new();
        let hasher = PasswordHasher::new();
        let mut link = ShareLink::new(Uuid::new_v4());
        link.require_password = true;
        link.password_hash = Some(hasher.hash_password("correct-horse").unwrap());
        seed(&memory, &link).await;
        let svc = service(&memory);

        let bundle = CredentialBundle {
            password: Some("wrong".into()),
            ..Default::default()
        };
        let result = svc.authenticate(link.id, &bundle, &ctx()).await.unwrap();
        assert!(matches!(
            result,
            AccessEvaluation::Denied(DenialCode::InvalidPassword)
        ));

        assert_eq!(memory.password_failures().await.len(), 1);
        let stored = memory.find_link(link.id).await.unwrap().unwrap();
        assert_eq!(stored.access_count, 0);
    }

    #[tokio::test]
    async fn correct_password_grants_and_mints_a_token() {
        let memory = MemoryLinkStore::new();
        let hasher = PasswordHasher::new();
        let mut link = ShareLink::new(Uuid::new_v4());
        link.require_password = true;
        link.password_hash = Some(hasher.hash_password("correct-horse").unwrap());
        seed(&memory, &link).await;
        let svc = service(&memory);

        let bundle = CredentialBundle {
            password: Some("correct-horse".into()),
            ..Default::default()
        };
        let result = svc.authenticate(link.id, &bundle, &ctx()).await.unwrap();
        let granted = match result {
            AccessEvaluation::Granted(g) => g,
            other => panic!("expected grant, got {other:?}"),
        };

        let token = granted.token.unwrap();
        assert_eq!(token.link_id, link.id);
        assert!(memory.find_token(&token.token).await.unwrap().is_some());
        assert_eq!(granted.link.access_count, 1);
        assert!(memory.password_failures().await.is_empty());
    }

    #[tokio::test]
    async fn nda_grant_appends_an_acceptance_record() {
        let memory = MemoryLinkStore::new();
        let mut link = ShareLink::new(Uuid::new_v4());
        link.require_nda = true;
        link.nda_text = Some("terms".into());
        seed(&memory, &link).await;
        let svc = service(&memory);

        let bundle = CredentialBundle {
            accept_terms: true,
            ..Default::default()
        };
        let result = svc.authenticate(link.id, &bundle, &ctx()).await.unwrap();
        assert!(matches!(result, AccessEvaluation::Granted(_)));
        assert_eq!(memory.nda_acceptances().await.len(), 1);
    }

    #[tokio::test]
    async fn quota_race_surfaces_as_max_access_reached() {
        let memory = MemoryLinkStore::new();
        let mut link = ShareLink::new(Uuid::new_v4());
        link.max_access_count = Some(1);
        seed(&memory, &link).await;
        let svc = service(&memory);

        let first = svc.evaluate(link.id, &ctx()).await.unwrap();
        assert!(matches!(first, AccessEvaluation::Granted(_)));

        let second = svc.evaluate(link.id, &ctx()).await.unwrap();
        assert!(matches!(
            second,
            AccessEvaluation::Denied(DenialCode::MaxAccessReached)
        ));

        let attempts = memory.access_attempts().await;
        assert_eq!(attempts.len(), 2);
        assert_eq!(
            attempts[1].outcome,
            AccessOutcome::Denied("MAX_ACCESS_REACHED".to_string())
        );
    }

    #[tokio::test]
    async fn disabled_link_denies_before_credentials_are_checked() {
        let memory = MemoryLinkStore::new();
        let mut link = ShareLink::new(Uuid::new_v4());
        link.disabled = true;
        link.require_password = true;
        seed(&memory, &link).await;
        let svc = service(&memory);

        let result = svc
            .authenticate(link.id, &CredentialBundle::default(), &ctx())
            .await
            .unwrap();
        assert!(matches!(
            result,
            AccessEvaluation::Denied(DenialCode::LinkDisabled)
        ));
    }
}
