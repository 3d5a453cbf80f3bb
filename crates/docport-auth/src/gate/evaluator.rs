//! The policy evaluator: runs the ordered gate chain against a link.

use chrono::{DateTime, Utc};

use docport_core::error::AppError;
use docport_entity::link::ShareLink;

use super::credentials::{CredentialBundle, CredentialRequirements};
use super::outcome::{AuthMode, DenialCode, GateOutcome};
use crate::password::PasswordHasher;

/// A lifecycle gate: a predicate over the link paired with the denial code
/// it produces. Keeping these as an explicit ordered list makes gate
/// precedence visible and testable.
type LifecycleGate = (fn(&ShareLink, DateTime<Utc>) -> bool, DenialCode);

/// The lifecycle gates, in precedence order. First match wins.
const LIFECYCLE_GATES: [LifecycleGate; 3] = [
    (|link, _| link.disabled, DenialCode::LinkDisabled),
    (|link, now| link.is_expired(now), DenialCode::LinkExpired),
    (|link, _| link.quota_exhausted(), DenialCode::MaxAccessReached),
];

/// Runs the ordered authorization gate chain.
///
/// Evaluation is synchronous and side-effect free. The quota gate here is
/// the read-side check; the authoritative enforcement is the store's
/// bounded increment, whose `LimitReached` result callers surface as
/// [`DenialCode::MaxAccessReached`].
#[derive(Debug, Clone)]
pub struct PolicyEvaluator {
    /// Verifier for the password factor.
    hasher: PasswordHasher,
}

impl PolicyEvaluator {
    /// Creates a new evaluator.
    pub fn new(hasher: PasswordHasher) -> Self {
        Self { hasher }
    }

    /// Evaluates the full gate chain for one request.
    ///
    /// With no credential bundle this is the probe path: if any factor is
    /// enabled the result is `NeedsCredentials` listing them. With a
    /// bundle, every enabled factor is checked independently and all must
    /// pass. Infrastructure problems (an unparseable stored hash) are
    /// errors, not denials.
    pub fn evaluate(
        &self,
        link: &ShareLink,
        credentials: Option<&CredentialBundle>,
        now: DateTime<Utc>,
    ) -> Result<GateOutcome, AppError> {
        for (check, code) in LIFECYCLE_GATES {
            if check(link, now) {
                return Ok(GateOutcome::Denied(code));
            }
        }

        let Some(creds) = credentials else {
            if link.requires_credentials() {
                return Ok(GateOutcome::NeedsCredentials(self.requirements(link)));
            }
            return Ok(GateOutcome::Granted(AuthMode::Anonymous));
        };

        if let Some(code) = self.check_email_factor(link, creds) {
            return Ok(GateOutcome::Denied(code));
        }
        if let Some(code) = self.check_password_factor(link, creds)? {
            return Ok(GateOutcome::Denied(code));
        }
        if let Some(code) = check_nda_factor(link, creds) {
            return Ok(GateOutcome::Denied(code));
        }
        if let Some(code) = check_captcha_factor(link, creds) {
            return Ok(GateOutcome::Denied(code));
        }

        let mode = if link.requires_credentials() {
            AuthMode::Authenticated
        } else {
            AuthMode::Anonymous
        };
        Ok(GateOutcome::Granted(mode))
    }

    /// Builds the requirement listing for the no-credential probe.
    pub fn requirements(&self, link: &ShareLink) -> CredentialRequirements {
        CredentialRequirements {
            email: link.require_email,
            password: link.require_password,
            nda: link.require_nda,
            captcha: link.require_captcha,
            nda_text: link.nda_text.clone(),
            custom_message: link.custom_message.clone(),
        }
    }

    fn check_email_factor(
        &self,
        link: &ShareLink,
        creds: &CredentialBundle,
    ) -> Option<DenialCode> {
        if !link.require_email {
            return None;
        }
        let Some(email) = creds.normalized_email() else {
            return Some(DenialCode::EmailRequired);
        };
        if email_allowed(link, &email) {
            None
        } else {
            Some(DenialCode::EmailNotAllowed)
        }
    }

    fn check_password_factor(
        &self,
        link: &ShareLink,
        creds: &CredentialBundle,
    ) -> Result<Option<DenialCode>, AppError> {
        if !link.require_password {
            return Ok(None);
        }
        let Some(password) = creds.password.as_deref().filter(|p| !p.is_empty()) else {
            return Ok(Some(DenialCode::PasswordRequired));
        };
        let Some(hash) = link.password_hash.as_deref() else {
            return Err(AppError::internal(
                "Link requires a password but no hash is stored",
            ));
        };
        if self.hasher.verify_password(password, hash)? {
            Ok(None)
        } else {
            Ok(Some(DenialCode::InvalidPassword))
        }
    }
}

/// Applies the allow/deny/domain lists to a normalized email.
///
/// Allowed iff the whitelist is empty or contains the email, the email is
/// not blacklisted, and the domain list is empty or contains the email's
/// domain.
fn email_allowed(link: &ShareLink, email: &str) -> bool {
    let listed = |list: &[String]| list.iter().any(|e| e.trim().eq_ignore_ascii_case(email));

    if !link.allowed_emails.is_empty() && !listed(&link.allowed_emails) {
        return false;
    }
    if listed(&link.blocked_emails) {
        return false;
    }
    if !link.allowed_domains.is_empty() {
        let Some(domain) = email.rsplit_once('@').map(|(_, d)| d) else {
            return false;
        };
        if !link
            .allowed_domains
            .iter()
            .any(|d| d.trim().eq_ignore_ascii_case(domain))
        {
            return false;
        }
    }
    true
}

fn check_nda_factor(link: &ShareLink, creds: &CredentialBundle) -> Option<DenialCode> {
    if link.require_nda && !creds.accept_terms {
        Some(DenialCode::NdaRequired)
    } else {
        None
    }
}

fn check_captcha_factor(link: &ShareLink, creds: &CredentialBundle) -> Option<DenialCode> {
    if link.require_captcha
        && creds
            .captcha_token
            .as_deref()
            .map_or(true, |t| t.trim().is_empty())
    {
        Some(DenialCode::CaptchaRequired)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use uuid::Uuid;

    use super::*;

    fn evaluator() -> PolicyEvaluator {
        PolicyEvaluator::new(PasswordHasher::new())
    }

    fn open_link() -> ShareLink {
        ShareLink::new(Uuid::new_v4())
    }

    fn creds() -> CredentialBundle {
        CredentialBundle::default()
    }

    #[test]
    fn open_link_grants_anonymously() {
        let outcome = evaluator().evaluate(&open_link(), None, Utc::now()).unwrap();
        assert_eq!(outcome, GateOutcome::Granted(AuthMode::Anonymous));
    }

    #[test]
    fn disabled_wins_over_expired() {
        let mut link = open_link();
        link.disabled = true;
        link.expires_at = Some(Utc::now() - Duration::hours(1));

        let outcome = evaluator().evaluate(&link, None, Utc::now()).unwrap();
        assert_eq!(outcome, GateOutcome::Denied(DenialCode::LinkDisabled));
    }

    #[test]
    fn expired_wins_over_quota() {
        let mut link = open_link();
        link.expires_at = Some(Utc::now() - Duration::minutes(5));
        link.max_access_count = Some(1);
        link.access_count = 5;

        let outcome = evaluator().evaluate(&link, None, Utc::now()).unwrap();
        assert_eq!(outcome, GateOutcome::Denied(DenialCode::LinkExpired));
    }

    #[test]
    fn exhausted_quota_denies() {
        let mut link = open_link();
        link.max_access_count = Some(3);
        link.access_count = 3;

        let outcome = evaluator().evaluate(&link, None, Utc::now()).unwrap();
        assert_eq!(outcome, GateOutcome::Denied(DenialCode::MaxAccessReached));
    }

    #[test]
    fn probe_lists_enabled_factors_only() {
        let mut link = open_link();
        link.require_email = true;
        link.require_nda = true;
        link.nda_text = Some("terms".into());

        let outcome = evaluator().evaluate(&link, None, Utc::now()).unwrap();
        match outcome {
            GateOutcome::NeedsCredentials(req) => {
                assert!(req.email);
                assert!(req.nda);
                assert!(!req.password);
                assert!(!req.captcha);
                assert_eq!(req.nda_text.as_deref(), Some("terms"));
            }
            other => panic!("expected NeedsCredentials, got {other:?}"),
        }
    }

    #[test]
    fn supplied_bundle_resolves_factors_instead_of_probing() {
        let mut link = open_link();
        link.require_email = true;
        link.require_password = true;
        link.require_nda = true;
        link.require_captcha = true;

        // An empty bundle fails the first enabled factor; it never falls
        // back to the probe listing.
        let outcome = evaluator().evaluate(&link, Some(&creds()), Utc::now()).unwrap();
        assert_eq!(outcome, GateOutcome::Denied(DenialCode::EmailRequired));
    }

    #[test]
    fn email_whitelist_matrix() {
        let mut link = open_link();
        link.require_email = true;
        link.allowed_emails = vec!["a@x.com".into()];

        let ev = evaluator();
        let mut bundle = creds();
        bundle.email = Some("a@x.com".into());
        assert_eq!(
            ev.evaluate(&link, Some(&bundle), Utc::now()).unwrap(),
            GateOutcome::Granted(AuthMode::Authenticated)
        );

        bundle.email = Some("b@x.com".into());
        assert_eq!(
            ev.evaluate(&link, Some(&bundle), Utc::now()).unwrap(),
            GateOutcome::Denied(DenialCode::EmailNotAllowed)
        );
    }

    #[test]
    fn email_domain_list_matrix() {
        let mut link = open_link();
        link.require_email = true;
        link.allowed_domains = vec!["x.com".into()];

        let ev = evaluator();
        let mut bundle = creds();
        bundle.email = Some("c@x.com".into());
        assert_eq!(
            ev.evaluate(&link, Some(&bundle), Utc::now()).unwrap(),
            GateOutcome::Granted(AuthMode::Authenticated)
        );

        bundle.email = Some("c@y.com".into());
        assert_eq!(
            ev.evaluate(&link, Some(&bundle), Utc::now()).unwrap(),
            GateOutcome::Denied(DenialCode::EmailNotAllowed)
        );
    }

    #[test]
    fn blocked_email_denied_even_when_whitelisted() {
        let mut link = open_link();
        link.require_email = true;
        link.allowed_emails = vec!["a@x.com".into()];
        link.blocked_emails = vec!["a@x.com".into()];

        let mut bundle = creds();
        bundle.email = Some("A@X.com".into());
        assert_eq!(
            evaluator().evaluate(&link, Some(&bundle), Utc::now()).unwrap(),
            GateOutcome::Denied(DenialCode::EmailNotAllowed)
        );
    }

    #[test]
    fn missing_email_is_required_not_not_allowed() {
        let mut link = open_link();
        link.require_email = true;

        assert_eq!(
            evaluator().evaluate(&link, Some(&creds()), Utc::now()).unwrap(),
            GateOutcome::Denied(DenialCode::EmailRequired)
        );
    }

    #[test]
    fn password_factor() {
        let hasher = PasswordHasher::new();
        let mut link = open_link();
        link.require_password = true;
        link.password_hash = Some(hasher.hash_password("secret123").unwrap());

        let ev = PolicyEvaluator::new(hasher);

        assert_eq!(
            ev.evaluate(&link, Some(&creds()), Utc::now()).unwrap(),
            GateOutcome::Denied(DenialCode::PasswordRequired)
        );

        let mut bundle = creds();
        bundle.password = Some("wrong".into());
        assert_eq!(
            ev.evaluate(&link, Some(&bundle), Utc::now()).unwrap(),
            GateOutcome::Denied(DenialCode::InvalidPassword)
        );

        bundle.password = Some("secret123".into());
        assert_eq!(
            ev.evaluate(&link, Some(&bundle), Utc::now()).unwrap(),
            GateOutcome::Granted(AuthMode::Authenticated)
        );
    }

    #[test]
    fn nda_and_captcha_factors() {
        let mut link = open_link();
        link.require_nda = true;
        link.require_captcha = true;

        let ev = evaluator();
        let mut bundle = creds();
        assert_eq!(
            ev.evaluate(&link, Some(&bundle), Utc::now()).unwrap(),
            GateOutcome::Denied(DenialCode::NdaRequired)
        );

        bundle.accept_terms = true;
        assert_eq!(
            ev.evaluate(&link, Some(&bundle), Utc::now()).unwrap(),
            GateOutcome::Denied(DenialCode::CaptchaRequired)
        );

        bundle.captcha_token = Some("tok".into());
        assert_eq!(
            ev.evaluate(&link, Some(&bundle), Utc::now()).unwrap(),
            GateOutcome::Granted(AuthMode::Authenticated)
        );
    }
}
