//! Service-level access evaluation results.

use docport_auth::gate::{CredentialRequirements, DenialCode};
use docport_entity::document::DocumentRef;
use docport_entity::link::ShareLink;
use docport_entity::token::AccessToken;

/// A granted session, assembled after the view was recorded.
#[derive(Debug, Clone)]
pub struct GrantedAccess {
    /// The link, re-read after the grant so analytics are current.
    pub link: ShareLink,
    /// The document behind the link.
    pub document: DocumentRef,
    /// Minted token; present only on the credentialed path.
    pub token: Option<AccessToken>,
}

/// How an access evaluation ended.
///
/// Denials are values, not errors: only infrastructure failures surface
/// as `AppError`.
#[derive(Debug, Clone)]
pub enum AccessEvaluation {
    /// Credential factors are enabled; the caller must retry with a
    /// credential bundle. Nothing was consumed or recorded against the
    /// link's quota.
    NeedsCredentials(CredentialRequirements),
    /// Every gate passed and the view was recorded.
    Granted(Box<GrantedAccess>),
    /// A gate failed.
    Denied(DenialCode),
}
