//! The request-scoped user context attached by the auth middleware.

use uuid::Uuid;

/// Who is making this request. Inserted as a request extension by the JWT
/// middleware; handlers that require authentication extract it.
#[derive(Debug, Clone)]
pub struct UserContext {
    /// the authenticated user's id
    pub user_id: Uuid,
}
