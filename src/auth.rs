//! Resolution of the requesting user.
//!
//! The GraphQL core only ever consumes an already resolved user id. Verifying
//! bearer credentials belongs to whatever [`IdentityProvider`] the handler is
//! built with.

use crate::http::ProxyRequest;
use crate::store::SAMANTHA_ID;

pub trait IdentityProvider: Send + Sync {
    /// Id of the user behind `req`, `None` for anonymous requests.
    fn current_user_id(&self, req: &ProxyRequest) -> Option<String>;
}

///
/// Reports the same subject for every request, whatever credentials it carries
///
#[derive(Clone, Debug, PartialEq)]
pub struct StaticIdentity {
    user_id: String,
}

impl StaticIdentity {
    pub fn new<S: Into<String>>(user_id: S) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl Default for StaticIdentity {
    fn default() -> Self {
        Self::new(SAMANTHA_ID)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self, _req: &ProxyRequest) -> Option<String> {
        Some(self.user_id.to_owned())
    }
}

impl<F> IdentityProvider for F
where
    F: Fn(&ProxyRequest) -> Option<String> + Send + Sync,
{
    fn current_user_id(&self, req: &ProxyRequest) -> Option<String> {
        self(req)
    }
}
