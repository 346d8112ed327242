use std::collections::HashSet;

use crate::store::PrincipalId;

/// Authorization boundary consulted before any target mutation
///
/// The core trusts this answer; admin management itself (adding and removing
/// admins) belongs to the chat layer that feeds the list.
pub trait AuthorizationProvider: Send + Sync {
    fn is_authorized(&self, principal: PrincipalId) -> bool;
}

/// Fixed admin list loaded from configuration
pub struct StaticAdminList {
    admins: HashSet<PrincipalId>,
}

impl StaticAdminList {
    pub fn new(admins: impl IntoIterator<Item = PrincipalId>) -> Self {
        Self { admins: admins.into_iter().collect() }
    }
}

impl AuthorizationProvider for StaticAdminList {
    fn is_authorized(&self, principal: PrincipalId) -> bool {
        self.admins.contains(&principal)
    }
}
