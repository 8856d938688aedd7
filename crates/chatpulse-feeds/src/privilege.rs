//! Premium membership from a fixed set of user ids loaded at startup.

use chatpulse_core::sinks::PrivilegeSource;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct StaticPrivilegeSource {
    premium: HashSet<i64>,
}

impl StaticPrivilegeSource {
    pub fn new(premium: impl IntoIterator<Item = i64>) -> Self {
        Self {
            premium: premium.into_iter().collect(),
        }
    }
}

impl PrivilegeSource for StaticPrivilegeSource {
    fn is_premium(&self, user_id: i64) -> bool {
        self.premium.contains(&user_id)
    }
}
