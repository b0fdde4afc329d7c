use std::collections::HashSet;

use serde::Deserialize;

use shared::models::{Role, SenderId};

use crate::AliasTable;

/// Startup configuration: the admin allow-list and the locale alias
/// tables. Consumed once at router construction, never reloaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub admin_ids: HashSet<SenderId>,
    pub aliases: AliasTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            admin_ids: HashSet::new(),
            aliases: AliasTable::default(),
        }
    }
}

impl Config {
    pub fn with_admins<I, S>(admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SenderId>,
    {
        Self {
            admin_ids: admins.into_iter().map(Into::into).collect(),
            aliases: AliasTable::default(),
        }
    }

    pub fn role_of(&self, sender: &str) -> Role {
        if self.admin_ids.contains(sender) {
            Role::Admin
        } else {
            Role::User
        }
    }
}
