//! Role registration and inline role expansion.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::node::Reference;

/// An inline role: turns the text between backticks into a node.
///
/// Implementations must be stateless; the same text always yields the same
/// node.
pub trait Role: Send + Sync {
    fn run(&self, text: &str) -> Reference;
}

/// Roles known to the generator, by name.
#[derive(Default)]
pub struct RoleRegistry {
    roles: BTreeMap<String, Box<dyn Role>>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `role` under `name`, replacing any earlier registration.
    pub fn add_role(&mut self, name: &str, role: Box<dyn Role>) {
        debug!(name, "registered role");
        self.roles.insert(name.to_string(), role);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Role> {
        self.roles.get(name).map(|r| r.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    /// Replace every ``:name:`text` `` with the HTML for the role's node.
    ///
    /// Occurrences of unregistered roles are left as written.
    pub fn expand(&self, input: &str) -> String {
        static ROLE_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r":(?P<name>[A-Za-z][\w.+-]*):`(?P<text>[^`]+)`").expect("valid regex")
        });

        ROLE_RE
            .replace_all(input, |caps: &Captures<'_>| match self.get(&caps["name"]) {
                Some(role) => role.run(&caps["text"]).to_html(),
                None => {
                    trace!(name = &caps["name"], "unknown role left untouched");
                    caps[0].to_string()
                }
            })
            .into_owned()
    }
}
