//! Authenticated caller identity.

use rustc_hash::FxHashMap;

use crate::auth::records::{ApiKey, ClientUuid, GroupName};

/// Flat set of group names keyed case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSet {
    names: FxHashMap<String, GroupName>,
}

impl GroupSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a group, keeping the first spelling seen for a case-folded name.
    pub fn insert(&mut self, name: GroupName) {
        self.names.entry(name.folded()).or_insert(name);
    }

    #[must_use]
    pub fn contains(&self, name: &GroupName) -> bool {
        self.names.contains_key(&name.folded())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupName> {
        self.names.values()
    }

    /// Group names in a stable, sorted order.
    #[must_use]
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.values().map(GroupName::as_str).collect();

        names.sort_unstable();

        names
    }
}

impl FromIterator<GroupName> for GroupSet {
    fn from_iter<I: IntoIterator<Item = GroupName>>(iter: I) -> Self {
        let mut set = Self::new();

        for name in iter {
            set.insert(name);
        }

        set
    }
}

/// Identity attached to a single call once its signature has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub key: ApiKey,
    pub client_uuid: ClientUuid,
    pub groups: GroupSet,
}

impl AuthenticatedIdentity {
    #[must_use]
    pub fn new(key: ApiKey, client_uuid: ClientUuid, groups: GroupSet) -> Self {
        Self {
            key,
            client_uuid,
            groups,
        }
    }

    #[must_use]
    pub fn is_member_of(&self, group: &GroupName) -> bool {
        self.groups.contains(group)
    }
}
