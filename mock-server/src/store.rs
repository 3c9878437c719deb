use std::collections::{BTreeMap, BTreeSet};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::wire::Property;

#[derive(Debug, Clone)]
pub(crate) struct ProfileRecord {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) wallet_address: String,
    pub(crate) blockchain: String,
    pub(crate) bio: Option<String>,
    pub(crate) image: Option<String>,
    pub(crate) created_at: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct ContentRecord {
    pub(crate) id: String,
    pub(crate) profile_id: String,
    pub(crate) properties: Vec<Property>,
    pub(crate) created_at: i64,
}

impl ContentRecord {
    /// Last value stored under `key`, or empty.
    pub(crate) fn property(&self, key: &str) -> String {
        self.properties
            .iter()
            .rev()
            .find(|p| p.key == key)
            .map(|p| p.value.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CommentRecord {
    pub(crate) id: String,
    pub(crate) content_id: String,
    pub(crate) profile_id: String,
    pub(crate) parent_id: Option<String>,
    pub(crate) text: String,
    pub(crate) properties: Vec<Property>,
    pub(crate) created_at: i64,
}

/// The whole social graph. Likes are `(target, profile)` pairs; follows are
/// `(start, end)` pairs.
#[derive(Debug, Default)]
pub(crate) struct Store {
    clock: i64,
    pub(crate) profiles: BTreeMap<String, ProfileRecord>,
    pub(crate) contents: BTreeMap<String, ContentRecord>,
    pub(crate) comments: BTreeMap<String, CommentRecord>,
    pub(crate) likes: BTreeSet<(String, String)>,
    pub(crate) follows: BTreeSet<(String, String)>,
}

impl Store {
    /// Wall-clock milliseconds, strictly increasing across calls.
    pub(crate) fn tick(&mut self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default();
        self.clock = now.max(self.clock + 1);
        self.clock
    }

    pub(crate) fn likeable(&self, target: &str) -> bool {
        self.contents.contains_key(target) || self.comments.contains_key(target)
    }

    pub(crate) fn like_count(&self, target: &str) -> u64 {
        self.likes.iter().filter(|(t, _)| t == target).count() as u64
    }

    pub(crate) fn has_liked(&self, target: &str, profile_id: Option<&str>) -> bool {
        profile_id.is_some_and(|p| self.likes.contains(&(target.to_string(), p.to_string())))
    }

    pub(crate) fn comment_count(&self, content_id: &str) -> u64 {
        self.comments.values().filter(|c| c.content_id == content_id).count() as u64
    }

    pub(crate) fn reply_count(&self, comment_id: &str) -> u64 {
        self.comments
            .values()
            .filter(|c| c.parent_id.as_deref() == Some(comment_id))
            .count() as u64
    }

    /// Profiles following `id`.
    pub(crate) fn followers(&self, id: &str) -> Vec<&ProfileRecord> {
        self.follows
            .iter()
            .filter(|(_, end)| end == id)
            .filter_map(|(start, _)| self.profiles.get(start))
            .collect()
    }

    /// Profiles `id` follows.
    pub(crate) fn following(&self, id: &str) -> Vec<&ProfileRecord> {
        self.follows
            .iter()
            .filter(|(start, _)| start == id)
            .filter_map(|(_, end)| self.profiles.get(end))
            .collect()
    }

    /// Drop content together with its comments and every like pointing at
    /// either.
    pub(crate) fn remove_content(&mut self, id: &str) -> bool {
        if self.contents.remove(id).is_none() {
            return false;
        }
        let orphaned: Vec<String> = self
            .comments
            .values()
            .filter(|c| c.content_id == id)
            .map(|c| c.id.clone())
            .collect();
        for comment in &orphaned {
            self.comments.remove(comment);
        }
        self.likes
            .retain(|(target, _)| target != id && !orphaned.contains(target));
        true
    }

    /// Drop a comment and its whole reply subtree.
    pub(crate) fn remove_comment(&mut self, id: &str) -> bool {
        if !self.comments.contains_key(id) {
            return false;
        }
        let mut pending = vec![id.to_string()];
        while let Some(next) = pending.pop() {
            self.comments.remove(&next);
            self.likes.retain(|(target, _)| *target != next);
            pending.extend(
                self.comments
                    .values()
                    .filter(|c| c.parent_id.as_deref() == Some(next.as_str()))
                    .map(|c| c.id.clone()),
            );
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str) -> ProfileRecord {
        ProfileRecord {
            id: id.into(),
            username: id.into(),
            wallet_address: format!("wallet-{id}"),
            blockchain: "SOLANA".into(),
            bio: None,
            image: None,
            created_at: 1,
        }
    }

    fn comment(id: &str, parent: Option<&str>) -> CommentRecord {
        CommentRecord {
            id: id.into(),
            content_id: "post".into(),
            profile_id: "alice".into(),
            parent_id: parent.map(String::from),
            text: id.into(),
            properties: Vec::new(),
            created_at: 1,
        }
    }

    #[test]
    fn tick_is_strictly_increasing() {
        let mut store = Store::default();
        let a = store.tick();
        let b = store.tick();
        assert!(b > a);
    }

    #[test]
    fn follow_edges_are_directed() {
        let mut store = Store::default();
        for id in ["alice", "bob"] {
            store.profiles.insert(id.into(), profile(id));
        }
        store.follows.insert(("alice".into(), "bob".into()));

        let followers: Vec<_> = store.followers("bob").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(followers, vec!["alice"]);
        assert!(store.followers("alice").is_empty());
        assert_eq!(store.following("alice")[0].id, "bob");
    }

    #[test]
    fn removing_a_comment_drops_its_thread() {
        let mut store = Store::default();
        store.comments.insert("c1".into(), comment("c1", None));
        store.comments.insert("c2".into(), comment("c2", Some("c1")));
        store.comments.insert("c3".into(), comment("c3", Some("c2")));
        store.comments.insert("c4".into(), comment("c4", None));
        store.likes.insert(("c3".into(), "bob".into()));

        assert!(store.remove_comment("c1"));
        assert_eq!(store.comments.keys().collect::<Vec<_>>(), vec!["c4"]);
        assert!(store.likes.is_empty());
        assert!(!store.remove_comment("c1"));
    }

    #[test]
    fn content_property_takes_last_duplicate() {
        let record = ContentRecord {
            id: "post".into(),
            profile_id: "alice".into(),
            properties: vec![
                Property { key: "title".into(), value: "old".into() },
                Property { key: "title".into(), value: "new".into() },
            ],
            created_at: 1,
        };
        assert_eq!(record.property("title"), "new");
        assert_eq!(record.property("description"), "");
    }
}
