//! Process-local cache of reads from the forum service. Entries leave in
//! exactly two ways: an explicit [`Event`] from a completed mutation, or the
//! freshness window running out on a post listing.

use std::{
    collections::HashMap,
    sync::RwLock,
    time::{Duration, Instant},
};

use crate::{api::{Forum, Post}, code::ForumCode};

/// Raised by whoever completed a mutation: creating an entity scoped to
/// parent P drops cached reads of P's child collection.
#[derive(Debug)]
pub enum Event {
    ForumCreated { code: ForumCode },
    PostCreated { forum_id: i64 },
}

/// Other actors write to the same forums through the service, so listings
/// also go stale on their own.
pub const POSTS_TTL: Duration = Duration::from_secs(30);

pub struct Store {
    posts_ttl: Duration,
    forums: RwLock<HashMap<String, Forum>>,
    posts: RwLock<HashMap<i64, PostsEntry>>,
}

struct PostsEntry {
    fetched_at: Instant,
    posts: Vec<Post>,
}

impl Store {
    pub fn new() -> Store {
        Store::with_posts_ttl(POSTS_TTL)
    }

    pub fn with_posts_ttl(posts_ttl: Duration) -> Store {
        Store {
            posts_ttl,
            forums: RwLock::new(HashMap::new()),
            posts: RwLock::new(HashMap::new()),
        }
    }

    /// Forum metadata never expires on its own: the code is an immutable key.
    pub fn forum(&self, code: &ForumCode) -> Option<Forum> {
        self.forums.read().unwrap().get(code.as_str()).cloned()
    }

    pub fn put_forum(&self, forum: Forum) {
        self.forums.write().unwrap().insert(forum.code.clone(), forum);
    }

    pub fn posts(&self, forum_id: i64) -> Option<Vec<Post>> {
        let posts = self.posts.read().unwrap();
        let entry = posts.get(&forum_id)?;
        (entry.fetched_at.elapsed() < self.posts_ttl).then(|| entry.posts.clone())
    }

    pub fn put_posts(&self, forum_id: i64, posts: Vec<Post>) {
        self.posts.write().unwrap().insert(
            forum_id,
            PostsEntry { fetched_at: Instant::now(), posts },
        );
    }

    pub fn apply(&self, event: Event) {
        match event {
            Event::ForumCreated { code } => {
                self.forums.write().unwrap().remove(code.as_str());
            }
            Event::PostCreated { forum_id } => {
                self.posts.write().unwrap().remove(&forum_id);
            }
        }
    }
}

impl Default for Store {
    fn default() -> Store {
        Store::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::User;

    fn forum(id: i64, code: &str) -> Forum {
        Forum {
            id,
            code: code.to_owned(),
            name: "test forum".to_owned(),
            description: None,
            created_by_id: 1,
        }
    }

    fn post(id: i64, forum_id: i64) -> Post {
        Post {
            id,
            title: "hi".to_owned(),
            content: "hello".to_owned(),
            forum_id,
            user_id: 1,
            created_at: "2025-01-01T00:00:00Z".to_owned(),
            author: User { id: 1, username: "ada".to_owned() },
            files: Vec::new(),
        }
    }

    #[test]
    fn forum_round_trips_by_code() {
        let store = Store::new();
        let code = ForumCode::parse("AB123").unwrap();
        assert!(store.forum(&code).is_none());

        store.put_forum(forum(7, "AB123"));
        assert_eq!(store.forum(&code).unwrap().id, 7);
    }

    #[test]
    fn post_listing_expires_after_ttl() {
        let store = Store::with_posts_ttl(Duration::ZERO);
        store.put_posts(7, vec![post(1, 7)]);
        assert!(store.posts(7).is_none());

        let store = Store::new();
        store.put_posts(7, vec![post(1, 7)]);
        assert_eq!(store.posts(7).unwrap().len(), 1);
    }

    #[test]
    fn post_created_event_drops_the_parents_listing() {
        let store = Store::new();
        store.put_posts(7, vec![post(1, 7)]);
        store.put_posts(8, vec![post(2, 8)]);

        store.apply(Event::PostCreated { forum_id: 7 });
        assert!(store.posts(7).is_none());
        assert!(store.posts(8).is_some());
    }

    #[test]
    fn forum_created_event_drops_stale_metadata() {
        let store = Store::new();
        let code = ForumCode::parse("AB123").unwrap();
        store.put_forum(forum(7, "AB123"));

        store.apply(Event::ForumCreated { code: code.clone() });
        assert!(store.forum(&code).is_none());
    }
}
