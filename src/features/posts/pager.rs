use crate::features::posts::types::Post;
use std::collections::HashSet;
use tracing::debug;

/// Ticket identifying one in-flight page fetch. Tickets are issued in order;
/// only the most recently issued one may commit its response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageTicket {
    page: u32,
    request: u64,
}

impl PageTicket {
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }
}

/// Accumulator for an infinite-scroll post list.
///
/// Page 1 replaces the list, later pages append, and entries are deduplicated
/// by post id so overlapping pages never show a post twice. Overlapping
/// fetches are ordered by ticket: a response for a superseded request is
/// dropped instead of being merged out of order.
#[derive(Debug)]
pub struct FeedPager {
    posts: Vec<Post>,
    seen: HashSet<u64>,
    latest: u64,
    page_size: usize,
    has_more: bool,
}

impl FeedPager {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            posts: Vec::new(),
            seen: HashSet::new(),
            latest: 0,
            page_size,
            has_more: true,
        }
    }

    /// Register a page fetch and get the ticket its response must present.
    pub fn begin(&mut self, page: u32) -> PageTicket {
        self.latest += 1;

        PageTicket {
            page,
            request: self.latest,
        }
    }

    /// Merge a fetched page. Returns false when the ticket is stale and the
    /// response was discarded.
    pub fn apply(&mut self, ticket: PageTicket, fetched: Vec<Post>) -> bool {
        if ticket.request != self.latest {
            debug!("discarding stale page {} response", ticket.page);
            return false;
        }

        if ticket.page <= 1 {
            self.posts.clear();
            self.seen.clear();
        }

        let fetched_len = fetched.len();

        for post in fetched {
            if self.seen.insert(post.id) {
                self.posts.push(post);
            }
        }

        self.has_more = fetched_len == self.page_size;
        true
    }

    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }
}
