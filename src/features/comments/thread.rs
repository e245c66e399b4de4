use crate::features::comments::types::Comment;
use serde::Serialize;
use std::collections::HashMap;

/// A top-level comment with its direct replies. Nesting is capped at one
/// level by construction; replies never carry replies of their own.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommentThread {
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

/// Group a flat comment list into one-level threads, O(n), preserving the
/// input order of both parents and replies. Replies whose parent is not in
/// the batch are dropped, matching the backend's own rendering.
#[must_use]
pub fn organize(comments: Vec<Comment>) -> Vec<CommentThread> {
    let mut order = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();

    for comment in &comments {
        if comment.parent.is_none() {
            index.insert(comment.id, order.len());
            order.push(CommentThread {
                comment: comment.clone(),
                replies: Vec::new(),
            });
        }
    }

    for comment in comments {
        if let Some(parent) = comment.parent {
            if let Some(&slot) = index.get(&parent) {
                order[slot].replies.push(comment);
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: u64, parent: Option<u64>) -> Comment {
        Comment {
            id,
            parent,
            content: format!("comment {id}"),
            ..Comment::default()
        }
    }

    #[test]
    fn groups_replies_under_parents() {
        let threads = organize(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, None),
        ]);

        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].comment.id, 1);
        assert_eq!(threads[0].replies.len(), 1);
        assert_eq!(threads[0].replies[0].id, 2);
        assert_eq!(threads[1].comment.id, 3);
        assert!(threads[1].replies.is_empty());
    }

    #[test]
    fn preserves_reply_order() {
        let threads = organize(vec![
            comment(1, None),
            comment(5, Some(1)),
            comment(2, Some(1)),
        ]);

        let reply_ids: Vec<u64> = threads[0].replies.iter().map(|c| c.id).collect();
        assert_eq!(reply_ids, vec![5, 2]);
    }

    #[test]
    fn drops_orphan_replies() {
        let threads = organize(vec![comment(2, Some(99)), comment(3, None)]);

        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].comment.id, 3);
    }

    #[test]
    fn empty_input_yields_no_threads() {
        assert!(organize(Vec::new()).is_empty());
    }
}
