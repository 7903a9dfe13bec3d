//! Comment service
//!
//! Maintains the pairing between the comments collection and each blog's
//! denormalized comment-id list, across non-atomic multi-step writes.
//!
//! Attach order: insert the comment, then read the blog's current list,
//! append, and write the whole list back. The write-back replaces the full
//! array, so two concurrent attaches to the same blog race on the
//! read-modify-write and the last writer's array wins, silently dropping
//! the other's id. That is a documented limitation of the store contract,
//! not something this service papers over.
//!
//! Detach order: update the array first, delete the comment second. A
//! failing array update leaves everything untouched (fails closed); a crash
//! between the two steps leaves a dangling comment document that is no
//! longer referenced anywhere.

use std::sync::Arc;

use crate::db::repositories::{BlogRepository, CommentRepository};
use crate::error::{LinkageError, ServiceError};
use crate::models::Comment;

/// Comment attach/detach service.
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    blogs: Arc<dyn BlogRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, blogs: Arc<dyn BlogRepository>) -> Self {
        Self { comments, blogs }
    }

    /// Create a comment and link it into the given blog's comment-id list.
    ///
    /// The blog id is validated before anything is written, so malformed
    /// input cannot orphan a comment. Once the comment insert has
    /// committed, any failure to read or update the blog — including the
    /// blog not existing — is reported as `LinkUpdateFailed` carrying the
    /// comment id, so the caller can retry the link.
    pub async fn attach(&self, blog_id: &str, text: &str) -> Result<Comment, ServiceError> {
        let blog_id = super::parse_id(blog_id)?;
        if text.trim().is_empty() {
            return Err(ServiceError::validation("comment must not be empty"));
        }

        let comment = self.comments.insert(&Comment::new(text.to_string())).await?;

        let blog = match self.blogs.find_by_id(blog_id).await {
            Ok(Some(blog)) => blog,
            Ok(None) => {
                return Err(self.unlinked(comment.id, "blog not found"));
            }
            Err(e) => {
                return Err(self.unlinked(comment.id, &e.to_string()));
            }
        };

        let mut comment_ids = blog.comment_ids;
        comment_ids.push(comment.id);
        match self.blogs.set_comment_ids(blog_id, &comment_ids).await {
            // Zero matches means the blog was deleted between the read and
            // the write-back; the comment is just as unlinked as on an error.
            Ok(0) => return Err(self.unlinked(comment.id, "blog not found")),
            Ok(_) => {}
            Err(e) => return Err(self.unlinked(comment.id, &e.to_string())),
        }

        tracing::info!(comment = %comment.id, blog = %blog_id, "comment attached");
        Ok(comment)
    }

    /// Unlink a comment from the blog's list and delete it.
    ///
    /// Returns the deleted count for the comment document (0 when it was
    /// already gone). If the array update fails, the list is unchanged and
    /// the comment is not deleted.
    pub async fn detach(&self, blog_id: &str, comment_id: &str) -> Result<u64, ServiceError> {
        let blog_id = super::parse_id(blog_id)?;
        let comment_id = super::parse_id(comment_id)?;

        let blog = self
            .blogs
            .find_by_id(blog_id)
            .await?
            .ok_or(ServiceError::NotFound("blog"))?;

        let remaining: Vec<_> = blog
            .comment_ids
            .into_iter()
            .filter(|id| *id != comment_id)
            .collect();
        self.blogs.set_comment_ids(blog_id, &remaining).await?;

        let deleted = self.comments.delete_by_id(comment_id).await?;
        tracing::info!(comment = %comment_id, blog = %blog_id, deleted, "comment detached");
        Ok(deleted)
    }

    /// List all comments.
    pub async fn list(&self) -> Result<Vec<Comment>, ServiceError> {
        Ok(self.comments.list().await?)
    }

    /// Get a comment by its id string.
    pub async fn get(&self, id: &str) -> Result<Comment, ServiceError> {
        let id = super::parse_id(id)?;
        self.comments
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("comment"))
    }

    fn unlinked(&self, comment_id: crate::db::DocumentId, reason: &str) -> ServiceError {
        tracing::warn!(comment = %comment_id, reason, "comment left unlinked");
        LinkageError::LinkUpdateFailed {
            comment_id,
            reason: reason.to_string(),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{StoreBlogRepository, StoreCommentRepository};
    use crate::db::testing::FlakyStore;
    use crate::db::{collections, DocumentId, DocumentStore, Filter, MemoryStore};
    use crate::models::Blog;
    use serde_json::json;

    fn wire(store: Arc<dyn DocumentStore>) -> (Arc<dyn BlogRepository>, CommentService) {
        let blogs = StoreBlogRepository::boxed(store.clone());
        let service = CommentService::new(StoreCommentRepository::boxed(store), blogs.clone());
        (blogs, service)
    }

    async fn seed_blog(blogs: &Arc<dyn BlogRepository>) -> Blog {
        blogs.insert(&Blog::new("post".into())).await.unwrap()
    }

    #[tokio::test]
    async fn attach_then_detach_restores_the_original_list() {
        let (blogs, service) = wire(MemoryStore::boxed());
        let blog = seed_blog(&blogs).await;
        let before = blogs.find_by_id(blog.id).await.unwrap().unwrap().comment_ids;

        let comment = service
            .attach(&blog.id.to_string(), "nice post")
            .await
            .unwrap();
        let linked = blogs.find_by_id(blog.id).await.unwrap().unwrap();
        assert_eq!(linked.comment_ids, vec![comment.id]);

        let deleted = service
            .detach(&blog.id.to_string(), &comment.id.to_string())
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        let after = blogs.find_by_id(blog.id).await.unwrap().unwrap().comment_ids;
        assert_eq!(after, before);
        assert!(matches!(
            service.get(&comment.id.to_string()).await.unwrap_err(),
            ServiceError::NotFound("comment")
        ));
    }

    #[tokio::test]
    async fn malformed_blog_id_fails_before_any_write() {
        let (_, service) = wire(MemoryStore::boxed());
        let err = service.attach("junk", "text").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn attach_to_a_missing_blog_orphans_the_comment_and_says_so() {
        let (_, service) = wire(MemoryStore::boxed());
        let err = service
            .attach(&DocumentId::generate().to_string(), "text")
            .await
            .unwrap_err();

        let ServiceError::Linkage(LinkageError::LinkUpdateFailed { comment_id, .. }) = err else {
            panic!("expected LinkUpdateFailed, got {err:?}");
        };
        // The comment was committed before the link step failed.
        let orphan = service.get(&comment_id.to_string()).await.unwrap();
        assert_eq!(orphan.text, "text");
    }

    #[tokio::test]
    async fn failed_write_back_reports_the_orphaned_comment_id() {
        let store = FlakyStore::new().deny_update(collections::BLOGS).boxed();
        let (blogs, service) = wire(store);
        let blog = seed_blog(&blogs).await;

        let err = service
            .attach(&blog.id.to_string(), "text")
            .await
            .unwrap_err();
        let ServiceError::Linkage(LinkageError::LinkUpdateFailed { comment_id, .. }) = err else {
            panic!("expected LinkUpdateFailed, got {err:?}");
        };
        assert!(service.get(&comment_id.to_string()).await.is_ok());
    }

    // Deletes the blog under the writer's feet right before the array
    // write-back runs, so the update matches nothing.
    struct VanishingBlogStore {
        inner: MemoryStore,
    }

    #[async_trait::async_trait]
    impl DocumentStore for VanishingBlogStore {
        async fn insert(
            &self,
            collection: &str,
            document: serde_json::Value,
        ) -> Result<DocumentId, crate::db::StoreError> {
            self.inner.insert(collection, document).await
        }

        async fn find_one(
            &self,
            collection: &str,
            filter: &Filter,
        ) -> Result<Option<serde_json::Value>, crate::db::StoreError> {
            self.inner.find_one(collection, filter).await
        }

        async fn find_many(
            &self,
            collection: &str,
            filter: &Filter,
        ) -> Result<Vec<serde_json::Value>, crate::db::StoreError> {
            self.inner.find_many(collection, filter).await
        }

        async fn update_fields(
            &self,
            collection: &str,
            id: DocumentId,
            fields: serde_json::Value,
        ) -> Result<u64, crate::db::StoreError> {
            if collection == collections::BLOGS {
                self.inner
                    .delete_one(collections::BLOGS, &Filter::by_id(id))
                    .await?;
            }
            self.inner.update_fields(collection, id, fields).await
        }

        async fn delete_one(
            &self,
            collection: &str,
            filter: &Filter,
        ) -> Result<u64, crate::db::StoreError> {
            self.inner.delete_one(collection, filter).await
        }
    }

    #[tokio::test]
    async fn zero_count_write_back_reports_the_orphaned_comment_id() {
        let store: Arc<dyn DocumentStore> = Arc::new(VanishingBlogStore {
            inner: MemoryStore::new(),
        });
        let (blogs, service) = wire(store);
        let blog = seed_blog(&blogs).await;

        let err = service
            .attach(&blog.id.to_string(), "text")
            .await
            .unwrap_err();
        let ServiceError::Linkage(LinkageError::LinkUpdateFailed { comment_id, .. }) = err else {
            panic!("expected LinkUpdateFailed, got {err:?}");
        };
        // The blog really is gone, and the orphaned comment survived.
        assert!(blogs.find_by_id(blog.id).await.unwrap().is_none());
        assert!(service.get(&comment_id.to_string()).await.is_ok());
    }

    #[tokio::test]
    async fn failed_blog_read_reports_the_orphaned_comment_id() {
        let store = FlakyStore::new().deny_find(collections::BLOGS).boxed();
        let (_, service) = wire(store.clone());
        // The seed has to bypass the denied reads.
        let blog_id = store
            .insert(
                collections::BLOGS,
                serde_json::to_value(Blog::new("post".into())).unwrap(),
            )
            .await
            .unwrap();

        let err = service
            .attach(&blog_id.to_string(), "text")
            .await
            .unwrap_err();
        let ServiceError::Linkage(LinkageError::LinkUpdateFailed { comment_id, .. }) = err else {
            panic!("expected LinkUpdateFailed, got {err:?}");
        };
        assert!(service.get(&comment_id.to_string()).await.is_ok());
    }

    #[tokio::test]
    async fn detach_fails_closed_when_the_array_update_fails() {
        let store = FlakyStore::new().deny_update(collections::BLOGS).boxed();
        let (blogs, service) = wire(store);
        let blog = seed_blog(&blogs).await;
        let comment = service
            .comments
            .insert(&Comment::new("keep me".into()))
            .await
            .unwrap();

        let err = service
            .detach(&blog.id.to_string(), &comment.id.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
        // The comment delete never ran.
        assert!(service.get(&comment.id.to_string()).await.is_ok());
    }

    #[tokio::test]
    async fn detach_from_a_missing_blog_deletes_nothing() {
        let (blogs, service) = wire(MemoryStore::boxed());
        let blog = seed_blog(&blogs).await;
        let comment = service.attach(&blog.id.to_string(), "text").await.unwrap();

        let err = service
            .detach(
                &DocumentId::generate().to_string(),
                &comment.id.to_string(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("blog")));
        assert!(service.get(&comment.id.to_string()).await.is_ok());
    }

    #[tokio::test]
    async fn detaching_an_absent_comment_is_a_zero_count() {
        let (blogs, service) = wire(MemoryStore::boxed());
        let blog = seed_blog(&blogs).await;

        let deleted = service
            .detach(&blog.id.to_string(), &DocumentId::generate().to_string())
            .await
            .unwrap();
        assert_eq!(deleted, 0);
    }

    // Pins the documented read-modify-write hazard: a writer that read the
    // list before another attach committed will clobber that attach when it
    // writes its own array back.
    #[tokio::test]
    async fn whole_array_write_back_loses_concurrent_attaches() {
        let store = MemoryStore::boxed();
        let (blogs, service) = wire(store.clone());
        let blog = seed_blog(&blogs).await;

        // Writer A reads the (empty) list.
        let stale = blogs.find_by_id(blog.id).await.unwrap().unwrap().comment_ids;

        // Writer B attaches and commits in between.
        let b = service.attach(&blog.id.to_string(), "from b").await.unwrap();
        assert_eq!(
            blogs.find_by_id(blog.id).await.unwrap().unwrap().comment_ids,
            vec![b.id]
        );

        // Writer A appends to its stale copy and writes the array back.
        let a_comment = DocumentId::generate();
        let mut a_list = stale;
        a_list.push(a_comment);
        store
            .update_fields(collections::BLOGS, blog.id, json!({ "comment_ids": a_list }))
            .await
            .unwrap();

        // B's id is gone: last writer wins.
        let final_ids = blogs.find_by_id(blog.id).await.unwrap().unwrap().comment_ids;
        assert_eq!(final_ids, vec![a_comment]);
        assert!(!final_ids.contains(&b.id));
    }
}
