//! Blog service
//!
//! Owns the publish operation and the owner-scoped listing. Publish is a
//! compound write with no transaction around it: the blog insert and the
//! ownership record insert commit independently, in that order. When the
//! second write fails the blog already exists with no owner; that partial
//! state is reported to the caller (with the blog id, so the link can be
//! retried or the orphan deleted) and never rolled back here.

use std::sync::Arc;

use crate::db::repositories::{BlogRepository, OwnershipRepository, UserRepository};
use crate::error::{LinkageError, ServiceError};
use crate::models::Blog;

/// Blog publishing and listing service.
pub struct BlogService {
    blogs: Arc<dyn BlogRepository>,
    ownership: Arc<dyn OwnershipRepository>,
    users: Arc<dyn UserRepository>,
}

impl BlogService {
    pub fn new(
        blogs: Arc<dyn BlogRepository>,
        ownership: Arc<dyn OwnershipRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            blogs,
            ownership,
            users,
        }
    }

    /// Publish a blog on behalf of the named user.
    ///
    /// Write order: insert the blog (empty comment list), then insert the
    /// ownership record. The owner is resolved before the first write so a
    /// vanished account cannot orphan a blog; only a failing ownership
    /// insert leaves the orphan, reported as `OwnershipLinkFailed` with the
    /// created blog's id.
    pub async fn publish(&self, author: &str, content: &str) -> Result<Blog, ServiceError> {
        if content.trim().is_empty() {
            return Err(ServiceError::validation("content must not be empty"));
        }

        let owner = self
            .users
            .find_by_name(author)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;

        let blog = self.blogs.insert(&Blog::new(content.to_string())).await?;

        if let Err(e) = self.ownership.insert(owner.id, blog.id).await {
            tracing::warn!(blog = %blog.id, error = %e, "blog left without an ownership record");
            return Err(LinkageError::OwnershipLinkFailed {
                blog_id: blog.id,
                reason: e.to_string(),
            }
            .into());
        }

        tracing::info!(blog = %blog.id, owner = %owner.name, "blog published");
        Ok(blog)
    }

    /// List the blogs owned by the named user.
    ///
    /// Resolves the name to a user row (a token for a deleted account fails
    /// here), collects that user's ownership records, then batch-fetches
    /// the referenced blogs.
    pub async fn list_for(&self, owner: &str) -> Result<Vec<Blog>, ServiceError> {
        let owner = self
            .users
            .find_by_name(owner)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;

        let records = self.ownership.find_by_user(owner.id).await?;
        let blog_ids: Vec<_> = records.iter().map(|r| r.blog_id).collect();
        Ok(self.blogs.find_by_ids(&blog_ids).await?)
    }

    /// Delete a blog by its id string. Returns the deleted count.
    ///
    /// Deliberately does not cascade: the blog's comments and its ownership
    /// record stay behind, as documented orphans.
    pub async fn delete(&self, id: &str) -> Result<u64, ServiceError> {
        let id = super::parse_id(id)?;
        Ok(self.blogs.delete_by_id(id).await?)
    }
}
