use crate::common::UserId;

/// Actions gated by the moderation workflow.
///
/// Admin-only capabilities carry no data. Ownership capabilities carry the
/// author of the post being touched so the check can compare subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability<'a> {
    /// Approve, reject or otherwise change a blog's status
    ModerateBlogs,

    /// List every blog regardless of status, delete any blog, bulk delete
    ManageAllBlogs,

    /// Read aggregate counts
    ViewStats,

    /// List users and change their stored role
    ManageUsers,

    /// Read the status history log
    ViewHistory,

    /// Read a blog that is not yet approved
    ViewUnpublishedBlog { author_id: &'a UserId },

    /// Change a blog's content fields
    EditBlog { author_id: &'a UserId },

    /// Delete a single blog
    DeleteBlog { author_id: &'a UserId },
}

impl Capability<'_> {
    /// Check if this capability requires admin access
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Capability::ModerateBlogs
                | Capability::ManageAllBlogs
                | Capability::ViewStats
                | Capability::ManageUsers
                | Capability::ViewHistory
        )
    }

    /// Author of the blog this capability applies to, if any.
    pub fn owner(&self) -> Option<&UserId> {
        match self {
            Capability::ViewUnpublishedBlog { author_id }
            | Capability::EditBlog { author_id }
            | Capability::DeleteBlog { author_id } => Some(author_id),
            _ => None,
        }
    }
}
