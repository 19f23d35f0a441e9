//! Post detail and post form

use serde::Serialize;

use domain_blog::{CommentForm, FieldSpec, Group, PostDetail, PostEntry, PostForm};

use super::{CommentView, GroupView, PostView};

#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    pub title: String,
    pub post: PostView,
    pub author_posts_count: u64,
    pub comments: Vec<CommentView>,
    pub comment_form: Vec<FieldSpec>,
    /// Whether the viewer wrote this post
    pub can_edit: bool,
}

impl PostDetailResponse {
    pub fn new(detail: PostDetail, can_edit: bool) -> Self {
        let title = detail.entry.post.text.chars().take(30).collect();
        Self {
            title,
            post: detail.entry.into(),
            author_posts_count: detail.author_posts_count,
            comments: detail.comments.into_iter().map(CommentView::from).collect(),
            comment_form: CommentForm::fields(),
            can_edit,
        }
    }
}

/// The create/edit form
#[derive(Debug, Serialize)]
pub struct PostFormResponse {
    pub is_edit: bool,
    pub fields: Vec<FieldSpec>,
    /// Choices of the `group` field
    pub groups: Vec<GroupView>,
    /// The post being edited
    pub post: Option<PostView>,
}

impl PostFormResponse {
    pub fn create(groups: Vec<Group>) -> Self {
        Self {
            is_edit: false,
            fields: PostForm::fields(),
            groups: groups.into_iter().map(GroupView::from).collect(),
            post: None,
        }
    }

    pub fn edit(groups: Vec<Group>, entry: PostEntry) -> Self {
        Self {
            is_edit: true,
            post: Some(entry.into()),
            ..Self::create(groups)
        }
    }
}
