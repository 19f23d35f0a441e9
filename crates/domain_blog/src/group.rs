//! Thematic groups that posts may belong to

use serde::{Deserialize, Serialize};

use core_kernel::GroupId;

/// A named community of posts, addressed by its slug
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Data required to create a group
#[derive(Debug, Clone)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl NewGroup {
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            description: description.into(),
        }
    }

    pub fn into_group(self) -> Group {
        Group {
            id: GroupId::new_v7(),
            title: self.title,
            slug: self.slug,
            description: self.description,
        }
    }
}
