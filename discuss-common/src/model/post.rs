use crate::{
    form::{FieldErrors, FieldRules, Rule, Submission},
    model::{
        Id,
        topic::TopicMarker,
        user::{User, UserMarker},
    },
};
use serde::{Deserialize, Serialize};

pub const TITLE_RULES: FieldRules = FieldRules {
    name: "title",
    rules: &[Rule::MinChars(3)],
};
pub const CONTENT_RULES: FieldRules = FieldRules {
    name: "content",
    rules: &[Rule::MinChars(10)],
};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub topic_id: Id<TopicMarker>,
    pub author: User,
    #[serde(flatten)]
    pub content: PostContent,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct PartialPost {
    pub id: Id<PostMarker>,
    pub topic_id: Id<TopicMarker>,
    pub author_id: Id<UserMarker>,
    #[serde(flatten)]
    pub content: PostContent,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct CreatePost {
    pub topic_id: Id<TopicMarker>,
    pub author_id: Id<UserMarker>,
    pub content: PostContent,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct PostContent {
    pub title: String,
    pub content: String,
}

impl PostContent {
    /// Checks a raw submission against the post rules, reporting every violation at once.
    pub fn validate(submission: &Submission) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = TITLE_RULES.check(submission, &mut errors);
        let content = CONTENT_RULES.check(submission, &mut errors);

        match (title, content) {
            (Some(title), Some(content)) => Ok(Self { title, content }),
            _ => Err(errors),
        }
    }
}
