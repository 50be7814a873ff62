use serde::Serialize;

/// Request payload of a persisted GraphQL operation.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphOperation<V> {
    pub id: String,
    pub variables: V,
}

impl<V: Serialize> GraphOperation<V> {
    pub fn new<S: Into<String>>(id: S, variables: V) -> Self {
        Self {
            id: id.into(),
            variables,
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentVariables {
    pub include_awards: bool,
    pub input: CreateCommentInput,
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    pub content: CommentContent,
    pub post_id: String,
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommentContent {
    pub markdown: String,
}

impl CreateCommentVariables {
    /// Variables for a markdown comment on `post_id` (e.g. `t3_1abcde`).
    #[must_use]
    pub fn new(message: &str, post_id: &str) -> Self {
        Self {
            include_awards: false,
            input: CreateCommentInput {
                content: CommentContent {
                    markdown: message.to_owned(),
                },
                post_id: post_id.to_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn create_comment_payload_shape() {
        let operation = GraphOperation::new(
            "op-create-comment",
            CreateCommentVariables::new("hello **world**", "t3_abc"),
        );

        assert_eq!(
            serde_json::to_value(&operation).expect("serialize"),
            json!({
                "id": "op-create-comment",
                "variables": {
                    "includeAwards": false,
                    "input": {
                        "content": { "markdown": "hello **world**" },
                        "postId": "t3_abc",
                    },
                },
            })
        );
    }
}
