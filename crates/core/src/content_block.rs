//! Typed lesson content blocks.
//!
//! Lessons store their body as a JSON array of blocks, each tagged by
//! `type`. The set of block kinds is closed; an unknown tag fails
//! deserialization instead of being carried through as opaque JSON.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum number of blocks a single lesson may hold.
pub const MAX_BLOCKS_PER_LESSON: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeContent {
    pub code: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoContent {
    #[serde(alias = "youtubeUrl")]
    pub youtube_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabRecipeContent {
    pub title: String,
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCardContent {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Title-only payload shared by the placeholder blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderContent {
    pub title: String,
}

/// One unit of lesson content.
///
/// Serialized as `{ "id": .., "type": "code", "order": .., "content": {..} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        id: String,
        order: i32,
        content: TextContent,
    },
    Code {
        id: String,
        order: i32,
        content: CodeContent,
    },
    Video {
        id: String,
        order: i32,
        content: VideoContent,
    },
    Image {
        id: String,
        order: i32,
        content: ImageContent,
    },
    LabRecipe {
        id: String,
        order: i32,
        content: LabRecipeContent,
    },
    ResourceCard {
        id: String,
        order: i32,
        content: ResourceCardContent,
    },
    QuizPlaceholder {
        id: String,
        order: i32,
        content: PlaceholderContent,
    },
    AiChatPlaceholder {
        id: String,
        order: i32,
        content: PlaceholderContent,
    },
}

impl ContentBlock {
    pub fn id(&self) -> &str {
        match self {
            ContentBlock::Text { id, .. }
            | ContentBlock::Code { id, .. }
            | ContentBlock::Video { id, .. }
            | ContentBlock::Image { id, .. }
            | ContentBlock::LabRecipe { id, .. }
            | ContentBlock::ResourceCard { id, .. }
            | ContentBlock::QuizPlaceholder { id, .. }
            | ContentBlock::AiChatPlaceholder { id, .. } => id,
        }
    }

    pub fn order(&self) -> i32 {
        match self {
            ContentBlock::Text { order, .. }
            | ContentBlock::Code { order, .. }
            | ContentBlock::Video { order, .. }
            | ContentBlock::Image { order, .. }
            | ContentBlock::LabRecipe { order, .. }
            | ContentBlock::ResourceCard { order, .. }
            | ContentBlock::QuizPlaceholder { order, .. }
            | ContentBlock::AiChatPlaceholder { order, .. } => *order,
        }
    }

    /// The `type` tag as stored.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Text { .. } => "text",
            ContentBlock::Code { .. } => "code",
            ContentBlock::Video { .. } => "video",
            ContentBlock::Image { .. } => "image",
            ContentBlock::LabRecipe { .. } => "lab_recipe",
            ContentBlock::ResourceCard { .. } => "resource_card",
            ContentBlock::QuizPlaceholder { .. } => "quiz_placeholder",
            ContentBlock::AiChatPlaceholder { .. } => "ai_chat_placeholder",
        }
    }

    /// Payload fields that must not be blank, as `(field, value)` pairs.
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            ContentBlock::Text { .. } => vec![],
            ContentBlock::Code { content, .. } => vec![("language", content.language.as_str())],
            ContentBlock::Video { content, .. } => {
                vec![("youtube_url", content.youtube_url.as_str())]
            }
            ContentBlock::Image { content, .. } => vec![("url", content.url.as_str())],
            ContentBlock::LabRecipe { content, .. } => vec![("title", content.title.as_str())],
            ContentBlock::ResourceCard { content, .. } => vec![
                ("title", content.title.as_str()),
                ("url", content.url.as_str()),
            ],
            ContentBlock::QuizPlaceholder { content, .. }
            | ContentBlock::AiChatPlaceholder { content, .. } => {
                vec![("title", content.title.as_str())]
            }
        }
    }
}

/// Validate a lesson's blocks before they are written.
///
/// Ids must be non-blank and unique, `order` values non-negative and
/// unique, and each block's required payload fields non-blank.
pub fn validate_blocks(blocks: &[ContentBlock]) -> Result<(), CoreError> {
    if blocks.len() > MAX_BLOCKS_PER_LESSON {
        return Err(CoreError::Validation(format!(
            "A lesson may hold at most {MAX_BLOCKS_PER_LESSON} blocks, got {}",
            blocks.len()
        )));
    }

    let mut ids = HashSet::with_capacity(blocks.len());
    let mut orders = HashSet::with_capacity(blocks.len());

    for block in blocks {
        let id = block.id();
        if id.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "A {} block has an empty id",
                block.kind()
            )));
        }
        if !ids.insert(id) {
            return Err(CoreError::Validation(format!("Duplicate block id '{id}'")));
        }
        if block.order() < 0 {
            return Err(CoreError::Validation(format!(
                "Block '{id}' has negative order {}",
                block.order()
            )));
        }
        if !orders.insert(block.order()) {
            return Err(CoreError::Validation(format!(
                "Block '{id}' repeats order {}",
                block.order()
            )));
        }
        for (field, value) in block.required_fields() {
            if value.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "Block '{id}' ({}) requires a non-empty {field}",
                    block.kind()
                )));
            }
        }
    }
    Ok(())
}

/// Blocks in display order, for read-only consumers.
pub fn sorted_blocks(blocks: &[ContentBlock]) -> Vec<ContentBlock> {
    let mut sorted = blocks.to_vec();
    sorted.sort_by_key(ContentBlock::order);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn text(id: &str, order: i32) -> ContentBlock {
        ContentBlock::Text {
            id: id.into(),
            order,
            content: TextContent {
                html: "<p>hi</p>".into(),
            },
        }
    }

    #[test]
    fn deserializes_tagged_code_block() {
        let block: ContentBlock = serde_json::from_value(json!({
            "id": "b1",
            "type": "code",
            "order": 0,
            "content": { "code": "docker ps", "language": "bash" }
        }))
        .unwrap();
        assert_eq!(block.kind(), "code");
        assert_eq!(block.id(), "b1");
        assert_matches!(block, ContentBlock::Code { content, .. } if content.language == "bash");
    }

    #[test]
    fn video_accepts_camel_case_url() {
        let block: ContentBlock = serde_json::from_value(json!({
            "id": "v", "type": "video", "order": 1,
            "content": { "youtubeUrl": "https://youtu.be/x" }
        }))
        .unwrap();
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["content"]["youtube_url"], "https://youtu.be/x");
        assert_eq!(value["type"], "video");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result: Result<ContentBlock, _> = serde_json::from_value(json!({
            "id": "x", "type": "iframe", "order": 0, "content": {}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn valid_blocks_pass() {
        assert!(validate_blocks(&[text("a", 0), text("b", 1)]).is_ok());
        assert!(validate_blocks(&[]).is_ok());
    }

    #[test]
    fn duplicate_ids_fail() {
        let err = validate_blocks(&[text("a", 0), text("a", 1)]).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("Duplicate"));
    }

    #[test]
    fn repeated_order_fails() {
        assert!(validate_blocks(&[text("a", 0), text("b", 0)]).is_err());
    }

    #[test]
    fn blank_required_field_fails() {
        let block = ContentBlock::Image {
            id: "img".into(),
            order: 0,
            content: ImageContent {
                url: "  ".into(),
                alt: None,
                caption: None,
            },
        };
        let err = validate_blocks(&[block]).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("url"));
    }

    #[test]
    fn sorted_by_order() {
        let sorted = sorted_blocks(&[text("late", 5), text("early", 1)]);
        assert_eq!(sorted[0].id(), "early");
        assert_eq!(sorted[1].id(), "late");
    }
}
