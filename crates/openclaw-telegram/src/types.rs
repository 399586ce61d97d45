use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TgMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgMessage {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub document: Option<FileRef>,
    #[serde(default)]
    pub photo: Option<Vec<FileRef>>,
    #[serde(default)]
    pub voice: Option<FileRef>,
    #[serde(default)]
    pub video: Option<FileRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileRef {
    pub file_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl TgMessage {
    /// The first attachment present on this message, if any (§4.6 step 3:
    /// document, photo, voice, or video — checked in that order).
    pub fn attachment(&self) -> Option<(&str, &str)> {
        if let Some(doc) = &self.document {
            return Some((doc.file_id.as_str(), "document"));
        }
        if let Some(photos) = &self.photo {
            if let Some(largest) = photos.last() {
                return Some((largest.file_id.as_str(), "photo"));
            }
        }
        if let Some(voice) = &self.voice {
            return Some((voice.file_id.as_str(), "voice"));
        }
        if let Some(video) = &self.video {
            return Some((video.file_id.as_str(), "video"));
        }
        None
    }
}

#[derive(Debug, Serialize)]
pub struct ReactionTypeEmoji<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub emoji: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_prefers_document_over_photo() {
        let msg = TgMessage {
            message_id: 1,
            chat: Chat { id: 1 },
            from: None,
            text: None,
            document: Some(FileRef {
                file_id: "doc1".to_string(),
                file_name: Some("a.pdf".to_string()),
            }),
            photo: Some(vec![FileRef {
                file_id: "photo1".to_string(),
                file_name: None,
            }]),
            voice: None,
            video: None,
        };
        assert_eq!(msg.attachment(), Some(("doc1", "document")));
    }

    #[test]
    fn attachment_picks_largest_photo() {
        let msg = TgMessage {
            message_id: 1,
            chat: Chat { id: 1 },
            from: None,
            text: None,
            document: None,
            photo: Some(vec![
                FileRef {
                    file_id: "small".to_string(),
                    file_name: None,
                },
                FileRef {
                    file_id: "large".to_string(),
                    file_name: None,
                },
            ]),
            voice: None,
            video: None,
        };
        assert_eq!(msg.attachment(), Some(("large", "photo")));
    }

    #[test]
    fn attachment_none_for_text_only_message() {
        let msg = TgMessage {
            message_id: 1,
            chat: Chat { id: 1 },
            from: None,
            text: Some("hi".to_string()),
            document: None,
            photo: None,
            voice: None,
            video: None,
        };
        assert_eq!(msg.attachment(), None);
    }
}
