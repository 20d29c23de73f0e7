/// State for each open document
#[derive(Debug, Clone)]
pub struct DocumentState {
    pub content: String,
    /// Language identifier reported by the editor in `didOpen`
    pub language_id: String,
}

impl DocumentState {
    pub fn new(content: String, language_id: String) -> Self {
        Self {
            content,
            language_id,
        }
    }

    /// Language identifier, or `None` when the editor sent an empty one.
    pub fn language(&self) -> Option<&str> {
        Some(self.language_id.as_str()).filter(|id| !id.is_empty())
    }
}
