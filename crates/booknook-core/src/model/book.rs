// ── Book domain type ──

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: Option<i32>,
    pub image_url: Option<String>,
    /// Computed by the server from open loans. Only a re-fetch changes it.
    pub available: bool,
}

impl Book {
    /// Case-insensitive substring match over title and author.
    /// An empty needle matches every book.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.author.to_lowercase().contains(&needle)
    }
}
