//! Notes categories of a research session.

use crate::error::{InquiryError, Result};
use crate::report::Language;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Id of the category that always exists and receives notes by default.
pub const GENERAL_CATEGORY: &str = "general";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesCategory {
    pub name: String,
    #[serde(default)]
    pub content: String,
}

/// Notes categories keyed by id, kept in insertion order.
///
/// The `general` category is created with the collection and can be neither
/// renamed nor deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotesCategories(IndexMap<String, NotesCategory>);

impl NotesCategories {
    /// The starter set: general notes, sources, ideas.
    pub fn with_defaults(language: Language) -> Self {
        let names = match language {
            Language::Ru => ["Общие заметки", "Источники", "Идеи и мысли"],
            Language::En => ["General notes", "Sources", "Ideas"],
        };
        let mut map = IndexMap::new();
        for (id, name) in [GENERAL_CATEGORY, "sources", "ideas"].into_iter().zip(names) {
            map.insert(
                id.to_string(),
                NotesCategory {
                    name: name.to_string(),
                    content: String::new(),
                },
            );
        }
        Self(map)
    }

    pub fn get(&self, id: &str) -> Option<&NotesCategory> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &NotesCategory)> {
        self.0.iter()
    }

    pub fn set_content(&mut self, id: &str, content: impl Into<String>) -> Result<()> {
        let category = self
            .0
            .get_mut(id)
            .ok_or_else(|| InquiryError::not_found("NotesCategory", id))?;
        category.content = content.into();
        Ok(())
    }

    pub fn insert(&mut self, id: String, name: String) -> Result<()> {
        if self.0.contains_key(&id) {
            return Err(InquiryError::validation(format!(
                "notes category '{id}' already exists"
            )));
        }
        self.0.insert(
            id,
            NotesCategory {
                name,
                content: String::new(),
            },
        );
        Ok(())
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<()> {
        if id == GENERAL_CATEGORY {
            return Err(InquiryError::validation(
                "the general notes category cannot be renamed",
            ));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(InquiryError::validation("category name must not be empty"));
        }
        let category = self
            .0
            .get_mut(id)
            .ok_or_else(|| InquiryError::not_found("NotesCategory", id))?;
        category.name = name.to_string();
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<NotesCategory> {
        if id == GENERAL_CATEGORY {
            return Err(InquiryError::validation(
                "the general notes category cannot be deleted",
            ));
        }
        self.0
            .shift_remove(id)
            .ok_or_else(|| InquiryError::not_found("NotesCategory", id))
    }

    /// All non-empty category contents joined by blank lines.
    pub fn joined_text(&self) -> String {
        self.0
            .values()
            .map(|c| c.content.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for NotesCategories {
    fn default() -> Self {
        Self::with_defaults(Language::default())
    }
}
