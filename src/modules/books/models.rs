use async_trait::async_trait;
use libris_db::{Entity, SqlEntity, SqlValue};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::not_blank;

/// A published work, owned by exactly one author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub year: Option<i64>,
    pub isbn: Option<String>,
    pub summary: Option<String>,
    /// Owning author; a book never owns its author
    pub author_id: i64,
}

impl Entity for Book {
    const NAME: &'static str = "book";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

#[async_trait]
impl SqlEntity for Book {
    const TABLE: &'static str = "books";
    const COLUMNS: &'static [&'static str] = &["title", "year", "isbn", "summary", "author_id"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.title.clone().into(),
            self.year.into(),
            self.isbn.clone().into(),
            self.summary.clone().into(),
            self.author_id.into(),
        ]
    }
}

/// Read shape of a book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
    pub id: i64,
    pub title: String,
    pub year: Option<i64>,
    pub isbn: Option<String>,
    pub summary: Option<String>,
    pub author_id: i64,
}

/// Fields a client may set when adding a book.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BookCreateDto {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(range(min = 0, max = 9999))]
    pub year: Option<i64>,
    #[validate(length(min = 10, max = 17))]
    pub isbn: Option<String>,
    pub summary: Option<String>,
    #[validate(range(min = 1))]
    pub author_id: i64,
}
