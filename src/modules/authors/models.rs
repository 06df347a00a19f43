use async_trait::async_trait;
use libris_db::{fetch_children, Entity, SqlEntity, SqlValue};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use validator::Validate;

use crate::modules::books::models::{Book, BookDto};
use crate::utils::not_blank;

/// A writer and the books they own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub bio: Option<String>,
    /// Loaded with the author on every read; not a column
    #[sqlx(skip)]
    #[serde(default)]
    pub books: Vec<Book>,
}

impl Entity for Author {
    const NAME: &'static str = "author";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

#[async_trait]
impl SqlEntity for Author {
    const TABLE: &'static str = "authors";
    const COLUMNS: &'static [&'static str] = &["firstname", "lastname", "bio"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.firstname.clone().into(),
            self.lastname.clone().into(),
            self.bio.clone().into(),
        ]
    }

    async fn load_related(rows: &mut [Self], pool: &SqlitePool) -> Result<(), sqlx::Error> {
        let ids: Vec<i64> = rows.iter().map(|author| author.id).collect();
        let books = fetch_children::<Book>(pool, "author_id", &ids).await?;

        for author in rows.iter_mut() {
            author.books = books
                .iter()
                .filter(|book| book.author_id == author.id)
                .cloned()
                .collect();
        }
        Ok(())
    }
}

/// Read shape of an author, books included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorDto {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub books: Vec<BookDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AuthorCreateDto {
    #[validate(custom(function = "not_blank"))]
    pub firstname: String,
    #[validate(custom(function = "not_blank"))]
    pub lastname: String,
    pub bio: Option<String>,
}

/// Replacement fields for an existing author. `id`, when present, must match
/// the id in the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AuthorUpdateDto {
    pub id: Option<i64>,
    #[validate(custom(function = "not_blank"))]
    pub firstname: String,
    #[validate(custom(function = "not_blank"))]
    pub lastname: String,
    pub bio: Option<String>,
}
