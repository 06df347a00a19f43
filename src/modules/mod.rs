pub mod authors;
pub mod books;
pub mod home;

use std::sync::Arc;

use libris_db::{Database, RepositoryFactory};
use libris_kernel::{Mapper, ModuleRegistry};

use authors::models::Author;
use books::models::Book;

/// Storage and mapping shared by the resource modules
#[derive(Clone)]
pub struct Services {
    pub authors: Arc<dyn RepositoryFactory<Author>>,
    pub books: Arc<dyn RepositoryFactory<Book>>,
    pub mapper: Arc<Mapper>,
}

impl Services {
    /// Services backed by SQLite tables
    pub fn from_database(db: &Database, mapper: Arc<Mapper>) -> Self {
        Self {
            authors: Arc::new(db.clone()),
            books: Arc::new(db.clone()),
            mapper,
        }
    }
}

/// Register all project-specific modules with the registry.
///
/// Authors come before books so the `books` table can reference `authors`.
pub fn register_all(registry: &mut ModuleRegistry, services: &Services) -> anyhow::Result<()> {
    registry.register(authors::create_module(authors::AuthorsState {
        authors: services.authors.clone(),
        mapper: services.mapper.clone(),
    }))?;
    registry.register(books::create_module(books::BooksState {
        books: services.books.clone(),
        authors: services.authors.clone(),
        mapper: services.mapper.clone(),
    }))?;
    registry.register(home::create_module())?;
    Ok(())
}
