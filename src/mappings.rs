//! Entity to transport mapping rules.

use libris_kernel::Mapper;

use crate::modules::authors::models::{Author, AuthorCreateDto, AuthorDto, AuthorUpdateDto};
use crate::modules::books::models::{Book, BookCreateDto, BookDto};

/// Every mapping rule the application uses. Each pair works in both directions.
pub fn maps() -> Mapper {
    Mapper::builder()
        .create_map::<Author, AuthorDto>()
        .create_map::<Author, AuthorCreateDto>()
        .create_map::<Author, AuthorUpdateDto>()
        .create_map::<Book, BookDto>()
        .create_map::<Book, BookCreateDto>()
        .build()
}
