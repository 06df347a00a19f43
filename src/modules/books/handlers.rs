use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use libris_http::{AppError, AppResult, DataResponse, JsonBody, PathParam};
use tracing::{error, info, warn};
use validator::Validate;

use super::models::{Book, BookCreateDto, BookDto};
use super::BooksState;

pub async fn get_books(State(state): State<BooksState>) -> AppResult<Json<Vec<BookDto>>> {
    info!("getting books");

    let books = state.books.repository().find_all().await?;
    Ok(Json(state.mapper.map_all::<Book, BookDto>(&books)?))
}

pub async fn get_book(
    State(state): State<BooksState>,
    PathParam(id): PathParam<i64>,
) -> AppResult<Json<BookDto>> {
    info!(id, "getting book");

    let Some(book) = state.books.repository().find_by_id(id).await? else {
        warn!(id, "book not found");
        return Err(AppError::not_found(format!("Book {id} was not found")));
    };

    Ok(Json(state.mapper.map::<Book, BookDto>(&book)?))
}

pub async fn create_book(
    State(state): State<BooksState>,
    JsonBody(body): JsonBody<BookCreateDto>,
) -> AppResult<Response> {
    let Some(input) = body else {
        warn!("book create rejected: empty body");
        return Err(AppError::bad_request("Request body is required"));
    };
    if let Err(errors) = input.validate() {
        warn!(error = %errors, "book create rejected by validation");
        return Err(errors.into());
    }
    if !state.authors.repository().exists(input.author_id).await? {
        warn!(author_id = input.author_id, "book create rejected: unknown author");
        return Err(AppError::invalid_field(
            "author_id",
            "unknown",
            format!("Author {} does not exist", input.author_id),
        ));
    }

    let mut book = state.mapper.map::<BookCreateDto, Book>(&input)?;
    if !state.books.repository().create(&mut book).await? {
        error!(
            author_id = input.author_id,
            title = %input.title,
            "book could not be created"
        );
        return Err(AppError::internal("book create was not persisted"));
    }

    info!(id = book.id, author_id = book.author_id, "book created");
    let dto = state.mapper.map::<Book, BookDto>(&book)?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/books/{}", dto.id))],
        Json(DataResponse::new(dto)),
    )
        .into_response())
}
