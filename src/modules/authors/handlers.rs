use std::borrow::Cow;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use libris_http::{AppError, AppResult, DataResponse, JsonBody, PathParam};
use tracing::{error, info, warn};
use validator::{Validate, ValidationError};

use super::models::{Author, AuthorCreateDto, AuthorDto, AuthorUpdateDto};
use super::AuthorsState;

pub async fn get_authors(State(state): State<AuthorsState>) -> AppResult<Json<Vec<AuthorDto>>> {
    info!("getting authors");

    let authors = state.authors.repository().find_all().await?;
    let dtos = state.mapper.map_all::<Author, AuthorDto>(&authors)?;

    info!(count = dtos.len(), "authors retrieved");
    Ok(Json(dtos))
}

pub async fn get_author(
    State(state): State<AuthorsState>,
    PathParam(id): PathParam<i64>,
) -> AppResult<Json<AuthorDto>> {
    info!(id, "getting author");

    let Some(author) = state.authors.repository().find_by_id(id).await? else {
        warn!(id, "author not found");
        return Err(AppError::not_found(format!("Author {id} was not found")));
    };

    Ok(Json(state.mapper.map::<Author, AuthorDto>(&author)?))
}

pub async fn create_author(
    State(state): State<AuthorsState>,
    JsonBody(body): JsonBody<AuthorCreateDto>,
) -> AppResult<Response> {
    let Some(input) = body else {
        warn!("author create rejected: empty body");
        return Err(AppError::bad_request("Request body is required"));
    };
    if let Err(errors) = input.validate() {
        warn!(error = %errors, "author create rejected by validation");
        return Err(errors.into());
    }

    let mut author = state.mapper.map::<AuthorCreateDto, Author>(&input)?;
    if !state.authors.repository().create(&mut author).await? {
        error!(
            firstname = %input.firstname,
            lastname = %input.lastname,
            "author could not be created"
        );
        return Err(AppError::internal("author create was not persisted"));
    }

    info!(id = author.id, "author created");
    let dto = state.mapper.map::<Author, AuthorDto>(&author)?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/authors/{}", dto.id))],
        Json(DataResponse::new(dto)),
    )
        .into_response())
}

pub async fn update_author(
    State(state): State<AuthorsState>,
    PathParam(id): PathParam<i64>,
    JsonBody(body): JsonBody<AuthorUpdateDto>,
) -> AppResult<StatusCode> {
    let Some(input) = body else {
        warn!(id, "author update rejected: empty body");
        return Err(AppError::bad_request("Request body is required"));
    };

    let mut errors = input.validate().err().unwrap_or_default();
    if id < 1 {
        errors.add("id", field_error("range", "Id must be a positive integer"));
    }
    match input.id {
        Some(body_id) if body_id == id => {}
        Some(_) => errors.add(
            "id",
            field_error("mismatch", "Body id does not match the id in the path"),
        ),
        None => errors.add("id", field_error("required", "Body id is required")),
    }
    if !errors.is_empty() {
        warn!(id, body_id = ?input.id, error = %errors, "author update rejected by validation");
        return Err(errors.into());
    }

    let author = state.mapper.map::<AuthorUpdateDto, Author>(&input)?;
    if !state.authors.repository().update(&author).await? {
        error!(id, "author could not be updated");
        return Err(AppError::internal(format!("author {id} update was not persisted")));
    }

    info!(id, "author updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_author(
    State(state): State<AuthorsState>,
    PathParam(id): PathParam<i64>,
) -> AppResult<StatusCode> {
    if id < 1 {
        warn!(id, "author delete rejected: invalid id");
        return Err(AppError::invalid_field("id", "range", "Id must be a positive integer"));
    }

    let mut authors = state.authors.repository();
    let Some(author) = authors.find_by_id(id).await? else {
        warn!(id, "author not found");
        return Err(AppError::not_found(format!("Author {id} was not found")));
    };

    if !authors.delete(&author).await? {
        error!(id, "author could not be deleted");
        return Err(AppError::internal(format!("author {id} delete was not persisted")));
    }

    info!(id, books = author.books.len(), "author deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}
