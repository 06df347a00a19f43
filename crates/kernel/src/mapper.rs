//! Declarative, bidirectional object mapping between entities and transport shapes.
//!
//! A [`Mapper`] holds one rule per ordered type pair. Registering a pair with
//! [`MapperBuilder::create_map`] installs both directions. Each rule keeps the
//! field-correspondence table computed at registration: the serialized field
//! names both sides share. Mapping copies exactly those fields from the source
//! onto a defaulted target, so fields present on one side only stay at their
//! default value.
//!
//! ```ignore
//! let mapper = Mapper::builder()
//!     .create_map::<Author, AuthorDto>()
//!     .build();
//! let dto: AuthorDto = mapper.map(&author)?;
//! ```

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while translating between shapes
#[derive(Debug, Error)]
pub enum MapError {
    #[error("no mapping registered from {source_type} to {target_type}")]
    MissingRule {
        source_type: &'static str,
        target_type: &'static str,
    },

    #[error("{type_name} does not serialize to a JSON object")]
    NotAnObject { type_name: &'static str },

    #[error("failed to map {source_type} to {target_type}: {error}")]
    Shape {
        source_type: &'static str,
        target_type: &'static str,
        #[source]
        error: serde_json::Error,
    },
}

/// Field-correspondence table for one direction of a type pair.
#[derive(Debug, Clone)]
pub struct MapRule {
    source: &'static str,
    target: &'static str,
    fields: Vec<String>,
}

impl MapRule {
    /// Shared field names, in serialized key order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// Registry of type-pair mapping rules.
#[derive(Debug, Default)]
pub struct Mapper {
    rules: HashMap<(TypeId, TypeId), MapRule>,
}

impl Mapper {
    pub fn builder() -> MapperBuilder {
        MapperBuilder::default()
    }

    /// Rule registered for `S -> D`, if any
    pub fn rule<S: 'static, D: 'static>(&self) -> Option<&MapRule> {
        self.rules.get(&(TypeId::of::<S>(), TypeId::of::<D>()))
    }

    pub fn has_rule<S: 'static, D: 'static>(&self) -> bool {
        self.rule::<S, D>().is_some()
    }

    /// Map a single value into a new `D`. The source is never modified.
    pub fn map<S, D>(&self, source: &S) -> Result<D, MapError>
    where
        S: Serialize + 'static,
        D: Serialize + DeserializeOwned + Default + 'static,
    {
        let rule = self.rule::<S, D>().ok_or(MapError::MissingRule {
            source_type: type_name::<S>(),
            target_type: type_name::<D>(),
        })?;

        let source_fields = to_object(source, type_name::<S>())?;
        let mut target_fields = to_object(&D::default(), type_name::<D>())?;

        for field in &rule.fields {
            if let Some(value) = source_fields.get(field) {
                target_fields.insert(field.clone(), value.clone());
            }
        }

        serde_json::from_value(Value::Object(target_fields)).map_err(|error| MapError::Shape {
            source_type: rule.source,
            target_type: rule.target,
            error,
        })
    }

    /// Map a slice, preserving source order
    pub fn map_all<S, D>(&self, sources: &[S]) -> Result<Vec<D>, MapError>
    where
        S: Serialize + 'static,
        D: Serialize + DeserializeOwned + Default + 'static,
    {
        sources.iter().map(|source| self.map(source)).collect()
    }
}

/// Builder collecting rules before the mapper is frozen.
#[derive(Debug, Default)]
pub struct MapperBuilder {
    rules: HashMap<(TypeId, TypeId), MapRule>,
}

impl MapperBuilder {
    /// Register `A <-> B`.
    ///
    /// # Panics
    ///
    /// Panics if either type does not serialize to a JSON object. Rules are
    /// registered at startup, so this is a programming error.
    pub fn create_map<A, B>(mut self) -> Self
    where
        A: Serialize + DeserializeOwned + Default + 'static,
        B: Serialize + DeserializeOwned + Default + 'static,
    {
        let a_fields = field_names::<A>();
        let b_fields = field_names::<B>();

        let forward: Vec<String> = b_fields
            .iter()
            .filter(|name| a_fields.contains(name))
            .cloned()
            .collect();
        let reverse: Vec<String> = a_fields
            .iter()
            .filter(|name| b_fields.contains(name))
            .cloned()
            .collect();

        tracing::debug!(
            source = type_name::<A>(),
            target = type_name::<B>(),
            fields = ?forward,
            "mapping rule registered"
        );

        self.rules.insert(
            (TypeId::of::<A>(), TypeId::of::<B>()),
            MapRule {
                source: type_name::<A>(),
                target: type_name::<B>(),
                fields: forward,
            },
        );
        self.rules.insert(
            (TypeId::of::<B>(), TypeId::of::<A>()),
            MapRule {
                source: type_name::<B>(),
                target: type_name::<A>(),
                fields: reverse,
            },
        );
        self
    }

    pub fn build(self) -> Mapper {
        Mapper { rules: self.rules }
    }
}

fn to_object<T: Serialize>(value: &T, name: &'static str) -> Result<Map<String, Value>, MapError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => Ok(fields),
        _ => Err(MapError::NotAnObject { type_name: name }),
    }
}

fn field_names<T: Serialize + Default>() -> Vec<String> {
    match to_object(&T::default(), type_name::<T>()) {
        Ok(fields) => fields.keys().cloned().collect(),
        Err(err) => panic!("cannot register mapping: {err}"),
    }
}
