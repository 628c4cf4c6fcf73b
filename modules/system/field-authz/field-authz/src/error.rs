//! Field-scoped `ServerError`s for denials and policy engine failures.

use std::iter;

use async_graphql::extensions::ResolveInfo;
use async_graphql::parser::types::Field;
use async_graphql::{PathSegment, Pos, QueryPathNode, QueryPathSegment, ServerError};

/// Error for the field being resolved, with its full response path and its
/// location in the document.
pub fn field_error(message: impl Into<String>, info: &ResolveInfo<'_>) -> ServerError {
    let mut error = ServerError::new(message, Some(field_pos(info.field)));
    error.path = response_path(info.path_node);
    error
}

/// Error for a root field refused before execution starts.
pub fn root_field_error(message: impl Into<String>, field: &Field) -> ServerError {
    let mut error = ServerError::new(message, Some(field_pos(field)));
    error.path = vec![PathSegment::Field(field.response_key().node.to_string())];
    error
}

/// Start of the field in the document: its alias if it has one, its name otherwise.
fn field_pos(field: &Field) -> Pos {
    field
        .alias
        .as_ref()
        .map_or(field.name.pos, |alias| alias.pos)
}

/// Root-to-leaf response path, list indices included.
fn response_path(node: &QueryPathNode<'_>) -> Vec<PathSegment> {
    let mut path: Vec<_> = iter::once(node)
        .chain(node.parents())
        .map(|node| match node.segment {
            QueryPathSegment::Index(index) => PathSegment::Index(index),
            QueryPathSegment::Name(name) => PathSegment::Field(name.to_owned()),
        })
        .collect();
    path.reverse();
    path
}
