//! Operation of a parsed request.

use std::collections::HashSet;

use async_graphql::parser::Positioned;
use async_graphql::parser::types::{
    DocumentOperations, ExecutableDocument, Field, OperationDefinition, OperationType, Selection,
    SelectionSet,
};
use field_authz_sdk::Operation;

/// Operation the engine will execute.
///
/// Follows the engine's own selection: the named operation when a name is
/// requested, otherwise the document's only operation. `None` when that
/// selection fails; the engine rejects such requests itself.
pub fn select_definition<'a>(
    document: &'a ExecutableDocument,
    operation_name: Option<&str>,
) -> Option<&'a OperationDefinition> {
    let definition = match (&document.operations, operation_name) {
        (DocumentOperations::Single(definition), None) => definition,
        (DocumentOperations::Multiple(definitions), Some(name)) => definitions.get(name)?,
        (DocumentOperations::Multiple(definitions), None) if definitions.len() == 1 => {
            definitions.values().next()?
        }
        _ => return None,
    };
    Some(&definition.node)
}

/// Kind of the operation the engine will execute, see [`select_definition`].
pub fn select_operation(
    document: &ExecutableDocument,
    operation_name: Option<&str>,
) -> Option<Operation> {
    select_definition(document, operation_name).map(|definition| operation_kind(definition.ty))
}

/// Root fields of an operation, fragment spreads and inline fragments expanded.
///
/// Runs before validation, so a fragment is expanded at most once and unknown
/// fragments are skipped.
pub fn root_fields<'a>(
    document: &'a ExecutableDocument,
    definition: &'a OperationDefinition,
) -> Vec<&'a Positioned<Field>> {
    let mut fields = Vec::new();
    let mut expanded = HashSet::new();
    collect_fields(
        document,
        &definition.selection_set.node,
        &mut expanded,
        &mut fields,
    );
    fields
}

fn collect_fields<'a>(
    document: &'a ExecutableDocument,
    selection_set: &'a SelectionSet,
    expanded: &mut HashSet<&'a str>,
    fields: &mut Vec<&'a Positioned<Field>>,
) {
    for selection in &selection_set.items {
        match &selection.node {
            Selection::Field(field) => fields.push(field),
            Selection::InlineFragment(fragment) => {
                collect_fields(document, &fragment.node.selection_set.node, expanded, fields);
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.node.fragment_name.node.as_str();
                if !expanded.insert(name) {
                    continue;
                }
                if let Some(fragment) = document.fragments.get(name) {
                    collect_fields(document, &fragment.node.selection_set.node, expanded, fields);
                }
            }
        }
    }
}

fn operation_kind(ty: OperationType) -> Operation {
    match ty {
        OperationType::Query => Operation::Query,
        OperationType::Mutation => Operation::Mutation,
        OperationType::Subscription => Operation::Subscription,
    }
}
