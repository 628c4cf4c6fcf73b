//! `async-graphql` extension running the field enforcer on every field.

use std::iter;
use std::sync::Arc;

use async_graphql::extensions::{
    Extension, ExtensionContext, ExtensionFactory, NextExecute, NextParseQuery,
    NextPrepareRequest, NextResolve, ResolveInfo,
};
use async_graphql::parser::types::ExecutableDocument;
use async_graphql::{
    Data, QueryPathNode, QueryPathSegment, Request, Response, ServerError, ServerResult, Value,
    Variables,
};
use dashmap::DashMap;
use field_authz_sdk::{
    Decision, FieldEnforcer, Operation, PathKey, PolicyEngine, PolicyEngineError,
    RequestContext, Role, resolve_path_from_leaf,
};
use parking_lot::{Mutex, RwLock};

use crate::config::{FieldAuthzConfig, IntrospectionPolicy};
use crate::error::{field_error, root_field_error};
use crate::operation::{root_fields, select_definition, select_operation};

/// Role a request was authorized as.
///
/// Inserted into the execution data when
/// [`publish_role`](FieldAuthzConfig::publish_role) is on, so resolvers can
/// read it with `ctx.data::<EffectiveRole>()`. Requests without a role see
/// the anonymous sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveRole(Role);

impl EffectiveRole {
    #[must_use]
    pub fn role(&self) -> &Role {
        &self.0
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Field authorization extension factory.
///
/// Register once per schema with `SchemaBuilder::extension`. The role is read
/// from the [`RequestContext`] in the request, session or schema data; a
/// request without one is anonymous.
#[derive(Clone)]
pub struct FieldAuthz {
    enforcer: FieldEnforcer,
    config: FieldAuthzConfig,
}

impl FieldAuthz {
    #[must_use]
    pub fn new(engine: Arc<dyn PolicyEngine>) -> Self {
        Self::from_enforcer(FieldEnforcer::new(engine))
    }

    #[must_use]
    pub fn from_enforcer(enforcer: FieldEnforcer) -> Self {
        Self {
            enforcer,
            config: FieldAuthzConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: FieldAuthzConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> &FieldAuthzConfig {
        &self.config
    }
}

impl std::fmt::Debug for FieldAuthz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldAuthz")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ExtensionFactory for FieldAuthz {
    fn create(&self) -> Arc<dyn Extension> {
        Arc::new(FieldAuthzExtension::new(self.enforcer.clone(), self.config))
    }
}

/// Per-request state. Created for every request and every subscription.
struct FieldAuthzExtension {
    enforcer: FieldEnforcer,
    config: FieldAuthzConfig,
    operation_name: Mutex<Option<String>>,
    operation: RwLock<Option<Operation>>,
    /// Decisions by canonical path, for one execution.
    decisions: DashMap<String, Decision>,
    /// Canonical path by response position (indices included), only where an
    /// alias makes the canonical path differ from the response keys.
    aliased: DashMap<String, String>,
    /// Errors of nullable denied fields, appended to the response on the way out.
    deferred: Mutex<Vec<ServerError>>,
}

impl FieldAuthzExtension {
    fn new(enforcer: FieldEnforcer, config: FieldAuthzConfig) -> Self {
        Self {
            enforcer,
            config,
            operation_name: Mutex::new(None),
            operation: RwLock::new(None),
            decisions: DashMap::new(),
            aliased: DashMap::new(),
            deferred: Mutex::new(Vec::new()),
        }
    }

    /// Canonical path of the field being resolved: field names (not response
    /// keys) joined with `.`, list indices elided.
    fn canonical_path(&self, info: &ResolveInfo<'_>) -> String {
        let parent = info
            .path_node
            .parents()
            .find(|node| matches!(node.segment, QueryPathSegment::Name(_)));

        let canonical = match parent {
            None => info.name.to_owned(),
            Some(parent) => {
                let parent_path = self
                    .aliased
                    .get(&response_position(parent))
                    .map_or_else(|| response_key_path(parent), |path| path.value().clone());
                format!("{parent_path}.{}", info.name)
            }
        };

        if response_key_path(info.path_node) != canonical {
            self.aliased
                .insert(response_position(info.path_node), canonical.clone());
        }
        canonical
    }

    fn decide(
        &self,
        role: Option<&Role>,
        path: &str,
        operation: Operation,
    ) -> Result<Decision, PolicyEngineError> {
        if !self.config.cache_decisions {
            return self.enforcer.decide(role, path, operation);
        }

        let decision = self
            .decisions
            .entry(path.to_owned())
            .or_try_insert_with(|| self.enforcer.decide(role, path, operation))?;
        Ok(decision.value().clone())
    }

    /// `__typename` never gets here: the engine answers it without a resolve hook.
    fn is_introspection(info: &ResolveInfo<'_>) -> bool {
        info.is_for_introspection || info.name.starts_with("__")
    }

    /// Check the root fields of a subscription before any stream is opened.
    fn authorize_subscription(
        &self,
        ctx: &ExtensionContext<'_>,
        document: &ExecutableDocument,
    ) -> ServerResult<()> {
        let operation_name = self.operation_name.lock().clone();
        let Some(definition) = select_definition(document, operation_name.as_deref()) else {
            return Ok(());
        };
        let role = ctx.data_opt::<RequestContext>().and_then(RequestContext::role);
        let allow_introspection = self.config.introspection == IntrospectionPolicy::Allow;

        for field in root_fields(document, definition) {
            let name = field.node.name.node.as_str();
            if allow_introspection && name.starts_with("__") {
                continue;
            }
            match self.enforcer.decide(role, name, Operation::Subscription) {
                Ok(Decision::Allowed) => {}
                Ok(Decision::Denied(denied)) => {
                    return Err(root_field_error(denied.to_string(), &field.node));
                }
                Err(e) => return Err(root_field_error(e.to_string(), &field.node)),
            }
        }
        Ok(())
    }

    /// Null for nullable fields with the error kept for the response; the
    /// error itself for non-null fields, leaving propagation to the engine.
    fn reject(&self, error: ServerError, info: &ResolveInfo<'_>) -> ServerResult<Option<Value>> {
        if info.return_type.ends_with('!') {
            return Err(error);
        }
        self.deferred.lock().push(error);
        Ok(Some(Value::Null))
    }
}

/// The resolve hook also runs for every list element, on the index node.
fn is_list_item(info: &ResolveInfo<'_>) -> bool {
    matches!(info.path_node.segment, QueryPathSegment::Index(_))
}

/// Full response position, e.g. `items.1.x`. Unique per resolved field.
fn response_position(node: &QueryPathNode<'_>) -> String {
    let mut segments: Vec<String> = iter::once(node)
        .chain(node.parents())
        .map(|node| match node.segment {
            QueryPathSegment::Index(index) => index.to_string(),
            QueryPathSegment::Name(name) => name.to_owned(),
        })
        .collect();
    segments.reverse();
    segments.join(".")
}

/// Dotted path of response keys (aliases where given), list indices elided.
fn response_key_path(node: &QueryPathNode<'_>) -> String {
    resolve_path_from_leaf(iter::once(node).chain(node.parents()).map(|node| {
        match node.segment {
            QueryPathSegment::Index(index) => PathKey::Index(index),
            QueryPathSegment::Name(name) => PathKey::Field(name),
        }
    }))
}

#[async_trait::async_trait]
impl Extension for FieldAuthzExtension {
    async fn prepare_request(
        &self,
        ctx: &ExtensionContext<'_>,
        request: Request,
        next: NextPrepareRequest<'_>,
    ) -> ServerResult<Request> {
        self.operation_name.lock().clone_from(&request.operation_name);
        next.run(ctx, request).await
    }

    async fn parse_query(
        &self,
        ctx: &ExtensionContext<'_>,
        query: &str,
        variables: &Variables,
        next: NextParseQuery<'_>,
    ) -> ServerResult<ExecutableDocument> {
        let document = next.run(ctx, query, variables).await?;
        let operation = {
            let operation_name = self.operation_name.lock();
            select_operation(&document, operation_name.as_deref())
        };
        *self.operation.write() = operation;

        if operation == Some(Operation::Subscription) {
            self.authorize_subscription(ctx, &document)?;
        }
        Ok(document)
    }

    async fn execute(
        &self,
        ctx: &ExtensionContext<'_>,
        operation_name: Option<&str>,
        next: NextExecute<'_>,
    ) -> Response {
        let mut response = if self.config.publish_role {
            let role = ctx
                .data_opt::<RequestContext>()
                .and_then(RequestContext::role)
                .cloned()
                .unwrap_or_else(Role::anonymous);
            let mut data = Data::default();
            data.insert(EffectiveRole(role));
            next.run_with_data(ctx, operation_name, data).await
        } else {
            next.run(ctx, operation_name).await
        };

        response
            .errors
            .extend(std::mem::take(&mut *self.deferred.lock()));

        // A subscription executes once per event; rules reloaded in between apply.
        self.decisions.clear();
        self.aliased.clear();
        response
    }

    async fn resolve(
        &self,
        ctx: &ExtensionContext<'_>,
        info: ResolveInfo<'_>,
        next: NextResolve<'_>,
    ) -> ServerResult<Option<Value>> {
        if is_list_item(&info) {
            return next.run(ctx, info).await;
        }

        let path = self.canonical_path(&info);

        let allow_introspection = self.config.introspection == IntrospectionPolicy::Allow;
        if allow_introspection && Self::is_introspection(&info) {
            return next.run(ctx, info).await;
        }

        let operation = *self.operation.read();
        let Some(operation) = operation else {
            tracing::error!(path = %path, "operation kind unknown; refusing field");
            return Err(field_error(
                "unable to determine the operation kind for field authorization",
                &info,
            ));
        };

        let role = ctx.data_opt::<RequestContext>().and_then(RequestContext::role);

        match self.decide(role, &path, operation) {
            Ok(Decision::Allowed) => next.run(ctx, info).await,
            Ok(Decision::Denied(denied)) => {
                self.reject(field_error(denied.to_string(), &info), &info)
            }
            Err(e) => self.reject(field_error(e.to_string(), &info), &info),
        }
    }
}
