#![allow(dead_code, clippy::unused_async)]

//! Project/members/tickets schema and policies shared by the integration tests.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_graphql::{Context, Object, Schema, SimpleObject, Subscription, Union};
use field_authz::{EffectiveRole, FieldAuthz, FieldAuthzConfig};
use field_authz_sdk::{Operation, PolicyEngine, PolicyEngineError, RequestContext};
use futures::Stream;
use static_policy_plugin::{PolicyMode, PolicyRule, StaticPolicyConfig, StaticPolicyEngine};

pub type ProjectSchema = Schema<Query, Mutation, Subscription>;

#[derive(SimpleObject, Clone)]
pub struct Ticket {
    id: Option<i32>,
    message: Option<String>,
}

#[derive(Clone)]
pub struct Member {
    id: i32,
    project_id: i32,
}

#[Object]
impl Member {
    async fn id(&self) -> Option<i32> {
        Some(self.id)
    }

    async fn name(&self) -> Option<String> {
        Some(format!("Project {}, Member: {}", self.project_id, self.id))
    }

    async fn tickets(&self) -> Option<Vec<Ticket>> {
        Some(
            (1..=4)
                .map(|id| Ticket {
                    id: Some(id),
                    message: Some(format!("Member {}, Ticket: {id}", self.id)),
                })
                .collect(),
        )
    }
}

#[derive(Clone)]
pub struct Project {
    id: i32,
    name: String,
}

#[Object]
impl Project {
    async fn id(&self) -> Option<i32> {
        Some(self.id)
    }

    async fn name(&self) -> Option<String> {
        Some(self.name.clone())
    }

    /// Non-null field.
    async fn code(&self) -> String {
        format!("P-{}", self.id)
    }

    async fn members(&self) -> Option<Vec<Member>> {
        Some(
            (1..=2)
                .map(|id| Member {
                    id,
                    project_id: self.id,
                })
                .collect(),
        )
    }
}

#[derive(SimpleObject)]
pub struct Contact {
    email: Option<String>,
}

#[derive(SimpleObject)]
pub struct Document {
    owner: Option<Contact>,
}

#[derive(SimpleObject)]
pub struct Invoice {
    payer: Option<Contact>,
}

#[derive(Union)]
pub enum Attachment {
    Document(Document),
    Invoice(Invoice),
}

fn contact(email: &str) -> Option<Contact> {
    Some(Contact {
        email: Some(email.to_owned()),
    })
}

fn project(id: i32) -> Project {
    Project {
        id,
        name: format!("Project {id}"),
    }
}

pub struct Query;

#[Object]
impl Query {
    async fn project(&self, id: Option<i32>) -> Option<Project> {
        Some(project(id.unwrap_or(1)))
    }

    async fn projects(&self) -> Option<Vec<Project>> {
        Some(vec![project(1), project(2)])
    }

    async fn attachments(&self) -> Option<Vec<Attachment>> {
        Some(vec![
            Attachment::Document(Document {
                owner: contact("owner@example.com"),
            }),
            Attachment::Invoice(Invoice {
                payer: contact("payer@example.com"),
            }),
        ])
    }

    /// Role the request was authorized as, when published.
    async fn viewer_role(&self, ctx: &Context<'_>) -> Option<String> {
        ctx.data_opt::<EffectiveRole>()
            .map(|role| role.as_str().to_owned())
    }
}

pub struct Mutation;

#[Object]
impl Mutation {
    async fn rename_project(&self, id: i32, name: String) -> Option<Project> {
        Some(Project { id, name })
    }
}

/// Counts `ticketUpdates` streams opened, when present in the request data.
#[derive(Default)]
pub struct StreamsOpened(AtomicUsize);

impl StreamsOpened {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Subscription;

#[Subscription]
impl Subscription {
    async fn ticket_updates(&self, ctx: &Context<'_>) -> impl Stream<Item = Ticket> {
        if let Some(opened) = ctx.data_opt::<Arc<StreamsOpened>>() {
            opened.0.fetch_add(1, Ordering::SeqCst);
        }
        futures::stream::iter((1..=2).map(|id| Ticket {
            id: Some(id),
            message: Some(format!("update {id}")),
        }))
    }
}

pub const PROJECT_QUERY: &str = r"{
        project(id: 2) {
            id name members {
                id name tickets {
                    id message
                }
            }
        }
    }";

/// Allows everything in [`PROJECT_QUERY`] to `user` except `project.name` and
/// `project.members.tickets.message`; anonymous may read `project.id`.
pub fn project_policy() -> StaticPolicyConfig {
    let query = |role: &str, resource: &str| PolicyRule::new(role, resource, Operation::Query);

    StaticPolicyConfig {
        mode: PolicyMode::Rules,
        rules: vec![
            query("*", "project"),
            query("*", "project.id"),
            query("user", "project"),
            query("user", "project.id"),
            query("user", "project.members"),
            query("user", "project.members.id"),
            query("user", "project.members.name"),
            query("user", "project.members.tickets"),
            query("user", "project.members.tickets.id"),
            query("user", "viewerRole"),
            query("*", "viewerRole"),
            PolicyRule::new("editor", "renameProject", Operation::Mutation),
            PolicyRule::new("editor", "renameProject.id", Operation::Mutation),
            PolicyRule::new("editor", "ticketUpdates", Operation::Subscription),
            PolicyRule::new("editor", "ticketUpdates.id", Operation::Subscription),
        ],
    }
}

pub fn schema(engine: Arc<dyn PolicyEngine>, config: FieldAuthzConfig) -> ProjectSchema {
    Schema::build(Query, Mutation, Subscription)
        .extension(FieldAuthz::new(engine).with_config(config))
        .finish()
}

pub fn project_schema() -> ProjectSchema {
    schema(
        Arc::new(StaticPolicyEngine::from_config(&project_policy())),
        FieldAuthzConfig::default(),
    )
}

pub fn as_role(query: &str, role: &str) -> async_graphql::Request {
    async_graphql::Request::new(query).data(RequestContext::for_role(role))
}

/// Records every `enforce` call and forwards it to an inner engine.
pub struct RecordingEngine {
    inner: StaticPolicyEngine,
    calls: AtomicUsize,
    resources: Mutex<Vec<String>>,
}

impl RecordingEngine {
    pub fn new(cfg: &StaticPolicyConfig) -> Self {
        Self {
            inner: StaticPolicyEngine::from_config(cfg),
            calls: AtomicUsize::new(0),
            resources: Mutex::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn resources(&self) -> Vec<String> {
        self.resources.lock().unwrap().clone()
    }
}

impl PolicyEngine for RecordingEngine {
    fn enforce(&self, role: &str, resource: &str, action: &str) -> Result<bool, PolicyEngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.resources.lock().unwrap().push(resource.to_owned());
        self.inner.enforce(role, resource, action)
    }
}

/// Engine whose backend is unreachable.
pub struct UnavailableEngine;

impl PolicyEngine for UnavailableEngine {
    fn enforce(&self, _: &str, _: &str, _: &str) -> Result<bool, PolicyEngineError> {
        Err(PolicyEngineError::Unavailable(
            "policy store offline".to_owned(),
        ))
    }
}

/// Errors as JSON, sorted so assertions do not depend on resolution order.
pub fn sorted_errors(response: &async_graphql::Response) -> Vec<serde_json::Value> {
    let mut errors: Vec<_> = response
        .errors
        .iter()
        .map(|e| serde_json::to_value(e).unwrap())
        .collect();
    errors.sort_by_key(ToString::to_string);
    errors
}

pub fn data(response: async_graphql::Response) -> serde_json::Value {
    response.data.into_json().unwrap()
}
