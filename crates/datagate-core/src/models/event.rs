//! Permission events: the only source of application state.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::provider::Provider;
use super::scope::Scope;
use super::token::Token;

/// An immutable fact about one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationEvent {
    pub application_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub kind: ApplicationEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ApplicationEventKind {
    ApplicationCreated {
        name: String,
        external_reference_id: String,
        subscriptions: BTreeSet<Provider>,
        scopes: BTreeSet<Scope>,
        user_emails: Vec<String>,
    },
    UserSubscribed {
        user_email: String,
    },
    TokenCreated {
        token: Token,
    },
    SubscriptionGranted {
        provider: Provider,
    },
    ScopesGranted {
        scopes: BTreeSet<Scope>,
    },
}

impl ApplicationEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            ApplicationEventKind::ApplicationCreated { .. } => "ApplicationCreated",
            ApplicationEventKind::UserSubscribed { .. } => "UserSubscribed",
            ApplicationEventKind::TokenCreated { .. } => "TokenCreated",
            ApplicationEventKind::SubscriptionGranted { .. } => "SubscriptionGranted",
            ApplicationEventKind::ScopesGranted { .. } => "ScopesGranted",
        }
    }
}

impl ApplicationEvent {
    pub fn new(application_id: Uuid, kind: ApplicationEventKind) -> Self {
        Self {
            application_id,
            occurred_at: Utc::now(),
            kind,
        }
    }
}
