//! Application state and the event fold that produces it.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::{ApplicationEvent, ApplicationEventKind};
use super::provider::Provider;
use super::scope::Scope;
use super::token::Token;
use crate::error::{GatewayError, GatewayResult};

/// Projection of one application's event history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationState {
    pub id: Uuid,
    pub name: String,
    /// Identifier of the authorization request that created the application.
    pub external_reference_id: String,
    pub created_on: DateTime<Utc>,
    pub user_emails: Vec<String>,
    pub subscriptions: BTreeSet<Provider>,
    pub scopes: BTreeSet<Scope>,
    pub tokens: Vec<Token>,
}

impl ApplicationState {
    pub fn is_subscribed(&self, provider: Provider) -> bool {
        self.subscriptions.contains(&provider)
    }

    pub fn holds_token(&self, digest: &str) -> bool {
        self.tokens.iter().any(|t| t.digest == digest)
    }
}

fn corrupt(application_id: Uuid, reason: impl Into<String>) -> GatewayError {
    GatewayError::CorruptHistory {
        application_id,
        reason: reason.into(),
    }
}

/// Fold one event into the state. `None` is the empty state before
/// `ApplicationCreated`.
pub fn apply_event(
    state: Option<ApplicationState>,
    event: &ApplicationEvent,
) -> GatewayResult<ApplicationState> {
    let Some(mut state) = state else {
        return match &event.kind {
            ApplicationEventKind::ApplicationCreated {
                name,
                external_reference_id,
                subscriptions,
                scopes,
                user_emails,
            } => Ok(ApplicationState {
                id: event.application_id,
                name: name.clone(),
                external_reference_id: external_reference_id.clone(),
                created_on: event.occurred_at,
                user_emails: user_emails.clone(),
                subscriptions: subscriptions.clone(),
                scopes: scopes.clone(),
                tokens: Vec::new(),
            }),
            other => Err(corrupt(
                event.application_id,
                format!("{} before ApplicationCreated", other.name()),
            )),
        };
    };

    if state.id != event.application_id {
        return Err(corrupt(
            state.id,
            format!("event targets application {}", event.application_id),
        ));
    }

    match &event.kind {
        ApplicationEventKind::ApplicationCreated { .. } => {
            return Err(corrupt(state.id, "ApplicationCreated applied twice"));
        }
        ApplicationEventKind::UserSubscribed { user_email } => {
            state.user_emails.push(user_email.clone());
        }
        ApplicationEventKind::TokenCreated { token } => {
            state.tokens.push(token.clone());
        }
        ApplicationEventKind::SubscriptionGranted { provider } => {
            state.subscriptions.insert(*provider);
        }
        ApplicationEventKind::ScopesGranted { scopes } => {
            state.scopes.extend(scopes.iter().copied());
        }
    }

    Ok(state)
}

/// Replay an ordered history from the empty state.
///
/// Returns `None` for an empty history.
pub fn replay<'a, I>(events: I) -> GatewayResult<Option<ApplicationState>>
where
    I: IntoIterator<Item = &'a ApplicationEvent>,
{
    events
        .into_iter()
        .try_fold(None, |state, event| apply_event(state, event).map(Some))
}
