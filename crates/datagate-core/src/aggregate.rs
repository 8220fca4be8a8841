//! The application aggregate.
//!
//! State is always a fold over the event history (see
//! [`crate::models::application::apply_event`]). Mutations raise a new
//! event, fold it into the state and keep it pending until the caller
//! has appended it to the event log.

use std::collections::BTreeSet;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::ScopeCatalog;
use crate::error::{GatewayError, GatewayResult};
use crate::filter::FieldFilter;
use crate::models::application::{ApplicationState, apply_event, replay};
use crate::models::event::{ApplicationEvent, ApplicationEventKind};
use crate::models::provider::Provider;
use crate::models::scope::Scope;
use crate::models::token::{Token, TokenValue};
use crate::repository::{CredentialFactory, DataProvider, IdGenerator};

/// Input for registering an application.
#[derive(Debug, Clone)]
pub struct CreateApplication {
    pub name: String,
    pub external_reference_id: String,
    pub subscriptions: Vec<Provider>,
    /// Raw scope identifiers, validated against the catalog.
    pub scopes: Vec<String>,
    pub user_emails: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Application {
    state: ApplicationState,
    /// Number of events already in the event log.
    version: u64,
    pending: Vec<ApplicationEvent>,
}

impl Application {
    /// Register a new application. Raises `ApplicationCreated`.
    ///
    /// Rejects an empty subscription set, and any scope that is not
    /// registered for one of the listed providers. Nothing is raised
    /// on rejection.
    pub fn create(
        input: CreateApplication,
        catalog: &ScopeCatalog,
        ids: &impl IdGenerator,
    ) -> GatewayResult<Self> {
        let subscriptions: BTreeSet<Provider> = input.subscriptions.into_iter().collect();
        if subscriptions.is_empty() {
            return Err(GatewayError::validation(
                "an application needs at least one subscription",
            ));
        }
        let scopes = input
            .scopes
            .iter()
            .map(|raw| catalog.resolve_scope(raw, &subscriptions))
            .collect::<GatewayResult<BTreeSet<Scope>>>()?;

        let event = ApplicationEvent::new(
            ids.generate_id(),
            ApplicationEventKind::ApplicationCreated {
                name: input.name,
                external_reference_id: input.external_reference_id,
                subscriptions,
                scopes,
                user_emails: input.user_emails,
            },
        );
        let state = apply_event(None, &event)?;

        info!(
            application_id = %state.id,
            subscriptions = state.subscriptions.len(),
            scopes = state.scopes.len(),
            "Application registered"
        );

        Ok(Self {
            state,
            version: 0,
            pending: vec![event],
        })
    }

    /// Rebuild the aggregate by replaying its stored history.
    pub fn from_history(application_id: Uuid, events: &[ApplicationEvent]) -> GatewayResult<Self> {
        let state = replay(events)?.ok_or_else(|| GatewayError::NotFound {
            entity: "application".into(),
            id: application_id.to_string(),
        })?;
        if state.id != application_id {
            return Err(GatewayError::CorruptHistory {
                application_id,
                reason: format!("history belongs to application {}", state.id),
            });
        }

        Ok(Self {
            state,
            version: events.len() as u64,
            pending: Vec::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.state.id
    }

    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    /// Version of the persisted history this aggregate was built from.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Events raised since the last commit, in order.
    pub fn pending(&self) -> &[ApplicationEvent] {
        &self.pending
    }

    /// Record that the pending events were appended; `new_version` is
    /// the version returned by the event log.
    pub fn commit(&mut self, new_version: u64) {
        self.version = new_version;
        self.pending.clear();
    }

    fn raise(&mut self, kind: ApplicationEventKind) -> GatewayResult<()> {
        let event = ApplicationEvent::new(self.state.id, kind);
        self.state = apply_event(Some(self.state.clone()), &event)?;
        debug!(
            application_id = %self.state.id,
            event = event.kind.name(),
            "Event raised"
        );
        self.pending.push(event);
        Ok(())
    }

    /// Issue a new credential bound to this application. Raises
    /// `TokenCreated` and returns the raw value, which is not kept.
    pub fn grant_credential(
        &mut self,
        factory: &impl CredentialFactory,
    ) -> GatewayResult<TokenValue> {
        let value = factory.generate_credential();
        let token = Token {
            digest: value.digest(),
            application_id: self.state.id,
            scopes: self.state.scopes.clone(),
            subscriptions: self.state.subscriptions.clone(),
            created_at: Utc::now(),
        };
        self.raise(ApplicationEventKind::TokenCreated { token })?;
        info!(application_id = %self.state.id, "Credential issued");
        Ok(value)
    }

    /// Raises `UserSubscribed`. Duplicate emails are kept.
    pub fn register_user(&mut self, user_email: impl Into<String>) -> GatewayResult<()> {
        self.raise(ApplicationEventKind::UserSubscribed {
            user_email: user_email.into(),
        })
    }

    /// Raises `SubscriptionGranted` unless already subscribed.
    pub fn grant_subscription(&mut self, provider: Provider) -> GatewayResult<()> {
        if self.state.is_subscribed(provider) {
            return Ok(());
        }
        self.raise(ApplicationEventKind::SubscriptionGranted { provider })?;
        info!(application_id = %self.state.id, %provider, "Subscription granted");
        Ok(())
    }

    /// Raises `ScopesGranted` with the scopes not yet granted. Every
    /// identifier is validated first; one bad scope rejects the batch.
    pub fn grant_scopes<S: AsRef<str>>(
        &mut self,
        scopes: &[S],
        catalog: &ScopeCatalog,
    ) -> GatewayResult<()> {
        let resolved = scopes
            .iter()
            .map(|raw| catalog.resolve_scope(raw.as_ref(), &self.state.subscriptions))
            .collect::<GatewayResult<BTreeSet<Scope>>>()?;
        let new: BTreeSet<Scope> = resolved.difference(&self.state.scopes).copied().collect();
        if new.is_empty() {
            return Ok(());
        }
        let count = new.len();
        self.raise(ApplicationEventKind::ScopesGranted { scopes: new })?;
        info!(application_id = %self.state.id, scopes = count, "Scopes granted");
        Ok(())
    }

    /// Call an upstream provider on behalf of this application and
    /// return only the fields its granted scopes unlock.
    ///
    /// The subscription check happens before the provider is called.
    /// Provider failures are returned unchanged. The aggregate is never
    /// mutated here.
    pub async fn fetch<P: DataProvider>(
        &self,
        input: &P::Input,
        provider: &P,
        filter: &FieldFilter,
    ) -> GatewayResult<Value> {
        let kind = provider.provider();
        if !self.state.is_subscribed(kind) {
            warn!(
                application_id = %self.state.id,
                provider = %kind,
                "Application not subscribed to provider"
            );
            return Err(GatewayError::ApplicationNotSubscribed {
                application_id: self.state.id,
                provider: kind,
            });
        }

        let unfiltered = provider.fetch(input).await.inspect_err(|e| {
            warn!(
                application_id = %self.state.id,
                provider = %kind,
                error = %e,
                "Provider call failed"
            );
        })?;

        filter.filter_output(&self.state.scopes, &unfiltered)
    }
}
