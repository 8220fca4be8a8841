//! Gateway service — application lifecycle, credential resolution and
//! gated data fetching.

use datagate_core::error::{GatewayError, GatewayResult};
use datagate_core::models::provider::Provider;
use datagate_core::models::token::TokenValue;
use datagate_core::repository::{DataProvider, EventStore, TokenCache, UuidV4Generator};
use datagate_core::{Application, CreateApplication, FieldFilter};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::token::{OpaqueCredentialFactory, check_credential_shape};

/// Gateway service.
///
/// Generic over the event log and credential cache so that this layer
/// has no dependency on the database crate. Write operations append
/// with the version the aggregate was loaded at and never retry on a
/// concurrent modification.
pub struct GatewayService<E: EventStore, T: TokenCache> {
    events: E,
    tokens: T,
    filter: FieldFilter,
    credentials: OpaqueCredentialFactory,
    ids: UuidV4Generator,
}

impl<E: EventStore, T: TokenCache> GatewayService<E, T> {
    pub fn new(events: E, tokens: T, filter: FieldFilter, config: AuthConfig) -> Self {
        Self {
            events,
            tokens,
            filter,
            credentials: OpaqueCredentialFactory::new(config),
            ids: UuidV4Generator,
        }
    }

    pub fn filter(&self) -> &FieldFilter {
        &self.filter
    }

    async fn save(&self, app: &mut Application) -> GatewayResult<()> {
        let new_version = self
            .events
            .append(app.id(), app.pending().to_vec(), app.version())
            .await?;
        app.commit(new_version);
        Ok(())
    }

    /// Register a new application and persist its creation event.
    pub async fn register_application(
        &self,
        input: CreateApplication,
    ) -> GatewayResult<Application> {
        let mut app = Application::create(input, self.filter.catalog(), &self.ids)?;
        self.save(&mut app).await?;
        Ok(app)
    }

    /// Replay an application from the event log.
    pub async fn load_application(&self, application_id: Uuid) -> GatewayResult<Application> {
        let history = self.events.load_history(application_id).await?;
        Application::from_history(application_id, &history)
    }

    /// Issue a credential for an application.
    ///
    /// The raw value is returned once and never stored; the event log
    /// and the credential cache only see its digest.
    pub async fn issue_credential(&self, application_id: Uuid) -> GatewayResult<TokenValue> {
        let mut app = self.load_application(application_id).await?;
        let value = app.grant_credential(&self.credentials)?;
        self.save(&mut app).await?;

        let digest = value.digest();
        let token = app
            .state()
            .tokens
            .iter()
            .find(|t| t.digest == digest)
            .cloned()
            .ok_or_else(|| GatewayError::Internal("issued token missing from state".into()))?;
        // The event is already committed; a stale cache is repaired by
        // `refresh_token_projection`.
        if let Err(e) = self.tokens.save(token).await {
            warn!(
                application_id = %application_id,
                error = %e,
                "Token cache update failed after issuance"
            );
        }

        Ok(value)
    }

    pub async fn subscribe_user(&self, application_id: Uuid, user_email: &str) -> GatewayResult<()> {
        let mut app = self.load_application(application_id).await?;
        app.register_user(user_email)?;
        self.save(&mut app).await?;
        info!(application_id = %application_id, "User subscribed");
        Ok(())
    }

    pub async fn grant_subscription(
        &self,
        application_id: Uuid,
        provider: Provider,
    ) -> GatewayResult<()> {
        let mut app = self.load_application(application_id).await?;
        app.grant_subscription(provider)?;
        if !app.pending().is_empty() {
            self.save(&mut app).await?;
        }
        Ok(())
    }

    pub async fn grant_scopes<S: AsRef<str> + Sync>(
        &self,
        application_id: Uuid,
        scopes: &[S],
    ) -> GatewayResult<()> {
        let mut app = self.load_application(application_id).await?;
        app.grant_scopes(scopes, self.filter.catalog())?;
        if !app.pending().is_empty() {
            self.save(&mut app).await?;
        }
        Ok(())
    }

    /// Rewrite the cache entries of every token an application holds,
    /// from its event history. Returns the number of entries written.
    pub async fn refresh_token_projection(&self, application_id: Uuid) -> GatewayResult<usize> {
        let app = self.load_application(application_id).await?;
        let tokens = app.state().tokens.clone();
        let count = tokens.len();
        for token in tokens {
            self.tokens.save(token).await?;
        }
        info!(application_id = %application_id, tokens = count, "Token projection refreshed");
        Ok(count)
    }

    /// Resolve a raw credential to the current state of its
    /// application.
    ///
    /// The cache only maps the credential to an application id; the
    /// application is then replayed from the event log and must still
    /// list the credential.
    pub async fn resolve(&self, raw_credential: &str) -> GatewayResult<Application> {
        check_credential_shape(raw_credential)?;
        let digest = TokenValue::new(raw_credential).digest();

        let token = self
            .tokens
            .find_by_digest(&digest)
            .await
            .inspect_err(|_| warn!("Credential not found"))?;

        let app = match self.load_application(token.application_id).await {
            Ok(app) => app,
            Err(GatewayError::NotFound { .. }) => {
                warn!(application_id = %token.application_id, "Credential owner not found");
                return Err(AuthError::CredentialStale.into());
            }
            Err(e) => return Err(e),
        };
        if !app.state().holds_token(&digest) {
            warn!(application_id = %app.id(), "Credential no longer held by application");
            return Err(AuthError::CredentialStale.into());
        }

        Ok(app)
    }

    /// Resolve the caller, then fetch from `provider` through the
    /// caller's application.
    pub async fn fetch_data<P: DataProvider>(
        &self,
        raw_credential: &str,
        input: &P::Input,
        provider: &P,
    ) -> GatewayResult<Value> {
        let app = self.resolve(raw_credential).await?;
        info!(
            application_id = %app.id(),
            provider = %provider.provider(),
            "Fetching provider data"
        );
        app.fetch(input, provider, &self.filter).await
    }
}
