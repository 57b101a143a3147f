use async_nats::{
    Client, ConnectOptions, HeaderMap,
    header::NATS_MESSAGE_ID,
    jetstream::{self, ErrorCode, context::GetStreamErrorKind},
};
use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    config::NatsConfig,
    domain::{
        error::PublishError, models::event::RegistrationEvent,
        services::event_publisher::EventPublisher,
    },
};

/// Publishes to a JetStream stream, one connection per publish.
#[derive(Clone)]
pub struct JetStreamEventPublisher {
    config: NatsConfig,
}

impl JetStreamEventPublisher {
    pub fn new(config: NatsConfig) -> Self {
        Self { config }
    }

    async fn connect(&self) -> Result<Client, PublishError> {
        ConnectOptions::with_user_and_password(
            self.config.user.clone(),
            self.config.password.clone(),
        )
        .connection_timeout(self.config.connect_timeout)
        .connect(self.config.server.as_str())
        .await
        .map_err(|e| PublishError::Connection(e.to_string()))
    }

    async fn publish_on(
        &self,
        client: &Client,
        event: &RegistrationEvent,
    ) -> Result<(), PublishError> {
        let context = jetstream::new(client.clone());

        if let Err(e) = context.get_stream(&self.config.stream).await {
            return Err(stream_lookup_error(
                &self.config.stream,
                e.kind(),
                e.to_string(),
            ));
        }

        let payload =
            serde_json::to_vec(event).map_err(|e| PublishError::Serialization(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(NATS_MESSAGE_ID, event.message_id().as_str());

        // the first await sends, the second waits for the stream's ack
        let ack = context
            .publish_with_headers(self.config.subject.clone(), headers, payload.into())
            .await
            .map_err(|e| PublishError::Rejected(e.to_string()))?
            .await
            .map_err(|e| PublishError::Rejected(e.to_string()))?;

        if ack.stream != self.config.stream {
            warn!(
                expected = %self.config.stream,
                actual = %ack.stream,
                "subject is bound to a different stream"
            );
        }
        info!(
            user_id = event.user_id.as_str(),
            subject = %self.config.subject,
            stream = %ack.stream,
            sequence = ack.sequence,
            duplicate = ack.duplicate,
            "Published event"
        );
        Ok(())
    }
}

/// Only a missing stream is reported as such; any other failure is a rejection.
fn stream_lookup_error(stream: &str, kind: GetStreamErrorKind, detail: String) -> PublishError {
    match kind {
        GetStreamErrorKind::JetStream(source)
            if source.error_code() == ErrorCode::STREAM_NOT_FOUND =>
        {
            PublishError::StreamNotFound(stream.to_string())
        }
        _ => PublishError::Rejected(detail),
    }
}

#[async_trait]
impl EventPublisher for JetStreamEventPublisher {
    async fn publish(&self, event: &RegistrationEvent) -> Result<(), PublishError> {
        let client = self.connect().await?;
        let result = self.publish_on(&client, event).await;

        // close on every path, success or not
        if let Err(e) = client.drain().await {
            warn!(error = %e, "failed to drain NATS connection");
        }
        result
    }
}
