//! Fire-and-forget webhook notifications for team events.
//!
//! Dispatch happens after the transaction commits and is never awaited as
//! part of it; delivery failure is logged, not propagated.

use chrono::Utc;

/// Event kinds delivered to the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    MemberAdded,
    RequestRejected,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::MemberAdded => "member_added",
            EventKind::RequestRejected => "request_rejected",
        }
    }
}

/// Notification collaborator. Does nothing when no webhook URL is configured.
#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }

    /// Dispatch a team event. Returns immediately; delivery runs on a
    /// spawned task.
    pub fn notify(&self, team_id: &str, event: EventKind) {
        let Some(url) = self.webhook_url.clone() else {
            return;
        };

        let client = self.client.clone();
        let payload = serde_json::json!({
            "teamId": team_id,
            "event": event.as_str(),
            "sentAt": Utc::now().to_rfc3339(),
        });

        let team_id = team_id.to_string();
        tokio::spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(resp) if !resp.status().is_success() => {
                    tracing::warn!(
                        team_id = %team_id,
                        event = event.as_str(),
                        status = %resp.status(),
                        "Webhook rejected notification"
                    );
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(
                        team_id = %team_id,
                        event = event.as_str(),
                        "Failed to deliver notification: {}",
                        err
                    );
                }
            }
        });
    }
}
