use futures::future::join_all;

use crate::{
    configuration::State,
    error::Error,
    model::{PushRecipient, PushSubscription},
    push::send_push,
    types::{PushData, PushHeader, Urgency},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastSummary {
    pub sent: usize,
    pub failed: usize,
}

fn push_header(state: &State) -> PushHeader {
    PushHeader {
        ttl: state.config.push_ttl,
        urgency: Urgency::High,
    }
}

pub async fn send(
    state: &State,
    subscription: &PushSubscription,
    push_data: &PushData,
) -> Result<(), Error> {
    send_push(state, subscription, &push_header(state), push_data).await
}

/// Sends `push_data` to every stored subscription.
pub async fn broadcast(
    state: &State,
    push_data: &PushData,
) -> Result<BroadcastSummary, Error> {
    let recipients = state.database.push_subscription.get_all().await?;

    tracing::info!("Broadcasting to {} subscription(s)", recipients.len());

    Ok(deliver(state, &recipients, push_data).await)
}

/// Delivers to each recipient concurrently. A failed delivery is logged
/// and counted; it never stops the others.
pub async fn deliver(
    state: &State,
    recipients: &[PushRecipient],
    push_data: &PushData,
) -> BroadcastSummary {
    let push_header = push_header(state);

    let tasks = recipients.iter().map(|recipient| {
        let push_header = &push_header;
        async move {
            let result =
                send_push(state, &recipient.subscription, push_header, push_data)
                    .await;
            match &result {
                Ok(()) => {
                    tracing::info!("Push sent to {}", recipient.username);
                },
                Err(e) => {
                    tracing::error!(
                        "Push to {} (subscription {}) failed: {}",
                        recipient.username,
                        recipient.subscription.id,
                        e
                    );
                },
            }
            result.is_ok()
        }
    });

    join_all(tasks).await.into_iter().fold(
        BroadcastSummary::default(),
        |mut summary, sent| {
            if sent {
                summary.sent += 1;
            } else {
                summary.failed += 1;
            }
            summary
        },
    )
}
