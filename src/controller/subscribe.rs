use actix_web::{delete, post, web, HttpResponse, Result};

use crate::{
    auth::AuthUser,
    configuration::{AppState, State},
    error::Error,
    handler::send_push,
    types::{PushData, SubscriptionRequest, SubscriptionResponse},
};

const SUBSCRIBED: &str = "subscribed";

#[post("/webpush/subscription")]
pub async fn post_index(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
    data: web::Json<SubscriptionRequest>,
) -> Result<HttpResponse, Error> {
    let subscription = &data.subscription;

    let mut tx = state.database.pool.begin().await?;
    let item = state
        .database
        .push_subscription
        .upsert(
            auth.id,
            &subscription.endpoint,
            &subscription.keys.p256dh,
            &subscription.keys.auth,
            &mut tx,
        )
        .await?;
    tx.commit().await?;

    tracing::info!("User {} registered push subscription {}", auth.id, item.id);

    if let Err(e) = send_push::send(&state, &item, &PushData::welcome()).await {
        tracing::error!(
            "Welcome push for subscription {} failed: {}",
            item.id,
            e
        );
        return Err(e);
    }

    Ok(HttpResponse::Created().json(SubscriptionResponse {
        endpoint: item.endpoint,
        status: String::from(SUBSCRIBED),
    }))
}

#[delete("/webpush/subscription")]
pub async fn delete_index(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
) -> Result<HttpResponse, Error> {
    let deleted = state
        .database
        .push_subscription
        .delete_by_user(auth.id)
        .await?;

    if !deleted {
        return Err(Error::NotFound(String::from("Brak subskrypcji")));
    }

    Ok(HttpResponse::NoContent().finish())
}
