use crate::error::ApiError;
use actix_web::HttpRequest;
use order_reminders_infra::ReminderContext;

/// Only producers that know the feed secret are allowed to publish changes
pub fn protect_feed_route(req: &HttpRequest, ctx: &ReminderContext) -> Result<(), ApiError> {
    let secret = match req.headers().get("x-feed-secret") {
        Some(secret) => match secret.to_str() {
            Ok(secret) => secret,
            Err(_) => {
                return Err(ApiError::Unauthorized(
                    "Malformed feed secret provided".to_string(),
                ))
            }
        },
        None => {
            return Err(ApiError::Unauthorized(
                "Unable to find feed secret in x-feed-secret header".to_string(),
            ))
        }
    };

    if secret == ctx.config.feed_secret {
        Ok(())
    } else {
        Err(ApiError::Unauthorized(
            "Invalid feed secret provided in x-feed-secret header".to_string(),
        ))
    }
}
