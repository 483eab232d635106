use actix_web::{
    dev::ServiceResponse,
    http::StatusCode,
    middleware::{ErrorHandlerResponse, ErrorHandlers},
    HttpResponse, Result,
};
use serde_json::json;

use crate::errors::{AppError, INTERNAL_ERROR_MESSAGE};

/// Re-renders 500 responses with an `error` field carrying the raw detail.
/// With `expose_details` off, responses pass through unchanged.
pub fn error_details<B: 'static>(expose_details: bool) -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, move |res: ServiceResponse<B>| {
        if expose_details {
            add_error_detail(res)
        } else {
            Ok(ErrorHandlerResponse::Response(res.map_into_left_body()))
        }
    })
}

fn add_error_detail<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    let rendered = res.response().error().map(|err| match err.as_error::<AppError>() {
        Some(app_error) => (
            app_error.public_message(),
            app_error
                .internal_detail()
                .map(str::to_string)
                .unwrap_or_else(|| app_error.to_string()),
        ),
        None => (INTERNAL_ERROR_MESSAGE.to_string(), err.to_string()),
    });

    let Some((message, detail)) = rendered else {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    };

    let (req, res) = res.into_parts();
    let response = HttpResponse::build(res.status()).json(json!({
        "success": false,
        "message": message,
        "error": detail,
    }));

    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}
