use serde::Serialize;

/// `{success, data?, message?}`, the body shape of every non-list response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse { success: true, data: Some(data), message: None }
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        ApiResponse { success: false, data: None, message: Some(message.into()) }
    }
}

/// The `{}` payload returned after a delete.
#[derive(Debug, Default, Serialize)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_omits_absent_parts() {
        assert_eq!(serde_json::to_value(ApiResponse::ok(Empty {})).unwrap(), json!({"success": true, "data": {}}));
        assert_eq!(
            serde_json::to_value(ApiResponse::failure("Route not found")).unwrap(),
            json!({"success": false, "message": "Route not found"})
        );
    }
}
