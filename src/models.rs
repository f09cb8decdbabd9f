use serde::Serialize;

/// Uniform response envelope shared by every endpoint.
///
/// Absent fields are omitted from the JSON body, so a failure renders as
/// `{"success": false, "message": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            count: None,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl ApiResponse<()> {
    /// Successful response carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            count: None,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            count: None,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_omits_data_and_count() {
        let body = serde_json::to_value(ApiResponse::failure("Route not found")).unwrap();

        assert_eq!(body, json!({ "success": false, "message": "Route not found" }));
    }

    #[test]
    fn list_envelope_carries_count() {
        let body = serde_json::to_value(ApiResponse::ok(vec![1, 2, 3]).with_count(3)).unwrap();

        assert_eq!(body, json!({ "success": true, "count": 3, "data": [1, 2, 3] }));
    }
}
