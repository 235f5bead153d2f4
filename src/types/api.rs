use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaste {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub expires_in_minutes: Option<f64>,
    #[serde(default)]
    pub max_views: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CreatedPaste {
    pub id: String,
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct PasteContent {
    pub content: String,
    pub views: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_accepts_camel_case_options() {
        let request: CreatePaste = serde_json::from_str(
            r#"{"content": "hello", "expiresInMinutes": 1.5, "maxViews": 3}"#,
        )
        .unwrap();

        assert_eq!(request.content.as_deref(), Some("hello"));
        assert_eq!(request.expires_in_minutes, Some(1.5));
        assert_eq!(request.max_views, Some(3));
    }

    #[test]
    fn create_request_fields_are_optional() {
        let request: CreatePaste = serde_json::from_str("{}").unwrap();

        assert!(request.content.is_none());
        assert!(request.expires_in_minutes.is_none());
        assert!(request.max_views.is_none());
    }

    #[test]
    fn created_response_shape() {
        let response = CreatedPaste {
            id: "1700000000000".into(),
            link: "/paste/1700000000000".into(),
        };
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["id"], "1700000000000");
        assert_eq!(value["link"], "/paste/1700000000000");
    }

    #[test]
    fn content_response_shape() {
        let response = PasteContent {
            content: "hello".into(),
            views: 1,
        };
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["content"], "hello");
        assert_eq!(value["views"], 1);
    }
}
