use serde_json::Value;

/// Interpreted backend response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotResult {
    Image { base64_image: String },
    BackendError { message: String },
    /// Neither a usable image nor an error; `raw` is the response as JSON text.
    Malformed { raw: String },
}

impl PlotResult {
    /// Classifies a raw backend response.
    ///
    /// An explicit non-empty `error` wins over an image. Empty strings count as
    /// missing.
    pub fn from_response(value: &Value) -> Self {
        if let Some(message) = non_empty_str(value, "error") {
            return PlotResult::BackendError {
                message: message.to_string(),
            };
        }
        if let Some(image) = non_empty_str(value, "base64Image") {
            return PlotResult::Image {
                base64_image: image.to_string(),
            };
        }
        PlotResult::Malformed {
            raw: value.to_string(),
        }
    }
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Builds the displayable resource reference for a PNG payload.
pub fn image_data_uri(base64_image: &str) -> String {
    format!("data:image/png;base64,{base64_image}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_wins_over_image() {
        let value = json!({ "error": "boom", "base64Image": "AAAA" });
        assert_eq!(
            PlotResult::from_response(&value),
            PlotResult::BackendError {
                message: "boom".into()
            }
        );
    }

    #[test]
    fn non_object_and_wrong_types_are_malformed() {
        for value in [json!(null), json!("iVBOR"), json!({ "base64Image": 42 }), json!({ "error": "" })] {
            assert!(matches!(
                PlotResult::from_response(&value),
                PlotResult::Malformed { .. }
            ));
        }
    }
}
