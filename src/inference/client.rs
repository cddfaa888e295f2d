use anyhow::Context;
use axum::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of one forward pass: class label plus a score in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub class: String,
    pub confidence: f64,
}

/// Boundary to the pretrained model. The model itself is opaque; all the
/// service knows is bytes in, (label, confidence) out.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, filename: &str, image: Bytes) -> anyhow::Result<Prediction>;
}

/// Forwards the image to a model server over HTTP multipart.
pub struct RemoteClassifier {
    http: reqwest::Client,
    url: String,
}

impl RemoteClassifier {
    pub fn new(url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, filename: &str, image: Bytes) -> anyhow::Result<Prediction> {
        let part = reqwest::multipart::Part::bytes(image.to_vec())
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")
            .context("build multipart part")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("post image to {}", self.url))?
            .error_for_status()
            .context("classifier returned an error status")?;

        let prediction = response
            .json::<Prediction>()
            .await
            .context("decode classifier response")?;
        debug!(class = %prediction.class, confidence = prediction.confidence, "classified image");
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_deserializes_model_server_shape() {
        let p: Prediction =
            serde_json::from_str(r#"{"class":"Alternaria leaf spot","confidence":0.92}"#).unwrap();
        assert_eq!(p.class, "Alternaria leaf spot");
        assert!((p.confidence - 0.92).abs() < f64::EPSILON);
    }

    #[test]
    fn prediction_serializes_class_and_confidence() {
        let json = serde_json::to_string(&Prediction {
            class: "Rust".into(),
            confidence: 0.5,
        })
        .unwrap();
        assert!(json.contains(r#""class":"Rust""#));
        assert!(json.contains(r#""confidence":0.5"#));
    }
}
