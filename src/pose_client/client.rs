use std::time::Duration;
use anyhow::Error;
use tonic::transport::{Channel, Endpoint};
use tracing::debug;
use crate::error::PipelineError;
use crate::pose_client::pose::pose_estimation_client::PoseEstimationClient;
use crate::pose_client::pose::{DetectRequest, DetectResponse};

/// PoseInferenceClient is a cheap-to-clone handle on the remote pose estimation service.
#[derive(Debug, Clone)]
pub struct PoseInferenceClient {
    client: PoseEstimationClient<Channel>,
    endpoint: String,
}

impl PoseInferenceClient {

    /// new creates a lazily connected client. Must be called inside a tokio runtime.
    ///
    /// # Arguments
    /// * `endpoint` - service URL, e.g. `http://127.0.0.1:8001`
    /// * `timeout` - per-request deadline
    ///
    /// # Returns
    /// * `Result<PoseInferenceClient, Error>`
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, Error> {
        let channel = match Endpoint::from_shared(endpoint.to_string()) {
            Ok(ep) => ep.timeout(timeout).connect_lazy(),
            Err(e) => return Err(PipelineError::Detector(format!("invalid endpoint {endpoint:?}: {e}")).into())
        };

        Ok(PoseInferenceClient {
            client: PoseEstimationClient::new(channel),
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// detect sends one image to the service and waits for its landmarks.
    pub async fn detect(&self, request: DetectRequest) -> Result<DetectResponse, Error> {
        debug!(endpoint = %self.endpoint, model = %request.model_name, bytes = request.image_data.len(), "pose detect request");
        let mut client = self.client.clone();
        let response = match client.detect(request).await {
            Ok(response) => response.into_inner(),
            Err(status) => {
                return Err(PipelineError::Detector(format!("{}: {}", status.code(), status.message())).into())
            }
        };
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use crate::error::PipelineError;
    use crate::pose_client::client::PoseInferenceClient;
    use crate::pose_client::pose::DetectRequest;

    #[tokio::test]
    async fn test_invalid_endpoint() {
        let err = PoseInferenceClient::new("not a uri", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err.downcast_ref::<PipelineError>(), Some(PipelineError::Detector(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_detector_error() {
        let client = PoseInferenceClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:1");
        let err = client.detect(DetectRequest::default()).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<PipelineError>(), Some(PipelineError::Detector(_))));
    }
}
