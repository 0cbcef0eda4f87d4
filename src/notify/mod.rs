pub mod instagram;
pub mod linkedin;

use crate::error::PublishError;

/// External collaborator that pushes rendered post text to one social
/// platform. The pipeline records the outcome on the PostRecord and never
/// retries a failed publish on its own; a publisher may retry transport
/// hiccups internally a bounded number of times.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, content: &str) -> Result<(), PublishError>;

    /// Platform tag stored on PostRecord, e.g. "linkedin".
    fn platform(&self) -> &'static str;
}
