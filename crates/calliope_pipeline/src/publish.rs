//! Publish channel seam.

use async_trait::async_trait;
use calliope_core::Post;
use calliope_error::CalliopeResult;

/// Outbound publish channel for approved posts.
///
/// The pipeline hands an implementation exactly the posts whose status
/// is `Approved`, in day order, and treats the call as all-or-nothing:
/// success flips every approved post to `Published`, failure leaves the
/// plan unchanged.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Deliver the given posts to the channel.
    async fn publish(&self, posts: &[Post]) -> CalliopeResult<()>;
}
