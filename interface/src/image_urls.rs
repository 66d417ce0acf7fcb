use entities::models::Image;
use mockall::automock;

use crate::error::ImageUrlError;

#[automock]
pub trait ImageUrlBuilder: Send + Sync {
    /// Pure mapping from an image reference to a public URL.
    fn url_for(&self, image: &Image) -> Result<String, ImageUrlError>;
}
