use entities::models::{Collection, Creator, Image, Slug};

pub const APES_ADDRESS: &str = "0x0f1d4b5a2c9e8d7f6a5b4c3d2e1f0a9b8c7d6e5f";
pub const BUYER_ADDRESS: &str = "0xAbCdE00000000000000000000000000000012345";

/// Fully populated collection whose fields are derived from `slug`.
pub fn collection(slug: &str, address: Option<&str>) -> Collection {
    Collection {
        id: format!("collection-{}", slug),
        title: Some(format!("{} title", slug)),
        address: address.map(str::to_string),
        description: Some(format!("{} description", slug)),
        nft_collection_name: Some(format!("{} drop", slug)),
        main_image: Some(Image::from_ref(format!("image-{}main-600x800-png", slug))),
        preview_image: Some(Image::from_ref(format!("image-{}preview-300x300-jpg", slug))),
        slug: Slug::new(slug),
        creator: Some(Creator {
            id: "creator-papa".to_string(),
            name: Some("Papa".to_string()),
            address: Some("0xC0ffee0000000000000000000000000000000001".to_string()),
            slug: Some(Slug::new("papa")),
        }),
    }
}
