use crate::enums::{FetchState, NotificationKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Drop collection document as projected by the catalog queries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    // drop contract address
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub nft_collection_name: Option<String>,
    #[serde(default)]
    pub main_image: Option<Image>,
    #[serde(default)]
    pub preview_image: Option<Image>,
    pub slug: Slug,
    #[serde(default)]
    pub creator: Option<Creator>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Creator {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub slug: Option<Slug>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Slug {
    pub current: String,
}

impl Slug {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Image {
    #[serde(default)]
    pub asset: Option<AssetReference>,
}

impl Image {
    pub fn from_ref(asset_ref: impl Into<String>) -> Self {
        Self {
            asset: Some(AssetReference {
                reference: asset_ref.into(),
                ref_type: Some("reference".to_string()),
            }),
        }
    }
}

/// Reference to an uploaded asset, e.g. `image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetReference {
    #[serde(rename = "_ref")]
    pub reference: String,
    #[serde(rename = "_type", default)]
    pub ref_type: Option<String>,
}

/// Supply and price of a drop as seen by one page.
///
/// Claimed and total are written together by the supply read, the price by
/// the claim conditions read. Each read tracks its own [`FetchState`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct DropStatus {
    pub claimed: u64,
    pub total: Option<u64>,
    pub price: Option<String>,
    pub supply_state: FetchState,
    pub price_state: FetchState,
}

impl DropStatus {
    pub fn is_loading(&self) -> bool {
        self.supply_state == FetchState::Pending || self.price_state == FetchState::Pending
    }

    /// Claimed and total are both known.
    pub fn is_supply_known(&self) -> bool {
        self.supply_state == FetchState::Loaded && self.total.is_some()
    }

    pub fn is_sold_out(&self) -> bool {
        match self.total {
            Some(total) if self.supply_state == FetchState::Loaded => self.claimed >= total,
            _ => false,
        }
    }

    pub fn claimed_label(&self) -> Option<String> {
        if !self.is_supply_known() {
            return None;
        }
        self.total
            .map(|total| format!("{} / {} NFT's Claimed", self.claimed, total))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClaimedToken {
    pub token_id: String,
    pub owner: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClaimCondition {
    /// Display formatted price, e.g. `0.01`.
    pub price: String,
    pub currency_symbol: Option<String>,
    pub max_claimable_supply: Option<String>,
    pub start_time: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ClaimReceipt {
    pub token_ids: Vec<String>,
    pub transaction_hash: Option<String>,
    pub queue_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// `None` keeps the notification until it is dismissed.
    pub duration: Option<Duration>,
}

impl Notification {
    pub fn loading(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Loading,
            message: message.into(),
            duration: None,
        }
    }

    pub fn success(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
            duration: Some(duration),
        }
    }

    pub fn error(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
            duration: Some(duration),
        }
    }
}

/// `0xAbcde...12345` style short form of a wallet address.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 5..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    #[test]
    fn test_collection_from_projection() {
        let document = json!({
            "_id": "c1",
            "title": "Ape Club",
            "address": "0xAbc0000000000000000000000000000000000001",
            "description": "Apes together",
            "nftCollectionName": "Ape Club Drop",
            "mainImage": { "asset": { "_ref": "image-abc-600x800-png", "_type": "reference" } },
            "previewImage": { "asset": { "_ref": "image-def-300x300-jpg", "_type": "reference" } },
            "slug": { "current": "apes" },
            "creator": {
                "_id": "u1",
                "name": "Papa",
                "address": "0xCreator",
                "slug": { "current": "papa" }
            }
        });

        let collection: Collection = serde_json::from_value(document).unwrap();

        assert_eq!(collection.id, "c1");
        assert_eq!(collection.slug.current, "apes");
        assert_eq!(collection.nft_collection_name.as_deref(), Some("Ape Club Drop"));
        assert_eq!(
            collection.main_image,
            Some(Image::from_ref("image-abc-600x800-png"))
        );
        let creator = collection.creator.unwrap();
        assert_eq!(creator.name.as_deref(), Some("Papa"));
        assert_eq!(creator.slug, Some(Slug::new("papa")));
    }

    #[test]
    fn test_collection_with_missing_optional_fields() {
        let collection: Collection = serde_json::from_value(json!({
            "_id": "c2",
            "slug": { "current": "bare" },
            "creator": null
        }))
        .unwrap();

        assert_eq!(collection.title, None);
        assert_eq!(collection.main_image, None);
        assert_eq!(collection.creator, None);
    }

    #[test]
    fn test_collection_serializes_back_to_store_shape() {
        let collection = Collection {
            id: "c3".to_string(),
            title: Some("T".to_string()),
            slug: Slug::new("t"),
            ..Default::default()
        };

        assert_json_eq!(
            serde_json::to_value(&collection).unwrap(),
            json!({
                "_id": "c3",
                "title": "T",
                "address": null,
                "description": null,
                "nftCollectionName": null,
                "mainImage": null,
                "previewImage": null,
                "slug": { "current": "t" },
                "creator": null
            })
        );
    }

    #[test]
    fn test_drop_status_initial_state() {
        let status = DropStatus::default();

        assert_eq!(status.claimed, 0);
        assert_eq!(status.total, None);
        assert_eq!(status.price, None);
        assert!(status.is_loading());
        assert!(!status.is_sold_out());
        assert_eq!(status.claimed_label(), None);
    }

    #[test]
    fn test_drop_status_labels_and_sold_out() {
        let mut status = DropStatus {
            claimed: 13,
            total: Some(21),
            price: Some("0.01".to_string()),
            supply_state: FetchState::Loaded,
            price_state: FetchState::Loaded,
        };
        assert_eq!(status.claimed_label().as_deref(), Some("13 / 21 NFT's Claimed"));
        assert!(!status.is_sold_out());

        status.claimed = 21;
        assert!(status.is_sold_out());

        // overshoot from concurrent claims still counts as sold out
        status.claimed = 22;
        assert!(status.is_sold_out());
    }

    #[test]
    fn test_unknown_total_is_never_sold_out() {
        let status = DropStatus {
            claimed: 5,
            total: None,
            supply_state: FetchState::Failed,
            price_state: FetchState::Loaded,
            ..Default::default()
        };

        assert!(!status.is_sold_out());
        assert!(!status.is_supply_known());
        assert!(!status.is_loading());
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0xAbc0000000000000000000000000000000012345"),
            "0xAbc...12345"
        );
        assert_eq!(short_address("0xAb"), "0xAb");
    }
}
