use entities::enums::{MintPhase, NotificationKind};
use entities::models::{short_address, Collection, Image};
use interface::image_urls::ImageUrlBuilder;
use tracing::warn;
use usecase::mint_flow::MintView;

use crate::notifications::Toast;

pub const PRICE_CURRENCY: &str = "ETH";

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn text(value: &Option<String>) -> String {
    value.as_deref().map(escape).unwrap_or_default()
}

fn image_src(image_urls: &dyn ImageUrlBuilder, image: &Option<Image>) -> String {
    let Some(image) = image else {
        return String::new();
    };
    match image_urls.url_for(image) {
        Ok(url) => escape(&url),
        Err(e) => {
            warn!("Cannot build image url: {}", e);
            String::new()
        },
    }
}

pub fn mint_button_label(view: &MintView) -> String {
    match view.phase {
        MintPhase::Disconnected => "Sign in to Mint".to_string(),
        MintPhase::Loading | MintPhase::Minting => "Loading".to_string(),
        MintPhase::SoldOut => "Sold Out".to_string(),
        MintPhase::Idle | MintPhase::Success | MintPhase::Failed => format!(
            "Mint NFT ({} {})",
            view.status.price.as_deref().unwrap_or("..."),
            PRICE_CURRENCY
        ),
    }
}

fn toast_list(toasts: &[Toast]) -> String {
    if toasts.is_empty() {
        return String::new();
    }
    let items: String = toasts
        .iter()
        .map(|toast| {
            let class = match toast.kind {
                NotificationKind::Loading => "loading",
                NotificationKind::Success => "success",
                NotificationKind::Error => "error",
            };
            format!(
                r#"<li class="toast {}">{}</li>"#,
                class,
                escape(&toast.message)
            )
        })
        .collect();
    format!(r#"<ul class="toasts">{}</ul>"#, items)
}

fn layout(title: &str, toasts: &[Toast], body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{}</title></head>
<body>
{}
{}
</body>
</html>
"#,
        escape(title),
        toast_list(toasts),
        body
    )
}

fn brand() -> &'static str {
    "The <span class=\"brand\">PAPAFAN</span> NFT Market Place"
}

pub fn listing_page(
    collections: &[Collection],
    image_urls: &dyn ImageUrlBuilder,
    toasts: &[Toast],
) -> String {
    let cards: String = collections
        .iter()
        .map(|collection| {
            format!(
                r#"<a class="collection" href="/nft/{}"><img src="{}" alt=""><h2>{}</h2><p>{}</p></a>"#,
                escape(&collection.slug.current),
                image_src(image_urls, &collection.main_image),
                text(&collection.title),
                text(&collection.description),
            )
        })
        .collect();

    layout(
        "NFT Drop",
        toasts,
        &format!(
            "<header><h1>{}</h1></header>\n<main>{}</main>",
            brand(),
            cards
        ),
    )
}

fn wallet_form(view: &MintView, return_to: &str) -> String {
    let (action, label) = if view.address.is_some() {
        ("/wallet/disconnect", "Sign Out")
    } else {
        ("/wallet/connect", "Sign In")
    };
    format!(
        r#"<form method="post" action="{}"><input type="hidden" name="return_to" value="{}"><button type="submit">{}</button></form>"#,
        action,
        escape(return_to),
        label
    )
}

pub fn detail_page(
    collection: &Collection,
    view: &MintView,
    image_urls: &dyn ImageUrlBuilder,
    toasts: &[Toast],
) -> String {
    let slug = escape(&collection.slug.current);
    let path = format!("/nft/{}", collection.slug.current);

    let logged_in = view
        .address
        .as_deref()
        .map(|address| {
            format!(
                r#"<p class="wallet">You are logged in with wallet {}</p>"#,
                escape(&short_address(address))
            )
        })
        .unwrap_or_default();

    let claimed = view
        .status
        .claimed_label()
        .map(|label| format!(r#"<p class="claimed">{}</p>"#, escape(&label)))
        .unwrap_or_else(|| r#"<p class="claimed loading">Loading Supply Count...</p>"#.to_string());

    let disabled = if view.can_mint() { "" } else { " disabled" };

    let body = format!(
        r#"<aside>
<img src="{preview}" alt="">
<h1>{name}</h1>
<h2>{description}</h2>
</aside>
<section>
<header><a href="/"><h1>{brand}</h1></a>{wallet_form}</header>
<hr>
{logged_in}
<div class="content">
<img src="{main}" alt="background">
<h1>{title}</h1>
{claimed}
</div>
<form method="post" action="/nft/{slug}/mint"><button type="submit"{disabled}>{label}</button></form>
</section>"#,
        preview = image_src(image_urls, &collection.preview_image),
        name = text(&collection.nft_collection_name),
        description = text(&collection.description),
        brand = brand(),
        wallet_form = wallet_form(view, &path),
        logged_in = logged_in,
        main = image_src(image_urls, &collection.main_image),
        title = text(&collection.title),
        claimed = claimed,
        slug = slug,
        disabled = disabled,
        label = escape(&mint_button_label(view)),
    );

    layout(
        collection
            .nft_collection_name
            .as_deref()
            .or(collection.title.as_deref())
            .unwrap_or("NFT Drop"),
        toasts,
        &body,
    )
}

pub fn not_found_page(slug: &str) -> String {
    layout(
        "Not Found",
        &[],
        &format!(
            r#"<h1>404</h1><p>No collection named "{}".</p><a href="/">Back</a>"#,
            escape(slug)
        ),
    )
}

pub fn error_page(message: &str) -> String {
    layout("Error", &[], &format!("<h1>Error</h1><p>{}</p>", escape(message)))
}
