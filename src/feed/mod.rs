//! RSS feed generation
//!
//! Posts are sorted newest first and mapped to minimal feed items (title and
//! permalink); serialization is delegated to the `rss` crate.

use rss::validation::Validate;
use rss::{Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use serde::Serialize;
use thiserror::Error;

use crate::config::SiteConfig;
use crate::content::{Collection, Post, PostData};
use crate::helpers::{absolute_url, encode_component, encode_path, url_for};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("`site` must be set in the site configuration to build the feed")]
    MissingSite,
    #[error("invalid feed: {0}")]
    Invalid(String),
}

/// A single feed entry before serialization. `link` is site-relative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
}

/// Posts ordered newest first; equal dates fall back to slug order
pub fn sorted_posts(posts: &Collection<PostData>) -> Vec<&Post> {
    let mut sorted: Vec<&Post> = posts.iter().collect();
    sorted.sort_by(|a, b| {
        b.data
            .published
            .cmp(&a.data.published)
            .then_with(|| a.id.cmp(&b.id))
    });
    sorted
}

/// Site-relative permalink of a post as it appears in the feed,
/// e.g. `/posts/hello-world?src=rss`
pub fn permalink(config: &SiteConfig, slug: &str) -> String {
    let route = config.feed.route.trim_matches('/');
    let path = if route.is_empty() {
        encode_path(slug)
    } else {
        format!("{}/{}", route, encode_path(slug))
    };

    let mut link = url_for(&config.root, &path);
    if !config.feed.source.is_empty() {
        link.push_str("?src=");
        link.push_str(&encode_component(&config.feed.source));
    }
    link
}

/// Map the posts collection to feed items, newest first
pub fn feed_items(config: &SiteConfig, posts: &Collection<PostData>) -> Vec<FeedItem> {
    sorted_posts(posts)
        .into_iter()
        .map(|post| FeedItem {
            title: post.data.title.clone(),
            link: permalink(config, &post.id),
        })
        .collect()
}

/// Build the RSS channel for the posts collection
pub fn build_channel(config: &SiteConfig, posts: &Collection<PostData>) -> Result<Channel, FeedError> {
    let site = config
        .site
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(FeedError::MissingSite)?;

    let items: Vec<Item> = feed_items(config, posts)
        .into_iter()
        .map(|item| {
            let link = absolute_url(site, &item.link);
            let guid = GuidBuilder::default()
                .value(link.clone())
                .permalink(true)
                .build();
            ItemBuilder::default()
                .title(Some(item.title))
                .link(Some(link))
                .guid(Some(guid))
                .build()
        })
        .collect();

    let channel = ChannelBuilder::default()
        .title(config.feed_title().to_string())
        .link(site.to_string())
        .description(config.feed_description().to_string())
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| FeedError::Invalid(e.to_string()))?;

    Ok(channel)
}

/// Render the feed document
pub fn render(config: &SiteConfig, posts: &Collection<PostData>) -> Result<String, FeedError> {
    let channel = build_channel(config, posts)?;
    tracing::debug!("Built feed with {} items", channel.items().len());
    Ok(channel.to_string())
}
