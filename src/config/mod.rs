//! Configuration module

mod site;

pub use site::CollectionConfig;
pub use site::CollectionsConfig;
pub use site::FeedConfig;
pub use site::SiteConfig;
