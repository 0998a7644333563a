//! Data models for harvested repository items.

mod item;
mod record;

pub use item::{canonical_item_url, full_view_url, ItemUrls};
pub use record::{MetadataField, Record, NOT_AVAILABLE};
