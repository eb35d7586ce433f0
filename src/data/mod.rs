pub mod codec;
pub mod price_store;

pub use codec::{decode_key, decode_value, encode_key, BucketWidth, KeyLayout};
pub use price_store::{PriceRange, PriceStore};
