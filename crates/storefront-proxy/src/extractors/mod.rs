//! Request extractors answering rejections with the relay's JSON error body

pub mod validated_json;

pub use validated_json::ValidatedJson;
