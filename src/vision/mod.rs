//! Image upload handling for multimodal extraction.
//!
//! This module validates uploaded files (declared `image/*` media type,
//! size limit) and encodes them for the prompt, either as Gemini
//! `InlineData` or as a base64 data URI.
//!
//! # Submodules
//!
//! - `models`: Upload type and validation constraints.
//! - `translation`: Base64 encoding and conversion to Gemini's format.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod models;
pub mod translation;

pub use models::{is_image_media_type, ImageUpload};
pub use translation::{encode_image, to_inline_data, EncodedImage};
