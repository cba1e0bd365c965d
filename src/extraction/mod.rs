//! Field extraction module
//! Typed field trees and the backends that produce them

pub mod extractor;
pub mod fields;
pub mod form_recognizer;

pub use extractor::{Extractor, FieldExtractor, JsonFieldExtractor};
pub use fields::{ExtractedField, FieldRecord};
