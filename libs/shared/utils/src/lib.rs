pub mod extractor;
pub mod jwt;
pub mod scope;
pub mod test_utils;
