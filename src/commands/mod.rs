pub mod params;
pub mod preprocess;
pub mod validate;
