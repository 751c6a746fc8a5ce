pub mod error;
pub mod image;
pub mod module;
pub mod music;
pub mod palette;
pub mod text;

pub use error::Error;
pub use image::Image;
pub use music::Patcher;
