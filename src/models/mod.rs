pub mod image;
pub mod invocation;
pub mod market;

pub use image::*;
pub use invocation::*;
pub use market::*;
