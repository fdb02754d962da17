pub mod render;

pub use render::Toolchain;
