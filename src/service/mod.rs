pub mod render;
pub mod shutdown;
pub mod util;
