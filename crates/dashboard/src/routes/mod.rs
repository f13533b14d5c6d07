pub mod feed_routes;
pub mod overview_routes;

pub use feed_routes::*;
pub use overview_routes::*;
