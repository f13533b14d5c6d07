mod config;
mod dashboard;
mod domains;
mod error;
mod fallback;
mod feed;
mod upstream;

pub use config::*;
pub use dashboard::*;
pub use domains::*;
pub use error::*;
pub use fallback::*;
pub use feed::*;
pub use upstream::*;
