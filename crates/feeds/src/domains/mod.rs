mod events;
mod movies;
mod surf;
mod tides;
mod weather;

pub use events::*;
pub use movies::*;
pub use surf::*;
pub use tides::*;
pub use weather::*;
