mod events;
mod movies;
mod snapshot;
mod surf;
mod tides;
