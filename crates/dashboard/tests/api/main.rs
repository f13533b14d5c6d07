mod helpers;
mod overview_routes;
