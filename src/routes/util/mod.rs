mod routes;
pub(crate) mod views;
pub use routes::util_route;
