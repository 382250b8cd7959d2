pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod middlewares;
mod models;
mod routes;
pub(crate) mod schemas;
#[cfg(test)]
mod tests;
pub(crate) mod utils;
pub use middlewares::{RequireAuth, RoleValidation};
pub use routes::user_route;
