pub mod destination;
pub mod excursion;
pub mod payment;
pub mod purchase;
mod route;
pub mod user;
pub mod util;

pub use destination::destination_route;
pub use excursion::excursion_route;
pub use payment::payment_route;
pub use purchase::purchase_route;
pub use route::main_route;
pub use user::user_route;
pub use util::util_route;
