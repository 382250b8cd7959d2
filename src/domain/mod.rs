pub mod email;
pub use email::{deserialize_email_object, EmailObject};
