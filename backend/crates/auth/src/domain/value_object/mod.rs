pub mod email;
pub mod person_name;
pub mod role;
pub mod username;

pub use email::Email;
pub use person_name::PersonName;
pub use role::Role;
pub use username::Username;

// Account IDs are the shared typed UUID; value objects here cover the
// validated string fields only.
pub use kernel::id::UserId;
