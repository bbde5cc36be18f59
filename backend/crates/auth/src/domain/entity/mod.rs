pub mod account;
pub mod profile;

pub use account::Account;
pub use profile::Profile;
