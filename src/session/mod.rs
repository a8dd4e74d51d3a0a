pub mod registration;
pub mod state;
pub mod store;
pub mod token;

pub use registration::RegistrationForm;
pub use state::SessionSnapshot;
pub use store::SessionStore;
pub use token::{CredentialStore, FileCredentialStore};
