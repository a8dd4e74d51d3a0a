pub mod classification;
pub mod user;

pub use classification::ClassificationResult;
pub use user::UserProfile;
