pub mod controller;
pub mod state;

pub use controller::ClassificationWorkflow;
pub use state::{ImagePreview, Phase, SelectedImage, WorkflowSnapshot, MAX_IMAGE_BYTES};
