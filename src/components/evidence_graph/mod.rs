mod component;
mod controller;
mod layout;
mod options;
mod render;
pub mod scale;
mod scene;
mod state;
mod tooltip;
mod types;

pub use component::EvidenceGraphCanvas;
pub use controller::EvidenceGraphController;
pub use options::GraphOptions;
pub use types::{GraphLink, InvestigationData};
