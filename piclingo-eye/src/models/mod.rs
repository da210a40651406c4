//! Detection networks: registry, download cache and inference

pub mod manager;
pub mod networks;
pub mod yolo;

pub use manager::ModelManager;
pub use networks::{load_labels, resolve_network, ModelSource, NetworkSpec, COCO_CLASSES};
pub use yolo::YoloDetector;
