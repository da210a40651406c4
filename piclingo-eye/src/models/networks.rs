//! Known networks and class label files

use crate::error::VisionError;
use std::fs;
use std::path::{Path, PathBuf};

/// YOLOv8 export input resolution
pub const YOLO_INPUT_SIZE: (u32, u32) = (640, 640);

/// COCO class names (80 classes)
pub const COCO_CLASSES: &[&str] = &[
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat",
    "dog", "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack",
    "umbrella", "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball",
    "kite", "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket",
    "bottle", "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple",
    "sandwich", "orange", "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair",
    "couch", "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse",
    "remote", "keyboard", "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator",
    "book", "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush",
];

struct Registered {
    name: &'static str,
    file_name: &'static str,
    url: &'static str,
    /// SHA-256 of the file, empty to skip verification
    checksum: &'static str,
}

const REGISTRY: &[Registered] = &[Registered {
    name: "yolov8n",
    file_name: "yolov8n.onnx",
    url: "https://github.com/ultralytics/assets/releases/download/v8.2.0/yolov8n.onnx",
    checksum: "",
}];

/// Where a network's weights come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Downloaded into the model directory on first use
    Download {
        file_name: &'static str,
        url: &'static str,
        checksum: &'static str,
    },
    /// ONNX file given by the user
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSpec {
    pub name: String,
    pub source: ModelSource,
    pub input_size: (u32, u32),
}

/// Names accepted by [`resolve_network`] besides `.onnx` paths
pub fn registered_networks() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|r| r.name)
}

/// Look up a registered network name or accept a path to an `.onnx` file.
pub fn resolve_network(id: &str) -> Result<NetworkSpec, VisionError> {
    let id = id.trim();
    if let Some(entry) = REGISTRY.iter().find(|r| r.name.eq_ignore_ascii_case(id)) {
        return Ok(NetworkSpec {
            name: entry.name.to_string(),
            source: ModelSource::Download {
                file_name: entry.file_name,
                url: entry.url,
                checksum: entry.checksum,
            },
            input_size: YOLO_INPUT_SIZE,
        });
    }

    let path = Path::new(id);
    let is_onnx = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("onnx"))
        .unwrap_or(false);
    if is_onnx {
        return Ok(NetworkSpec {
            name: path.file_stem().and_then(|s| s.to_str()).unwrap_or(id).to_string(),
            source: ModelSource::File(path.to_path_buf()),
            input_size: YOLO_INPUT_SIZE,
        });
    }

    Err(VisionError::Config(format!(
        "Unknown network '{}' (expected one of {:?} or a path to an .onnx file)",
        id,
        registered_networks().collect::<Vec<_>>()
    )))
}

/// One label per line; blank lines and `#` comments are skipped.
pub fn load_labels(path: &Path) -> Result<Vec<String>, VisionError> {
    let contents = fs::read_to_string(path)?;
    let labels = parse_labels(&contents);
    if labels.is_empty() {
        return Err(VisionError::Config(format!("No class labels in {:?}", path)));
    }
    Ok(labels)
}

pub fn parse_labels(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn coco_labels() -> Vec<String> {
    COCO_CLASSES.iter().map(|s| s.to_string()).collect()
}
