//! Command line arguments and their merge over the run configuration

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use piclingo_core::config::RunConfig;
use piclingo_core::detection::OverlayFlags;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "piclingo")]
#[command(about = "Locate objects in a video stream and label them in two languages", long_about = None)]
#[command(version)]
pub struct Cli {
    /// URI of the input stream: camera (/dev/video0, v4l2://, 0), file or rtsp/http URL
    pub input: Option<String>,

    /// URI of the output stream: display://N or a video file path
    pub output: Option<String>,

    /// Detection network: yolov8n or a path to an .onnx file
    #[arg(long)]
    pub network: Option<String>,

    /// Detection overlay flags: combination of box, labels, conf, or none
    #[arg(long)]
    pub overlay: Option<OverlayFlags>,

    /// Minimum detection confidence
    #[arg(long)]
    pub threshold: Option<f32>,

    /// First hop language (code or name)
    #[arg(long = "translate")]
    pub translate: Option<String>,

    /// Second hop language (code or name)
    #[arg(long)]
    pub to: Option<String>,

    /// TOML file with run configuration; flags take precedence
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Class labels, one per line, for custom networks
    #[arg(long)]
    pub labels: Option<PathBuf>,

    /// Cache directory for downloaded networks
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Requested camera width
    #[arg(long)]
    pub input_width: Option<u32>,

    /// Requested camera height
    #[arg(long)]
    pub input_height: Option<u32>,

    /// Requested camera frame rate
    #[arg(long)]
    pub input_rate: Option<f64>,

    /// Restart file inputs when they end
    #[arg(long)]
    pub input_loop: bool,

    /// Render nowhere instead of opening a window
    #[arg(long)]
    pub headless: bool,

    /// Base URL of the translation service
    #[arg(long)]
    pub translate_url: Option<String>,

    /// Print the supported languages and exit
    #[arg(long)]
    pub list_languages: bool,

    /// Log level when PICLINGO_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Layer the flags over the config file (or defaults), then resolve and validate.
    pub fn into_config(self) -> piclingo_core::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_toml_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(input) = self.input {
            config.input_uri = input;
        }
        if let Some(output) = self.output {
            config.output_uri = output;
        }
        if let Some(network) = self.network {
            config.network = network;
        }
        if let Some(overlay) = self.overlay {
            config.overlay = overlay;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(language) = self.translate {
            config.intermediate_language = language;
        }
        if let Some(language) = self.to {
            config.final_language = language;
        }
        if let Some(labels) = self.labels {
            config.labels_path = Some(labels);
        }
        if let Some(model_dir) = self.model_dir {
            config.model_dir = model_dir;
        }
        if let Some(width) = self.input_width {
            config.input.width = Some(width);
        }
        if let Some(height) = self.input_height {
            config.input.height = Some(height);
        }
        if let Some(rate) = self.input_rate {
            config.input.rate = Some(rate);
        }
        if let Some(url) = self.translate_url {
            config.translate_url = url;
        }
        config.input.looping |= self.input_loop;
        config.headless |= self.headless;

        let config = config.resolve_languages()?;
        config.validate()?;
        Ok(config)
    }
}

/// `--help` and `--version` print as usual; anything else gets a blank line and the help text.
pub fn report_parse_error(err: &clap::Error) -> std::io::Result<()> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.print(),
        _ => {
            eprintln!("{}", err.render());
            print_help()
        }
    }
}

pub fn print_help() -> std::io::Result<()> {
    println!();
    Cli::command().print_long_help()
}
