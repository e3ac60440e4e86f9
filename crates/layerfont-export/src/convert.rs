//! Raster and page output through an external converter
//!
//! The converter reads SVG on stdin and writes the target format on
//! stdout, the way `rsvg-convert --format png` does.

use crate::OutputFormat;
use layerfont_core::{
    error::{ExportError, Result},
    traits::Exporter,
    types::RenderedDocument,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Environment variable naming the converter program
pub const CONVERTER_ENV: &str = "LAYERFONT_CONVERTER";

/// Pipes the document through a converter process
#[derive(Debug, Clone)]
pub struct ConverterExporter {
    program: PathBuf,
    format: OutputFormat,
    args: Vec<String>,
}

impl ConverterExporter {
    /// Converter invoked as `<program> --format <format>`
    pub fn new(program: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            program: program.into(),
            format,
            args: vec!["--format".to_string(), format.extension().to_string()],
        }
    }

    /// Replace the default `--format <format>` arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run(&self, svg: &[u8]) -> Result<Vec<u8>> {
        let program = self.program.display().to_string();
        log::debug!("Converting to {} with {} {:?}", self.format, program, self.args);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExportError::ConverterFailed {
                program: program.clone(),
                status: "not started".to_string(),
                stderr: e.to_string(),
            })?;

        // stdin is fed from its own thread while stdout drains
        let writer = child.stdin.take().map(|mut stdin| {
            let svg = svg.to_vec();
            std::thread::spawn(move || stdin.write_all(&svg))
        });

        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {},
                // The converter may legitimately stop reading early
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {},
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => {
                    return Err(ExportError::EncodingFailed("converter input thread panicked".into()).into())
                },
            }
        }

        if !output.status.success() {
            return Err(ExportError::ConverterFailed {
                program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(output.stdout)
    }
}

impl Exporter for ConverterExporter {
    fn name(&self) -> &'static str {
        "converter"
    }

    fn export(&self, document: &RenderedDocument) -> Result<Vec<u8>> {
        self.run(document.svg.as_bytes())
    }

    fn extension(&self) -> &'static str {
        self.format.extension()
    }

    fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}
