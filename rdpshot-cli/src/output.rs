//! Output formatting abstraction for text vs JSON rendering
//!
//! All console output flows through [`OutputWriter`] which handles format switching.
//! This keeps format-specific logic out of command handlers entirely.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Rule printed around banners and summaries.
pub const RULE_WIDTH: usize = 60;

/// Abstraction for writing CLI output in different formats.
///
/// Handlers call `writer.render(&payload)` where `payload` implements both
/// `Serialize` (for JSON) and `Render` (for text).
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render a payload to stdout.
    ///
    /// For `Text` format, delegates to `Render::render_text()`.
    /// For `Json` format, serialises via `serde_json`.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        match self.format {
            OutputFormat::Text => {
                payload.render_text(&mut handle)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut handle, payload)?;
                writeln!(handle)?;
            }
        }
        handle.flush()?;
        Ok(())
    }

    /// Render progress text to stdout; JSON output skips it.
    pub fn announce<T: Render>(&self, payload: &T) -> Result<(), CliError> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        payload.render_text(&mut handle)?;
        handle.flush()?;
        Ok(())
    }
}

/// Trait for human-readable text rendering.
///
/// Implemented by every CLI output payload, usually alongside `serde::Serialize`.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

/// Write a full-width `=` rule.
pub fn write_rule(w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "{}", "=".repeat(RULE_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct TestPayload {
        field1: String,
        field2: u32,
    }

    impl Render for TestPayload {
        fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
            writeln!(w, "Field1: {}", self.field1)?;
            writeln!(w, "Field2: {}", self.field2)?;
            Ok(())
        }
    }

    #[test]
    fn test_output_writer_keeps_format() {
        assert_eq!(
            OutputWriter::new(OutputFormat::Json).format(),
            OutputFormat::Json
        );
        assert_eq!(
            OutputWriter::new(OutputFormat::Text).format(),
            OutputFormat::Text
        );
    }

    #[test]
    fn test_render_text_payload() {
        let payload = TestPayload {
            field1: "test value".to_owned(),
            field2: 42,
        };

        let mut buffer = Vec::new();
        payload
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(
            output.contains("Field1: test value"),
            "should render field1"
        );
        assert!(output.contains("Field2: 42"), "should render field2");
    }

    #[test]
    fn test_json_payload_structure() {
        let payload = TestPayload {
            field1: "test".to_owned(),
            field2: 100,
        };

        let json = serde_json::to_string(&payload).expect("json serialization should succeed");
        let parsed: serde_json::Value =
            serde_json::from_str(&json).expect("should parse back to JSON");

        assert_eq!(parsed["field1"].as_str(), Some("test"));
        assert_eq!(parsed["field2"].as_u64(), Some(100));
    }

    #[test]
    fn test_write_rule_width() {
        let mut buffer = Vec::new();
        write_rule(&mut buffer).expect("rule should render");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert_eq!(output.trim_end().len(), RULE_WIDTH);
        assert!(output.trim_end().chars().all(|c| c == '='));
    }
}
