use crate::domain::Metric;
use crate::plugins::{Output, PluginError, reject_unknown_options};
use std::io::{self, Write};

pub const NAME: &str = "stdout";

/// Writes each metric as one JSON object per line.
pub struct StdoutOutput<W: Write + Send> {
    writer: W,
}

impl StdoutOutput<io::Stdout> {
    pub fn from_options(options: &toml::Table) -> Result<Box<dyn Output>, PluginError> {
        reject_unknown_options(NAME, options, &[])?;
        Ok(Box::new(Self::new(io::stdout())))
    }
}

impl<W: Write + Send> StdoutOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Output for StdoutOutput<W> {
    fn write(&mut self, metrics: &[Metric]) -> Result<(), PluginError> {
        for metric in metrics {
            serde_json::to_writer(&mut self.writer, metric)?;
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), PluginError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_json_lines() {
        let mut output = StdoutOutput::new(Vec::new());
        output
            .write(&[
                Metric::new("cpu").with_field("usage", 1.5),
                Metric::new("mem").with_field("used", 10_u64),
            ])
            .unwrap();

        let text = String::from_utf8(output.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["name"], "cpu");
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["fields"]["used"], 10);
    }

    #[test]
    fn test_rejects_unknown_option() {
        let mut options = toml::Table::new();
        options.insert("pretty".to_string(), toml::Value::Boolean(true));
        assert!(matches!(
            StdoutOutput::from_options(&options),
            Err(PluginError::InvalidOption { .. })
        ));
    }
}
