use std::io::Read;

use anyhow::{Context, Result};

/// Where to read the email body from; stdin when neither flag is given
#[derive(Debug, Default, clap::Args)]
pub struct InputArgs {
    /// Text to process
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// File to read
    #[arg(long, conflicts_with = "text")]
    pub file: Option<String>,
}

impl InputArgs {
    pub fn read(&self) -> Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path));
        }

        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        Ok(buffer)
    }
}
