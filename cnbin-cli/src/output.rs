use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Buffered writer to `path`, or stdout when no path is given.
pub fn open_output(path: Option<&String>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) => {
            let path = Path::new(p);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory for {}", p))?;
            }
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", p))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}
