use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, Read};

const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB

fn check_size(size: usize, what: &str) -> Result<()> {
    if size > MAX_INPUT_SIZE {
        bail!(
            "Error: {what} size ({:.1} MB) exceeds maximum allowed size (1 MB).",
            size as f64 / 1024.0 / 1024.0
        );
    }
    Ok(())
}

pub struct InputReader;

impl InputReader {
    /// Returns the single source line given on the command line, or read from stdin.
    pub fn read_line(text: Option<&str>) -> Result<String> {
        let input = match text {
            Some(text) => text.to_string(),
            None => Self::read_stdin()?,
        };
        single_line(&input)
    }

    pub fn read_file(path: &str) -> Result<String> {
        let metadata =
            fs::metadata(path).with_context(|| format!("Failed to access file: {path}"))?;
        check_size(metadata.len() as usize, "File")?;

        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
    }

    #[allow(clippy::significant_drop_tightening)]
    fn read_stdin() -> Result<String> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];
        let mut stdin = io::stdin().lock();

        loop {
            let bytes_read = stdin
                .read(&mut chunk)
                .context("Failed to read from stdin")?;

            if bytes_read == 0 {
                break;
            }

            buffer.extend_from_slice(&chunk[..bytes_read]);
            check_size(buffer.len(), "Input")?;
        }

        String::from_utf8(buffer).context("Input is not valid UTF-8")
    }
}

fn single_line(input: &str) -> Result<String> {
    let line = strip_line_ending(input);
    if line.contains('\n') {
        bail!("Error: Expected a single line of input");
    }
    Ok(line.to_string())
}

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map_or(line, |l| l.strip_suffix('\r').unwrap_or(l))
}

/// A text file split into lines, keeping each line's terminator so the file
/// can be written back byte-for-byte apart from edited lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    lines: Vec<String>,
}

impl SourceFile {
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the 1-based line `number` without its terminator.
    pub fn line(&self, number: u32) -> Result<&str> {
        let index = self.index(number)?;
        Ok(strip_line_ending(&self.lines[index]))
    }

    /// Replaces the text of 1-based line `number`, keeping its terminator.
    pub fn replace_line(&mut self, number: u32, text: &str) -> Result<()> {
        let index = self.index(number)?;
        let current = &self.lines[index];
        let ending = &current[strip_line_ending(current).len()..];
        self.lines[index] = format!("{text}{ending}");
        Ok(())
    }

    fn index(&self, number: u32) -> Result<usize> {
        let index = (number as usize).checked_sub(1);
        match index {
            Some(i) if i < self.lines.len() => Ok(i),
            _ => bail!(
                "Error: Line {number} is out of range (file has {} lines)",
                self.lines.len()
            ),
        }
    }

    pub fn contents(&self) -> String {
        self.lines.concat()
    }
}
