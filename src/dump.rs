//! Line-by-line dump of a GDB/MI transcript
//!
//! Reads GDB/MI output, parses every line and writes one rendering per record.

use crate::gdb::{MiOutputRecord, MiParser, ParserConfig};
use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// How each parsed record is written out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Compact GDB/MI text, one record per line
    #[default]
    Text,
    /// Indented GDB/MI text
    Pretty,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct DumpConfig {
    pub format: OutputFormat,
    pub parser: ParserConfig,
    /// Stop at the first line that fails to parse instead of skipping it
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpStats {
    pub records: usize,
    /// Blank lines and `(gdb)` prompts
    pub skipped: usize,
    pub failed: usize,
}

pub fn render(record: &MiOutputRecord, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => record.to_string(),
        OutputFormat::Pretty => format!("{:#}", record),
        OutputFormat::Json => serde_json::to_string(record)?,
    })
}

/// Parse every line of `reader` and write the rendered records to `writer`.
pub async fn dump_records<R, W>(reader: R, writer: &mut W, config: &DumpConfig) -> Result<DumpStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let parser = MiParser::with_config(config.parser.clone());
    let mut segments = reader.split(b'\n');
    let mut stats = DumpStats::default();
    let mut line_number = 0usize;

    // GDB/MI lines end in CR or CR-LF
    while let Some(segment) = segments
        .next_segment()
        .await
        .context("Failed to read GDB/MI input")?
    {
        let segment = segment.strip_suffix(b"\r").unwrap_or(segment.as_slice());
        for bytes in segment.split(|&byte| byte == b'\r') {
            line_number += 1;
            let line = String::from_utf8_lossy(bytes);
            match parser.parse_line(&line) {
                Ok(Some(record)) => {
                    let mut rendered = render(&record, config.format)?;
                    rendered.push('\n');
                    writer.write_all(rendered.as_bytes()).await?;
                    stats.records += 1;
                }
                Ok(None) => {
                    stats.skipped += 1;
                }
                Err(e) if config.strict => {
                    return Err(anyhow!("line {}: {}", line_number, e));
                }
                Err(e) => {
                    warn!("Failed to parse line {}: {} - {}", line_number, line, e);
                    stats.failed += 1;
                }
            }
        }
    }

    writer.flush().await?;
    debug!("Dumped {:?}", stats);
    Ok(stats)
}
