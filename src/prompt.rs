use anyhow::{Context, Result};
use std::io::{self, Stdout, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

use crate::provider::{DnsRecord, RecordPayload};

/// What a mutation is about to do, rendered before asking for approval.
#[derive(Debug, Clone, Copy)]
pub enum Intent<'a> {
    Create(&'a RecordPayload),
    Update {
        old: &'a DnsRecord,
        new: &'a RecordPayload,
    },
    Delete(&'a DnsRecord),
}

impl Intent<'_> {
    pub fn is_exclusion(&self) -> bool {
        matches!(self, Intent::Delete(_))
    }

    fn old_summary(&self) -> Option<String> {
        match self {
            Intent::Create(_) => None,
            Intent::Update { old, .. } | Intent::Delete(old) => Some(describe(
                &old.name,
                &old.record_type,
                &old.content,
                old.proxied,
            )),
        }
    }

    fn new_summary(&self) -> Option<String> {
        match self {
            Intent::Create(new) | Intent::Update { new, .. } => Some(describe(
                &new.name,
                &new.record_type,
                &new.content,
                new.proxied,
            )),
            Intent::Delete(_) => None,
        }
    }
}

fn describe(name: &str, record_type: &str, content: &str, proxied: bool) -> String {
    format!("{} - {} - {} (Proxied: {})", name, record_type, content, proxied)
}

/// Accepts `yes` / `y` in any case. Anything else, empty included, is a no.
pub fn is_affirmative(line: &str) -> bool {
    let answer = line.trim_end_matches(&['\r', '\n'][..]).to_lowercase();
    answer == "yes" || answer == "y"
}

/// Interactive input plus user-facing output.
///
/// Operations that need an answer take `&mut Console`, so only one question
/// can be outstanding at a time.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), io::stdout())
    }
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Shows the old/new data for `intent` and blocks until one line is read.
    /// End of input counts as a refusal.
    pub async fn confirm(&mut self, intent: &Intent<'_>) -> Result<bool> {
        if intent.is_exclusion() {
            writeln!(self.output, "\nConfirm the EXCLUSION:")?;
        } else {
            writeln!(self.output, "\nConfirm the changes:")?;
        }

        if let Some(old) = intent.old_summary() {
            writeln!(self.output, "Old Data -> {}", old)?;
        }
        if let Some(new) = intent.new_summary() {
            writeln!(self.output, "New Data -> {}", new)?;
        }

        write!(self.output, "Do you want to proceed? (yes/no): ")?;
        self.output.flush()?;

        // Bytes, not read_line: a line that is not UTF-8 is still just a "no"
        let mut answer = Vec::new();
        self.input
            .read_until(b'\n', &mut answer)
            .await
            .context("Failed to read confirmation")?;

        Ok(is_affirmative(&String::from_utf8_lossy(&answer)))
    }
}
