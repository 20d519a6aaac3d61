//! Interactive stream selection on the terminal.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use spindle_core::media::{MediaItem, StreamDescriptor};
use spindle_core::quality::{CodecChooser, QualityError};

/// Lists the candidates on stderr and reads a 1-based choice from stdin.
///
/// End of input cancels the selection.
pub struct StdinChooser;

#[async_trait]
impl CodecChooser for StdinChooser {
    async fn choose(
        &self,
        item: &MediaItem,
        candidates: &[StreamDescriptor],
    ) -> Result<usize, QualityError> {
        let title = item.display_name();
        let options: Vec<String> = candidates.iter().map(StreamDescriptor::summary).collect();

        tokio::task::spawn_blocking(move || prompt(&title, &options))
            .await
            .map_err(|_| QualityError::SelectionCancelled)?
    }
}

fn prompt(title: &str, options: &[String]) -> Result<usize, QualityError> {
    let stdin = io::stdin();
    let mut stderr = io::stderr();

    loop {
        let _ = writeln!(stderr, "Select a stream for {}:", title);
        for (i, option) in options.iter().enumerate() {
            let _ = writeln!(stderr, "  {}) {}", i + 1, option);
        }
        let _ = write!(stderr, "> ");
        let _ = stderr.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return Err(QualityError::SelectionCancelled),
            Ok(_) => {}
        }

        match parse_choice(&line, options.len()) {
            Some(index) => return Ok(index),
            None => {
                let _ = writeln!(stderr, "Enter a number between 1 and {}", options.len());
            }
        }
    }
}

/// Converts a 1-based answer into an index.
fn parse_choice(line: &str, count: usize) -> Option<usize> {
    match line.trim().parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(n - 1),
        _ => None,
    }
}
