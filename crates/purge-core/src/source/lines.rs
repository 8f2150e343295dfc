// # Lines Content Source
//
// Reads one content identifier per line from an async reader.
//
// ## Purpose
//
// Backs the daemon's stdin mode: a CMS save hook can pipe slugs into
// `purged` instead of talking HTTP itself.
//
// ## Format
//
// - One identifier per line, surrounding whitespace trimmed (so `\r\n`
//   input works). A slug whose leading or trailing spaces matter cannot be
//   sent through this source; hand it to `PurgeNotifier` directly.
// - Blank lines are ignored
// - The stream ends at EOF or on the first read error (logged)

use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::{Stream, StreamExt};
use tracing::warn;

use crate::content::ContentSavedEvent;
use crate::traits::ContentSource;

/// Content source reading identifiers line by line
pub struct LinesContentSource<R> {
    reader: Mutex<Option<R>>,
}

impl<R> LinesContentSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    /// Create a source over any buffered async reader
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(Some(reader)),
        }
    }
}

impl LinesContentSource<BufReader<Stdin>> {
    /// Create a source reading the process's standard input
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> ContentSource for LinesContentSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn watch(&self) -> Pin<Box<dyn Stream<Item = ContentSavedEvent> + Send + 'static>> {
        let reader = self
            .reader
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(reader) = reader else {
            warn!("Lines content source watched twice, returning an empty stream");
            return Box::pin(tokio_stream::empty::<ContentSavedEvent>());
        };

        let stream = LinesStream::new(reader.lines())
            .map_while(|line| match line {
                Ok(line) => Some(line),
                Err(e) => {
                    warn!("Failed to read content identifier: {}", e);
                    None
                }
            })
            .filter_map(|line| {
                let identifier = line.trim();
                if identifier.is_empty() {
                    None
                } else {
                    Some(ContentSavedEvent::new(identifier))
                }
            });

        Box::pin(stream)
    }

    fn source_name(&self) -> &'static str {
        "lines"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_one_event_per_non_blank_line() {
        let input: &'static [u8] = b"hello-world\r\n\n  second-post  \n \t \nthird";
        let source = LinesContentSource::new(input);

        let identifiers: Vec<String> = source
            .watch()
            .map(|event| event.item.identifier)
            .collect()
            .await;

        assert_eq!(identifiers, vec!["hello-world", "second-post", "third"]);
    }
}
