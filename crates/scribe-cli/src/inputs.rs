//! Turning command-line inputs into batch items

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use scribe_core::{BatchItem, Error, Result, TaskKind, TaskParameters};

/// Raw inputs gathered from the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSet {
    /// Files given one per argument
    pub files: Vec<PathBuf>,
    /// Comma-separated file lists, e.g. `a.py,b.py`
    pub file_lists: Vec<String>,
    /// Literal texts
    pub texts: Vec<String>,
    /// Text piped on standard input
    pub stdin: Option<String>,
}

impl InputSet {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
            && self.file_lists.iter().all(|list| split_list(list).next().is_none())
            && self.texts.is_empty()
            && self.stdin.is_none()
    }

    /// Build one item per input, in the order files, file lists, texts, stdin.
    ///
    /// Files are not read here; a missing file becomes a failed entry when the
    /// batch reaches it.
    pub fn into_items(self, task: TaskKind, parameters: &TaskParameters) -> Result<Vec<BatchItem>> {
        if self.is_empty() {
            return Err(Error::Validation(
                "No input given: pass files, --files, --text or --stdin".to_string(),
            ));
        }

        let listed: Vec<PathBuf> = self
            .file_lists
            .iter()
            .flat_map(|list| split_list(list))
            .map(PathBuf::from)
            .collect();

        let text_count = self.texts.len();
        let mut items: Vec<BatchItem> = self
            .files
            .into_iter()
            .chain(listed)
            .map(|path| BatchItem::file(path, task))
            .collect();

        items.extend(self.texts.into_iter().enumerate().map(|(i, text)| {
            let label = if text_count == 1 {
                "text".to_string()
            } else {
                format!("text-{}", i + 1)
            };
            BatchItem::text(label, text, task)
        }));

        if let Some(text) = self.stdin {
            items.push(BatchItem::text("stdin", text, task));
        }

        Ok(items
            .into_iter()
            .map(|item| item.with_parameters(parameters.clone()))
            .collect())
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}

/// Read everything piped on standard input.
///
/// Refuses to block on an interactive terminal.
pub fn read_stdin() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(Error::Validation(
            "--stdin was given but nothing is piped on standard input".to_string(),
        ));
    }
    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(buffer)
}
