//! Roster import: text parsing and asynchronous file reads.

use std::path::{Path, PathBuf};

use tokio::runtime::Runtime;
use tokio::sync::oneshot;

use crate::error::Result;
use crate::export::CSV_HEADERS;

/// Extract candidate student names from roster text.
///
/// Lines are split on LF or CRLF, trimmed, and blank lines dropped. When the
/// first line is the export header, the remaining lines are export rows and
/// only their first column is used.
pub fn parse_roster_text(text: &str) -> Vec<String> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty()).peekable();

    let from_export = lines.peek().is_some_and(|first| is_export_header(first));
    if from_export {
        lines.next();
        return lines
            .filter_map(|line| line.split(',').next())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
    }

    lines.map(String::from).collect()
}

fn is_export_header(line: &str) -> bool {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    fields.len() == CSV_HEADERS.len()
        && fields
            .iter()
            .zip(CSV_HEADERS)
            .all(|(field, header)| field.eq_ignore_ascii_case(header))
}

/// Read an import file to completion.
pub async fn read_import_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await?;
    tracing::info!("Read {} bytes from {:?}", text.len(), path);
    Ok(text)
}

/// Start reading `path` on `rt`; the receiver yields the full text once.
pub fn spawn_import_read(rt: &Runtime, path: PathBuf) -> oneshot::Receiver<Result<String>> {
    let (tx, rx) = oneshot::channel();
    rt.spawn(async move {
        let _ = tx.send(read_import_file(&path).await);
    });
    rx
}
