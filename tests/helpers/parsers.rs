//! Parse capabilities with side effects, for exercising concurrent changes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;
use std::sync::Mutex;

use omlscope::syntax::{DocumentParser, OmlParser, ParseError, SyntaxFile};

use super::workspace::rewrite;

struct PendingEdit {
    trigger: String,
    path: PathBuf,
    text: String,
}

/// Rewrites a file on disk the first time it parses text containing a trigger.
#[derive(Default)]
pub struct EditingParser {
    edits: Mutex<Vec<PendingEdit>>,
}

impl EditingParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Once some parsed text contains `trigger`, replace `path` with `text`.
    pub fn on_parse(self, trigger: &str, path: PathBuf, text: &str) -> Self {
        self.edits.lock().unwrap().push(PendingEdit {
            trigger: trigger.to_string(),
            path,
            text: text.to_string(),
        });
        self
    }
}

impl DocumentParser for EditingParser {
    fn parse(&self, text: &str) -> Result<SyntaxFile, ParseError> {
        let due: Vec<PendingEdit> = {
            let mut edits = self.edits.lock().unwrap();
            let (due, rest) = edits
                .drain(..)
                .partition(|edit| text.contains(&edit.trigger));
            *edits = rest;
            due
        };
        for edit in due {
            rewrite(&edit.path, &edit.text);
        }
        OmlParser.parse(text)
    }
}

/// Panics on any text containing `trigger`.
pub struct PanickingParser {
    pub trigger: &'static str,
}

impl DocumentParser for PanickingParser {
    fn parse(&self, text: &str) -> Result<SyntaxFile, ParseError> {
        if text.contains(self.trigger) {
            panic!("parser crashed on {}", self.trigger);
        }
        OmlParser.parse(text)
    }
}
