//! Loads a watch set — a newline-delimited list of variable/lock ids to
//! register up front — so the `WatchSet` [`RegistrationPolicy`] has
//! something to populate an [`Analyzer`] with before a live event stream
//! starts.
//!
//! File format: one id per line, prefixed `var:` or `lock:`; blank lines
//! and `#`-comments are skipped.
//!
//! ```text
//! # watched entities
//! var:x
//! var:y
//! lock:m
//! ```

use std::io::{BufRead, BufReader, Read};

use raceguard_core::{Analyzer, RegistrationPolicy};

use crate::error::IoError;

/// Registers every entry in `reader` against `analyzer`, returning the
/// count of variables and locks registered.
pub fn load_watch_set<R: Read>(
    reader: R,
    analyzer: &Analyzer<String, String, String>,
) -> Result<(usize, usize), IoError> {
    debug_assert_eq!(
        analyzer.policy(),
        RegistrationPolicy::WatchSet,
        "loading a watch set only makes sense under RegistrationPolicy::WatchSet"
    );

    let mut vars = 0usize;
    let mut locks = 0usize;
    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once(':') {
            Some(("var", name)) => {
                analyzer.register_variable(name.to_string());
                vars += 1;
            }
            Some(("lock", name)) => {
                analyzer.register_lock(name.to_string());
                locks += 1;
            }
            _ => {
                return Err(IoError::WatchSet {
                    line: line_no,
                    reason: format!("expected `var:<id>` or `lock:<id>`, got `{line}`"),
                })
            }
        }
    }
    Ok((vars, locks))
}
