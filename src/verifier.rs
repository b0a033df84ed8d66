/* This file is part of pre-restart.
 *
 * pre-restart is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * pre-restart is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with pre-restart.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::path::Path;

use tracing::warn;

use crate::payload::FILLER_BYTES;
use crate::rewriter;

/// What actually ended up in the file after a rewrite.  Either value is
/// `None` when it could not be determined; verification never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verification {
    /// Encoded fillers anywhere in the file, not only in `<game_name>`
    pub nbsps_written: Option<usize>,
    pub game_line: Option<String>,
}

#[must_use]
pub fn count_filler_bytes(content: &[u8]) -> usize {
    content.windows(FILLER_BYTES.len())
        .filter(|window| *window == FILLER_BYTES)
        .count()
}

#[must_use]
pub fn verify_content(content: &[u8]) -> Verification {
    let game_line = rewriter::find_game_name(content)
            .map(|found| String::from_utf8_lossy(&content[found.element]).into_owned());
    Verification {
        nbsps_written: Some(count_filler_bytes(content)),
        game_line,
    }
}

#[must_use]
pub fn verify_file(path: &Path) -> Verification {
    match std::fs::read(path) {
        Ok(content) => verify_content(&content),
        Err(err) => {
            warn!("Could not re-read {} for verification: {}", path.display(), err);
            Verification::default()
        }
    }
}

#[test]
fn test_count_filler_bytes() {
    assert_eq!(count_filler_bytes(b""), 0);
    assert_eq!(count_filler_bytes(b"\xc2"), 0);
    assert_eq!(count_filler_bytes("\u{a0}".as_bytes()), 1);
    assert_eq!(count_filler_bytes("a\u{a0}\u{a0}b\u{a0}".as_bytes()), 3);

    // Other characters whose encoding contains 0xc2 or 0xa0 are not fillers
    assert_eq!(count_filler_bytes("\u{a1}\u{e0}\u{20a0}".as_bytes()), 0);
}

#[test]
fn test_verify_content() {
    let content = "<s>\n  <game_name>\u{a0}\u{a0}Farm</game_name>\n</s>\n";
    assert_eq!(verify_content(content.as_bytes()), Verification {
        nbsps_written: Some(2),
        game_line: Some("<game_name>\u{a0}\u{a0}Farm</game_name>".to_string()),
    });

    assert_eq!(verify_content(b"<s/>\n"), Verification {
        nbsps_written: Some(0),
        game_line: None,
    });
}

#[test]
fn test_verify_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(verify_file(&dir.path().join("gone.xml")), Verification::default());
}
