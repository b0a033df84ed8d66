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

use std::io;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex::bytes::Regex;
use tracing::debug;

const OPEN_TAG: &[u8] = b"<game_name>";
const CLOSE_TAG: &[u8] = b"</game_name>";

// Matched against a single line with its terminator removed.  Byte-oriented
// so that files which are not valid UTF-8 can still be rewritten.
static RE_GAME_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^(\s*)<game_name>.*</game_name>").unwrap()
});

/// Location of the first `<game_name>` line in a document, as byte offsets
/// into the whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameNameMatch {
    /// The leading whitespace of the line
    pub indent: Range<usize>,
    /// From `<game_name>` up to and including the last `</game_name>`
    pub element: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The element was rewritten.  `changed` is false when it already held
    /// the requested payload and nothing was written.
    Rewritten { changed: bool },
    NoMatch,
}

#[must_use]
pub fn find_game_name(content: &[u8]) -> Option<GameNameMatch> {
    let mut offset = 0;
    for line in content.split_inclusive(|&ch| ch == b'\n') {
        let body = line.strip_suffix(b"\n").unwrap_or(line);
        if let Some(caps) = RE_GAME_NAME.captures(body) {
            let indent = caps.get(1)?;
            let whole = caps.get(0)?;
            return Some(GameNameMatch {
                indent: offset..offset + indent.end(),
                element: offset + indent.end()..offset + whole.end(),
            });
        }
        offset += line.len();
    }
    None
}

/// Replaces the content of the first `<game_name>` element with `payload`.
/// The payload is copied literally.  Returns `None` if no line matches.
#[must_use]
pub fn rewrite_game_name(content: &[u8], payload: &str) -> Option<Vec<u8>> {
    let found = find_game_name(content)?;

    let mut result = Vec::with_capacity(content.len() + payload.len());
    result.extend_from_slice(&content[..found.element.start]);
    result.extend_from_slice(OPEN_TAG);
    result.extend_from_slice(payload.as_bytes());
    result.extend_from_slice(CLOSE_TAG);
    result.extend_from_slice(&content[found.element.end..]);
    Some(result)
}

/// Rewrites the `<game_name>` element of the file at `path` in place.
pub fn rewrite_file(path: &Path, payload: &str) -> io::Result<RewriteOutcome> {
    let content = std::fs::read(path)?;
    let Some(updated) = rewrite_game_name(&content, payload) else {
        return Ok(RewriteOutcome::NoMatch);
    };

    let changed = updated != content;
    if changed {
        // In place: the file keeps its inode, owner and permissions.
        std::fs::write(path, &updated)?;
        debug!("Wrote {} bytes to {}", updated.len(), path.display());
    } else {
        debug!("{} already up to date", path.display());
    }
    Ok(RewriteOutcome::Rewritten { changed })
}

#[cfg(test)]
pub(crate) const TEST_XML: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="no" ?>
<gameserver>
    <settings>
        <game_name>Old Farm Name</game_name>
        <admin_password>secret</admin_password>
        <game_password></game_password>
    </settings>
</gameserver>
"#;

#[test]
fn test_find_game_name() {
    let found = find_game_name(TEST_XML.as_bytes()).unwrap();
    assert_eq!(&TEST_XML[found.indent.clone()], "        ");
    assert_eq!(&TEST_XML[found.element], "<game_name>Old Farm Name</game_name>");

    assert_eq!(find_game_name(b""), None);
    assert_eq!(find_game_name(b"<gameserver>\n<game_name>unterminated\n</gameserver>"), None);

    // Only whitespace may precede the element
    assert_eq!(find_game_name(b"<x><game_name>a</game_name></x>\n"), None);

    let found = find_game_name(b"<game_name></game_name>").unwrap();
    assert_eq!(found.indent, 0..0);
    assert_eq!(found.element, 0..23);
}

#[test]
fn test_rewrite_preserves_layout() {
    let updated = rewrite_game_name(TEST_XML.as_bytes(), "\u{a0}\u{a0}New").unwrap();
    let updated = String::from_utf8(updated).unwrap();
    let expected = TEST_XML.replace("<game_name>Old Farm Name</game_name>",
                                    "<game_name>\u{a0}\u{a0}New</game_name>");
    assert_eq!(updated, expected);

    // Tabs, CRLF line endings and trailing text after the element survive
    let crlf = b"<a>\r\n\t \t<game_name>x</game_name> <!-- name -->\r\n</a>\r\n";
    let updated = rewrite_game_name(crlf, "y").unwrap();
    assert_eq!(updated, b"<a>\r\n\t \t<game_name>y</game_name> <!-- name -->\r\n</a>\r\n");

    // No trailing newline at the end of the file
    let updated = rewrite_game_name(b"  <game_name>x</game_name>", "").unwrap();
    assert_eq!(updated, b"  <game_name></game_name>");
}

#[test]
fn test_rewrite_first_line_only() {
    let doubled = b"<game_name>one</game_name>\n  <game_name>two</game_name>\n";
    let updated = rewrite_game_name(doubled, "new").unwrap();
    assert_eq!(updated, b"<game_name>new</game_name>\n  <game_name>two</game_name>\n");
}

#[test]
fn test_rewrite_is_literal() {
    for payload in ["$1", "\\1", "${0}", "&", "a|b", ".*", "</game_name><x>"] {
        let updated = rewrite_game_name(b" <game_name>old</game_name>\n", payload).unwrap();
        let expected = format!(" <game_name>{payload}</game_name>\n");
        assert_eq!(updated, expected.as_bytes());
    }
}

#[test]
fn test_rewrite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dedicatedServerConfig.xml");
    std::fs::write(&path, TEST_XML).unwrap();

    assert_eq!(rewrite_file(&path, "\u{a0}Farm").unwrap(),
               RewriteOutcome::Rewritten { changed: true });
    let first = std::fs::read(&path).unwrap();
    assert_eq!(rewrite_file(&path, "\u{a0}Farm").unwrap(),
               RewriteOutcome::Rewritten { changed: false });
    assert_eq!(std::fs::read(&path).unwrap(), first);

    let plain = "<gameserver>\n</gameserver>\n";
    std::fs::write(&path, plain).unwrap();
    assert_eq!(rewrite_file(&path, "x").unwrap(), RewriteOutcome::NoMatch);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), plain);

    assert!(rewrite_file(&dir.path().join("missing.xml"), "x").is_err());
}
