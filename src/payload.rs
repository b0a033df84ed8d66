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

/// U+00A0 NO-BREAK SPACE
pub const FILLER_CHAR: char = '\u{a0}';

/// UTF-8 encoding of [`FILLER_CHAR`], as counted in the raw file bytes.
pub const FILLER_BYTES: [u8; 2] = [0xc2, 0xa0];

/// Coerces a raw `nbsp_count` value to a repeat count.  Missing, negative
/// and non-numeric values all mean no filler at all.
#[must_use]
pub fn parse_nbsp_count(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(0)
}

/// Builds the new `<game_name>` content: `count` fillers, then `suffix`
/// verbatim.  No upper bound is enforced on `count`.
#[must_use]
pub fn build_payload(count: usize, suffix: &str) -> String {
    let mut payload = String::with_capacity(count * FILLER_CHAR.len_utf8() + suffix.len());
    payload.extend(std::iter::repeat_n(FILLER_CHAR, count));
    payload.push_str(suffix);
    payload
}

#[test]
fn test_filler_encoding() {
    let mut buffer = [0; 4];
    assert_eq!(FILLER_CHAR.encode_utf8(&mut buffer).as_bytes(), FILLER_BYTES);
}

#[test]
fn test_parse_nbsp_count() {
    assert_eq!(parse_nbsp_count(None), 0);
    assert_eq!(parse_nbsp_count(Some("")), 0);
    assert_eq!(parse_nbsp_count(Some("0")), 0);
    assert_eq!(parse_nbsp_count(Some("7")), 7);
    assert_eq!(parse_nbsp_count(Some(" 12 ")), 12);
    assert_eq!(parse_nbsp_count(Some("-3")), 0);
    assert_eq!(parse_nbsp_count(Some("three")), 0);
    assert_eq!(parse_nbsp_count(Some("2.5")), 0);
}

#[test]
fn test_build_payload() {
    for count in [0, 1, 5, 100] {
        for suffix in ["", "[AAF]", "$1 \\1 & | .* </game_name>"] {
            let payload = build_payload(count, suffix);
            assert_eq!(payload.chars().take_while(|&ch| ch == FILLER_CHAR).count(), count);
            assert_eq!(&payload[count * FILLER_BYTES.len()..], suffix);
        }
    }
    assert_eq!(build_payload(2, "x"), "\u{a0}\u{a0}x");
}
