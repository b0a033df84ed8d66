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
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::HookError;
use crate::payload;

/// The sectioned `key = value` file mapping container names to the game
/// server config they own.  Only the raw text is kept; every lookup scans
/// it again from the top, so the first matching line always wins.
#[derive(Debug, Clone, Default)]
pub struct ContainerMap {
    text: String,
}

/// The settings for one container, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub game_name: Option<String>,
    pub nbsp_count: usize,
    pub suffix: String,
    pub xml_path: Option<PathBuf>,
}

impl ContainerMap {
    pub fn from_file(path: &Path) -> Result<Self, HookError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                debug!("Loaded container map from {}", path.display());
                Ok(Self { text })
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(HookError::MappingNotFound(path.to_owned()))
            }
            Err(source) => Err(HookError::MappingRead { path: path.to_owned(), source }),
        }
    }

    #[must_use]
    pub fn from_string(text: &str) -> Self {
        Self { text: text.to_string() }
    }

    /// Returns the value of `key` in `[section]`, or `None` if the section
    /// or key is absent.  A present key with an empty value yields `Some("")`.
    #[must_use]
    pub fn lookup(&self, section: &str, key: &str) -> Option<&str> {
        let mut in_section = false;
        for line in self.text.lines() {
            let line = line.trim();
            if line.starts_with('[') {
                in_section = line.strip_prefix('[')
                        .and_then(|name| name.strip_suffix(']'))
                        .is_some_and(|name| name == section);
                continue;
            }
            if !in_section || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some((line_key, value)) = line.split_once('=')
                && line_key.trim() == key
            {
                return Some(value.trim());
            }
        }
        None
    }

    #[must_use]
    pub fn entry(&self, container: &str) -> MappingEntry {
        let non_empty = |key: &str| self.lookup(container, key).filter(|value| !value.is_empty());

        MappingEntry {
            game_name: non_empty("game_name").map(str::to_string),
            nbsp_count: payload::parse_nbsp_count(self.lookup(container, "nbsp_count")),
            suffix: self.lookup(container, "suffix").unwrap_or_default().to_string(),
            xml_path: non_empty("xml_path").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
const TEST_MAP: &str = r"
; Dedicated servers managed by the restart bot
[fs25-main]
game_name = Main Farm
nbsp_count = 5
suffix = [AAF]
xml_path = /srv/fs25-main/dedicatedServerConfig.xml

[fs25-event]
game_name=Event Server
xml_path=/srv/fs25-event/dedicatedServerConfig.xml

[fs25-unnamed]
nbsp_count = 3
suffix = -x
xml_path = /srv/fs25-unnamed/dedicatedServerConfig.xml
";

#[test]
fn test_lookup() {
    let map = ContainerMap::from_string(TEST_MAP);
    assert_eq!(map.lookup("fs25-main", "game_name"), Some("Main Farm"));
    assert_eq!(map.lookup("fs25-main", "suffix"), Some("[AAF]"));
    assert_eq!(map.lookup("fs25-event", "game_name"), Some("Event Server"));
    assert_eq!(map.lookup("fs25-event", "xml_path"),
               Some("/srv/fs25-event/dedicatedServerConfig.xml"));

    // Keys never leak across section boundaries
    assert_eq!(map.lookup("fs25-event", "nbsp_count"), None);
    assert_eq!(map.lookup("fs25-event", "suffix"), None);
    assert_eq!(map.lookup("fs25-missing", "game_name"), None);
    assert_eq!(map.lookup("fs25", "game_name"), None);
}

#[test]
fn test_entry_defaults() {
    let map = ContainerMap::from_string(TEST_MAP);
    assert_eq!(map.entry("fs25-main"), MappingEntry {
        game_name: Some("Main Farm".to_string()),
        nbsp_count: 5,
        suffix: "[AAF]".to_string(),
        xml_path: Some(PathBuf::from("/srv/fs25-main/dedicatedServerConfig.xml")),
    });
    assert_eq!(map.entry("fs25-event").nbsp_count, 0);
    assert_eq!(map.entry("fs25-event").suffix, "");

    // nbsp_count and suffix are still read without a game_name
    let unnamed = map.entry("fs25-unnamed");
    assert_eq!(unnamed.game_name, None);
    assert_eq!(unnamed.nbsp_count, 3);
    assert_eq!(unnamed.suffix, "-x");

    let missing = map.entry("fs25-missing");
    assert_eq!(missing.game_name, None);
    assert_eq!(missing.xml_path, None);
    assert_eq!(missing.nbsp_count, 0);
}

#[test]
fn test_duplicates() {
    let map = ContainerMap::from_string("\
        [dup]\n\
        game_name = First\n\
        game_name = Second\n\
        [other]\n\
        suffix = other\n\
        [dup]\n\
        game_name = Third\n\
        suffix = from-second-header\n");

    // First key in scan order wins, including across repeated headers
    assert_eq!(map.lookup("dup", "game_name"), Some("First"));
    assert_eq!(map.lookup("dup", "suffix"), Some("from-second-header"));
    assert_eq!(map.lookup("other", "suffix"), Some("other"));
}

#[test]
fn test_value_whitespace() {
    let map = ContainerMap::from_string("[c]\r\n  suffix =   padded value  \r\nempty =\r\nno equals sign\r\n");
    assert_eq!(map.lookup("c", "suffix"), Some("padded value"));
    assert_eq!(map.lookup("c", "empty"), Some(""));
    assert_eq!(map.lookup("c", "no equals sign"), None);

    // Everything after the first '=' belongs to the value
    let map = ContainerMap::from_string("[c]\nsuffix = a=b\n");
    assert_eq!(map.lookup("c", "suffix"), Some("a=b"));

    let map = ContainerMap::from_string("[c]\ngame_name =\nxml_path = \n");
    let entry = map.entry("c");
    assert_eq!(entry.game_name, None);
    assert_eq!(entry.xml_path, None);
}

#[test]
fn test_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("container_map.ini");
    match ContainerMap::from_file(&path) {
        Err(HookError::MappingNotFound(missing)) => assert_eq!(missing, path),
        other => panic!("Expected MappingNotFound, got {other:?}"),
    }

    std::fs::write(&path, TEST_MAP).unwrap();
    let map = ContainerMap::from_file(&path).unwrap();
    assert_eq!(map.lookup("fs25-main", "nbsp_count"), Some("5"));
}
