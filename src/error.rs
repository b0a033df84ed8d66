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
use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of the pre-restart hook.  Every variant aborts the hook
/// before (or while) the target file is touched.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("Mapping file not found: {}", .0.display())]
    MappingNotFound(PathBuf),

    #[error("Failed to read mapping file {}: {source}", path.display())]
    MappingRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No xml_path configured for container '{0}'")]
    MissingXmlPath(String),

    #[error("XML file not found: {}", .0.display())]
    XmlNotFound(PathBuf),

    #[error("Failed to rewrite <game_name> in {}: {source}", path.display())]
    Rewrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HookError {
    /// Process exit status reported to the caller for this failure.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MappingNotFound(_) | Self::MappingRead { .. }
                | Self::MissingXmlPath(_) | Self::XmlNotFound(_)
                | Self::Rewrite { .. } => 1,
        }
    }
}

#[test]
fn test_error_messages() {
    let err = HookError::XmlNotFound(PathBuf::from("/srv/fs25/dedicatedServerConfig.xml"));
    assert_eq!(err.to_string(), "XML file not found: /srv/fs25/dedicatedServerConfig.xml");
    assert_eq!(err.exit_code(), 1);

    let err = HookError::MissingXmlPath("fs25-main".to_string());
    assert_eq!(err.to_string(), "No xml_path configured for container 'fs25-main'");

    let err = HookError::Rewrite {
        path: PathBuf::from("server.xml"),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    };
    assert_eq!(err.to_string(), "Failed to rewrite <game_name> in server.xml: denied");
    assert_eq!(err.exit_code(), 1);
}
