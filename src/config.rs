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

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

pub const MAP_FILE_NAME: &str = "container_map.ini";

/// The mapping file lives in a `configs` directory next to the one holding
/// the executable, e.g. `/app/scripts/pre_restart` reads
/// `/app/scripts/../configs/container_map.ini`.
#[must_use]
pub fn map_path_for(exe_dir: &Path) -> PathBuf {
    [exe_dir, Path::new(".."), Path::new("configs"), Path::new(MAP_FILE_NAME)]
        .iter().collect()
}

pub fn default_map_path() -> Result<PathBuf> {
    let exe_path = std::env::current_exe()
            .context("Failed to get executable path")?;
    let exe_dir = exe_path.parent()
            .ok_or_else(|| anyhow!("Executable path {} has no parent", exe_path.display()))?;
    Ok(map_path_for(exe_dir))
}

#[test]
fn test_map_path_for() {
    assert_eq!(map_path_for(Path::new("/app/scripts")),
               Path::new("/app/scripts/../configs/container_map.ini"));
    assert_eq!(map_path_for(Path::new("bin")), Path::new("bin/../configs/container_map.ini"));
}
