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

use tracing::{debug, info, warn};

use crate::container_map::ContainerMap;
use crate::error::HookError;
use crate::payload;
use crate::rewriter::{self, RewriteOutcome};
use crate::verifier::{self, Verification};
use crate::webhook::WebhookReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// The container has no `game_name` in the mapping.  Nothing was touched.
    Skipped,
    Rewritten(HookReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookReport {
    pub game_name: String,
    pub xml_path: PathBuf,
    pub nbsp_count: usize,
    pub suffix: String,
    pub outcome: RewriteOutcome,
    pub verification: Verification,
}

impl HookReport {
    #[must_use]
    pub fn webhook(&self) -> WebhookReport {
        WebhookReport::from_verification(&self.verification)
    }
}

/// Runs the pre-restart rewrite for `container` using the mapping file at
/// `map_path`.
pub fn run(container: &str, map_path: &Path) -> Result<HookOutcome, HookError> {
    let map = ContainerMap::from_file(map_path)?;
    let entry = map.entry(container);

    let Some(game_name) = entry.game_name else {
        info!("No game_name mapped for container '{}' in {}", container, map_path.display());
        return Ok(HookOutcome::Skipped);
    };
    let xml_path = entry.xml_path
            .ok_or_else(|| HookError::MissingXmlPath(container.to_string()))?;
    if !xml_path.is_file() {
        return Err(HookError::XmlNotFound(xml_path));
    }

    debug!("Container '{}' maps to '{}' ({}, {} fillers, suffix '{}')",
           container, game_name, xml_path.display(), entry.nbsp_count, entry.suffix);

    let new_content = payload::build_payload(entry.nbsp_count, &entry.suffix);
    let outcome = rewriter::rewrite_file(&xml_path, &new_content)
            .map_err(|source| HookError::Rewrite { path: xml_path.clone(), source })?;
    if outcome == RewriteOutcome::NoMatch {
        warn!("No <game_name> line in {}; file left unchanged", xml_path.display());
    }

    let verification = verifier::verify_file(&xml_path);
    Ok(HookOutcome::Rewritten(HookReport {
        game_name,
        xml_path,
        nbsp_count: entry.nbsp_count,
        suffix: entry.suffix,
        outcome,
        verification,
    }))
}

#[cfg(test)]
struct TestSetup {
    dir: tempfile::TempDir,
    map_path: PathBuf,
    xml_path: PathBuf,
}

#[cfg(test)]
impl TestSetup {
    fn new(xml: &str, section: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let map_path = dir.path().join("container_map.ini");
        let xml_path = dir.path().join("dedicatedServerConfig.xml");
        std::fs::write(&xml_path, xml).unwrap();
        std::fs::write(&map_path, format!(
            "[fs25-main]\n{}\nxml_path = {}\n", section, xml_path.display())).unwrap();
        Self { dir, map_path, xml_path }
    }

    fn xml(&self) -> String {
        std::fs::read_to_string(&self.xml_path).unwrap()
    }
}

#[test]
fn test_rewrite_counts() {
    for count in [0, 1, 5, 100] {
        let setup = TestSetup::new(rewriter::TEST_XML,
                &format!("game_name = Main Farm\nnbsp_count = {count}\nsuffix = Farm & Co. $1"));
        let Ok(HookOutcome::Rewritten(report)) = run("fs25-main", &setup.map_path) else {
            panic!("Expected a rewrite for nbsp_count = {count}");
        };

        let element = format!("<game_name>{}Farm & Co. $1</game_name>",
                              "\u{a0}".repeat(count));
        assert_eq!(setup.xml(), rewriter::TEST_XML.replace(
                "<game_name>Old Farm Name</game_name>", &element));
        assert_eq!(report.game_name, "Main Farm");
        assert_eq!(report.outcome, RewriteOutcome::Rewritten { changed: true });
        assert_eq!(report.verification.nbsps_written, Some(count));

        // The reported line is exactly what is in the file now
        let webhook = WebhookReport::parse(&report.webhook().lines().join("\n"));
        assert_eq!(webhook.game_line.as_deref(), Some(element.as_str()));
        assert!(setup.xml().contains(&format!("        {element}\n")));
    }
}

#[test]
fn test_idempotent() {
    let setup = TestSetup::new(rewriter::TEST_XML,
                               "game_name = Main Farm\nnbsp_count = 3\nsuffix = !");
    run("fs25-main", &setup.map_path).unwrap();
    let once = setup.xml();

    let Ok(HookOutcome::Rewritten(report)) = run("fs25-main", &setup.map_path) else {
        panic!("Expected a rewrite");
    };
    assert_eq!(report.outcome, RewriteOutcome::Rewritten { changed: false });
    assert_eq!(setup.xml(), once);
}

#[test]
fn test_unmapped_container() {
    let setup = TestSetup::new(rewriter::TEST_XML, "game_name = Main Farm\nnbsp_count = 3");
    assert_eq!(run("fs25-other", &setup.map_path).unwrap(), HookOutcome::Skipped);
    assert_eq!(setup.xml(), rewriter::TEST_XML);

    // A section without game_name is skipped the same way
    let setup = TestSetup::new(rewriter::TEST_XML, "nbsp_count = 3\nsuffix = x");
    assert_eq!(run("fs25-main", &setup.map_path).unwrap(), HookOutcome::Skipped);
    assert_eq!(setup.xml(), rewriter::TEST_XML);
}

#[test]
fn test_missing_files() {
    let setup = TestSetup::new(rewriter::TEST_XML, "game_name = Main Farm");
    let missing_map = setup.dir.path().join("nope.ini");
    let err = run("fs25-main", &missing_map).unwrap_err();
    assert!(matches!(err, HookError::MappingNotFound(ref path) if *path == missing_map));
    assert_eq!(err.exit_code(), 1);

    std::fs::remove_file(&setup.xml_path).unwrap();
    let err = run("fs25-main", &setup.map_path).unwrap_err();
    assert!(matches!(err, HookError::XmlNotFound(ref path) if *path == setup.xml_path));
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().starts_with("XML file not found: "));

    std::fs::write(&setup.map_path, "[fs25-main]\ngame_name = Main Farm\n").unwrap();
    let err = run("fs25-main", &setup.map_path).unwrap_err();
    assert!(matches!(err, HookError::MissingXmlPath(ref name) if name == "fs25-main"));
}

#[test]
fn test_no_game_name_line() {
    let xml = "<gameserver>\n    <settings/>\n</gameserver>\n";
    let setup = TestSetup::new(xml, "game_name = Main Farm\nnbsp_count = 2");
    let Ok(HookOutcome::Rewritten(report)) = run("fs25-main", &setup.map_path) else {
        panic!("Expected the rewrite path to complete");
    };
    assert_eq!(report.outcome, RewriteOutcome::NoMatch);
    assert_eq!(report.verification, Verification { nbsps_written: Some(0), game_line: None });
    assert_eq!(report.webhook().lines()[1], "WEBHOOK_GAME_LINE:(not found)");
    assert_eq!(setup.xml(), xml);
}
