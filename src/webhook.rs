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

// The two labeled lines are scraped from the hook's stdout by the restart
// bot and forwarded into its Discord notification.  Keep the prefixes stable.

use crate::verifier::Verification;

pub const NBSPS_WRITTEN_PREFIX: &str = "WEBHOOK_NBSPS_WRITTEN:";
pub const GAME_LINE_PREFIX: &str = "WEBHOOK_GAME_LINE:";

/// Placeholder when the filler count could not be determined
pub const NOT_AVAILABLE: &str = "N/A";
/// Placeholder when no `<game_name>` element was found
pub const NOT_FOUND: &str = "(not found)";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookReport {
    pub nbsps_written: Option<String>,
    pub game_line: Option<String>,
}

impl WebhookReport {
    #[must_use]
    pub fn from_verification(verification: &Verification) -> Self {
        Self {
            nbsps_written: Some(verification.nbsps_written
                    .map_or_else(|| NOT_AVAILABLE.to_string(), |count| count.to_string())),
            game_line: Some(verification.game_line.clone()
                    .unwrap_or_else(|| NOT_FOUND.to_string())),
        }
    }

    /// The labeled output lines, values written raw after the colon.
    #[must_use]
    pub fn lines(&self) -> [String; 2] {
        [
            format!("{}{}", NBSPS_WRITTEN_PREFIX,
                    self.nbsps_written.as_deref().unwrap_or(NOT_AVAILABLE)),
            format!("{}{}", GAME_LINE_PREFIX,
                    self.game_line.as_deref().unwrap_or(NOT_FOUND)),
        ]
    }

    /// Recovers a report from captured hook output.  Values are trimmed, and
    /// a later line with the same prefix overrides an earlier one.
    #[must_use]
    pub fn parse(output: &str) -> Self {
        let mut report = Self::default();
        for line in output.lines() {
            if let Some(value) = line.strip_prefix(NBSPS_WRITTEN_PREFIX) {
                report.nbsps_written = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix(GAME_LINE_PREFIX) {
                report.game_line = Some(value.trim().to_string());
            }
        }
        report
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nbsps_written.as_deref().is_none_or(str::is_empty)
            && self.game_line.as_deref().is_none_or(str::is_empty)
    }

    /// (name, value) pairs for the notification embed.  Empty when the hook
    /// reported nothing.
    #[must_use]
    pub fn embed_fields(&self) -> Vec<(&'static str, String)> {
        if self.is_empty() {
            return Vec::new();
        }
        vec![
            ("Non-breaking Spaces Written",
             self.nbsps_written.clone().unwrap_or_else(|| "None".to_string())),
            ("Game Name Line",
             self.game_line.clone().filter(|line| !line.is_empty())
                    .unwrap_or_else(|| NOT_FOUND.to_string())),
        ]
    }
}

#[test]
fn test_report_lines() {
    let report = WebhookReport::from_verification(&Verification {
        nbsps_written: Some(4),
        game_line: Some("<game_name>\u{a0}\u{a0}\u{a0}\u{a0}Farm</game_name>".to_string()),
    });
    assert_eq!(report.lines(), [
        "WEBHOOK_NBSPS_WRITTEN:4".to_string(),
        "WEBHOOK_GAME_LINE:<game_name>\u{a0}\u{a0}\u{a0}\u{a0}Farm</game_name>".to_string(),
    ]);

    let report = WebhookReport::from_verification(&Verification::default());
    assert_eq!(report.lines(), [
        "WEBHOOK_NBSPS_WRITTEN:N/A".to_string(),
        "WEBHOOK_GAME_LINE:(not found)".to_string(),
    ]);
}

#[test]
fn test_parse_output() {
    let output = "\
        🔍 Looking up container fs25-main\n\
        WEBHOOK_NBSPS_WRITTEN: 12\n\
        ✅ Done\n\
        WEBHOOK_GAME_LINE:<game_name>Farm: North</game_name>\n";
    let report = WebhookReport::parse(output);
    assert_eq!(report.nbsps_written.as_deref(), Some("12"));
    // Only the first colon separates the label
    assert_eq!(report.game_line.as_deref(), Some("<game_name>Farm: North</game_name>"));

    let report = WebhookReport::parse("ℹ️ No mapping for container x\n");
    assert_eq!(report, WebhookReport::default());
    assert!(report.embed_fields().is_empty());

    let report = WebhookReport::parse("WEBHOOK_NBSPS_WRITTEN:1\nWEBHOOK_NBSPS_WRITTEN:2\n");
    assert_eq!(report.nbsps_written.as_deref(), Some("2"));
}

#[test]
fn test_embed_fields() {
    let report = WebhookReport {
        nbsps_written: Some("3".to_string()),
        game_line: None,
    };
    assert_eq!(report.embed_fields(), vec![
        ("Non-breaking Spaces Written", "3".to_string()),
        ("Game Name Line", "(not found)".to_string()),
    ]);
}
