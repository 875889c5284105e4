//! Configuration file loading and command-line value parsing.

use std::{fs, path::Path, str::FromStr};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use stone_defence_core::{CellCoord, MatchConfig, TowerKind};

/// Contents of the optional TOML settings file.
///
/// ```toml
/// seed = 7
///
/// [match]
/// starting_money = 600
/// ```
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SettingsFile {
    /// Seed for wave generation; the command line takes precedence.
    pub(crate) seed: Option<u64>,
    /// Match parameters; omitted fields keep their stock values.
    #[serde(rename = "match")]
    pub(crate) match_config: MatchConfig,
}

impl SettingsFile {
    /// Reads and parses the settings file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Tower placement requested on the command line as `kind@column,row`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PlacementOrder {
    /// Tower to construct.
    pub(crate) kind: TowerKind,
    /// Cell hosting the tower.
    pub(crate) cell: CellCoord,
}

impl FromStr for PlacementOrder {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let Some((kind, cell)) = value.split_once('@') else {
            bail!("expected `kind@column,row`, got `{value}`");
        };
        let kind = match kind.trim().to_ascii_lowercase().as_str() {
            "basic" => TowerKind::Basic,
            "cannon" => TowerKind::Cannon,
            "archer" => TowerKind::Archer,
            other => bail!("unknown tower kind `{other}`; expected basic, cannon or archer"),
        };
        let Some((column, row)) = cell.split_once(',') else {
            bail!("expected `column,row` after `@`, got `{cell}`");
        };
        let column = column
            .trim()
            .parse()
            .with_context(|| format!("invalid column `{column}`"))?;
        let row = row
            .trim()
            .parse()
            .with_context(|| format!("invalid row `{row}`"))?;

        Ok(Self {
            kind,
            cell: CellCoord::new(column, row),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stone_defence_core::{Gold, Lives};

    #[test]
    fn empty_settings_keep_stock_match() {
        let settings = SettingsFile::parse("").expect("empty file parses");
        assert_eq!(settings, SettingsFile::default());
        assert_eq!(settings.match_config, MatchConfig::default());
    }

    #[test]
    fn partial_match_table_overrides_selected_fields() {
        let settings = SettingsFile::parse(
            r#"
            seed = 99

            [match]
            starting_money = 600
            starting_lives = 3
            "#,
        )
        .expect("settings parse");

        assert_eq!(settings.seed, Some(99));
        assert_eq!(settings.match_config.starting_money, Gold::new(600));
        assert_eq!(settings.match_config.starting_lives, Lives::new(3));
        assert_eq!(settings.match_config.cell_size, 40.0);
    }

    #[test]
    fn unknown_top_level_keys_are_rejected() {
        assert!(SettingsFile::parse("sed = 1").is_err());
    }

    #[test]
    fn missing_settings_file_reports_path() {
        let error = SettingsFile::load(Path::new("no/such/settings.toml"))
            .expect_err("missing file must fail");
        assert!(format!("{error:#}").contains("no/such/settings.toml"));
    }

    #[test]
    fn placement_orders_parse_kind_and_cell() {
        let order: PlacementOrder = "Cannon@3, 2".parse().expect("valid order");
        assert_eq!(
            order,
            PlacementOrder {
                kind: TowerKind::Cannon,
                cell: CellCoord::new(3, 2),
            }
        );
    }

    #[test]
    fn malformed_placement_orders_are_rejected() {
        for value in ["basic", "wizard@1,1", "basic@1", "basic@a,2", "archer@1,-2"] {
            assert!(
                value.parse::<PlacementOrder>().is_err(),
                "`{value}` should not parse"
            );
        }
    }
}
