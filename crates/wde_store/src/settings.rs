//! Configuration of a load: where the table files live and which client produced them

use bon::Builder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum::{Display, EnumIter, EnumString};

use crate::error::Result;

/// Client generations with a known table layout
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ClientVersion {
    #[default]
    #[strum(to_string = "wrath", serialize = "wotlk", serialize = "3.3.5.12340", serialize = "12340")]
    #[serde(alias = "wotlk")]
    Wrath,
    #[strum(to_string = "cataclysm", serialize = "cata", serialize = "4.3.4.15595", serialize = "15595")]
    #[serde(alias = "cata")]
    Cataclysm,
    #[strum(to_string = "mists", serialize = "mop", serialize = "5.4.8.18414", serialize = "18414")]
    #[serde(alias = "mop")]
    Mists,
    #[strum(to_string = "legion", serialize = "7.3.5.26972", serialize = "26972")]
    Legion,
    #[strum(to_string = "shadowlands", serialize = "9.1.5.41079", serialize = "41079")]
    Shadowlands,
}

impl ClientVersion {
    /// `(major, minor, patch, build)` of the client
    pub fn version(self) -> (u32, u32, u32, u32) {
        match self {
            ClientVersion::Wrath => (3, 3, 5, 12340),
            ClientVersion::Cataclysm => (4, 3, 4, 15595),
            ClientVersion::Mists => (5, 4, 8, 18414),
            ClientVersion::Legion => (7, 3, 5, 26972),
            ClientVersion::Shadowlands => (9, 1, 5, 41079),
        }
    }

    pub fn build(self) -> u32 {
        self.version().3
    }

    /// Build string understood by wow.tools, which only knows 5.4.8 as build 18273
    pub fn tools_build(self) -> String {
        let (major, minor, patch, build) = self.version();
        let build = if build == 18414 { 18273 } else { build };
        format!("{major}.{minor}.{patch}.{build}")
    }
}

/// Client locales and the column offset of their localized strings
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Locale {
    #[default]
    #[strum(to_string = "enUS", serialize = "enGB")]
    #[serde(rename = "enUS", alias = "enGB")]
    EnUs,
    #[strum(to_string = "koKR")]
    #[serde(rename = "koKR")]
    KoKr,
    #[strum(to_string = "frFR")]
    #[serde(rename = "frFR")]
    FrFr,
    #[strum(to_string = "deDE")]
    #[serde(rename = "deDE")]
    DeDe,
    #[strum(to_string = "enCN", serialize = "zhCN")]
    #[serde(rename = "enCN", alias = "zhCN")]
    EnCn,
    #[strum(to_string = "enTW", serialize = "zhTW")]
    #[serde(rename = "enTW", alias = "zhTW")]
    EnTw,
    #[strum(to_string = "esES")]
    #[serde(rename = "esES")]
    EsEs,
    #[strum(to_string = "esMX")]
    #[serde(rename = "esMX")]
    EsMx,
    #[strum(to_string = "ruRU")]
    #[serde(rename = "ruRU")]
    RuRu,
    #[strum(to_string = "ptPT", serialize = "ptBR")]
    #[serde(rename = "ptPT", alias = "ptBR")]
    PtPt,
    #[strum(to_string = "itIT")]
    #[serde(rename = "itIT")]
    ItIt,
}

impl Locale {
    /// Added to the base column of localized strings
    pub fn offset(self) -> usize {
        match self {
            Locale::EnUs => 0,
            Locale::KoKr => 1,
            Locale::FrFr => 2,
            Locale::DeDe => 3,
            Locale::EnCn => 4,
            Locale::EnTw => 5,
            Locale::EsEs => 6,
            Locale::EsMx => 7,
            Locale::RuRu => 8,
            Locale::PtPt => 10,
            Locale::ItIt => 11,
        }
    }
}

/// Where and how to load client database tables
///
/// ```
/// use wde_store::settings::{ClientVersion, DbcSettings, Locale};
///
/// let settings = DbcSettings::builder()
///     .path("/srv/wow/dbc")
///     .version(ClientVersion::Cataclysm)
///     .locale(Locale::FrFr)
///     .build();
/// assert!(!settings.skip_loading);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct DbcSettings {
    /// Directory holding the `.dbc` / `.db2` files
    #[builder(into)]
    pub path: PathBuf,

    #[builder(default)]
    pub version: ClientVersion,

    #[builder(default)]
    pub locale: Locale,

    /// Register empty lookups without reading any file
    #[builder(default)]
    pub skip_loading: bool,
}

impl DbcSettings {
    /// Read settings from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<DbcSettings> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// Whether a load would read files, as opposed to the degenerate empty pass
    pub fn is_configured(&self) -> bool {
        !self.skip_loading && self.path.is_dir()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    use super::{ClientVersion, DbcSettings, Locale};

    #[test]
    fn locale_aliases_share_offsets() {
        assert_eq!(Locale::from_str("enGB"), Ok(Locale::EnUs));
        assert_eq!(Locale::from_str("zhcn"), Ok(Locale::EnCn));
        assert_eq!(Locale::from_str("ptBR").map(Locale::offset), Ok(10));
        assert_eq!(Locale::ItIt.offset(), 11);
        assert_eq!(Locale::EnUs.to_string(), "enUS");
    }

    #[test]
    fn versions_parse_from_names_and_builds() {
        assert_eq!(ClientVersion::from_str("Cata"), Ok(ClientVersion::Cataclysm));
        assert_eq!(ClientVersion::from_str("26972"), Ok(ClientVersion::Legion));
        assert_eq!(ClientVersion::from_str("3.3.5.12340"), Ok(ClientVersion::Wrath));
        assert!(ClientVersion::from_str("10.0.0").is_err());
        assert_eq!(ClientVersion::Mists.to_string(), "mists");
    }

    #[test]
    fn tools_build_remaps_mists() {
        assert_eq!(ClientVersion::Mists.tools_build(), "5.4.8.18273");
        assert_eq!(ClientVersion::Legion.tools_build(), "7.3.5.26972");
    }

    #[test]
    fn settings_from_json() -> Result<(), serde_json::Error> {
        let settings: DbcSettings =
            serde_json::from_str(r#"{ "path": "/data", "version": "mop", "locale": "enGB" }"#)?;
        assert_eq!(
            settings,
            DbcSettings::builder()
                .path("/data")
                .version(ClientVersion::Mists)
                .locale(Locale::EnUs)
                .build()
        );
        Ok(())
    }

    #[test]
    fn missing_directory_is_not_configured() {
        let settings = DbcSettings::builder().path("/does/not/exist").build();
        assert!(!settings.is_configured());
    }
}
