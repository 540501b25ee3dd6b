use clap::Args;
use miette::Result;
use owo_colors::OwoColorize;
use wde_store::profile::profile;
use wde_store::ClientVersion;

#[derive(Args)]
pub struct ProfilesArgs {}

impl ProfilesArgs {
    pub fn handle(&self) -> Result<()> {
        for version in [
            ClientVersion::Wrath,
            ClientVersion::Cataclysm,
            ClientVersion::Mists,
            ClientVersion::Legion,
            ClientVersion::Shadowlands,
        ] {
            let profile = profile(version);
            let (major, minor, patch, build) = version.version();
            println!(
                "{:<12} {major}.{minor}.{patch}.{build:<6} {:>3} tables, spell service: {}",
                version.bold(),
                profile.table_count(),
                profile
                    .spell_service
                    .map(|kind| kind.to_string())
                    .unwrap_or_else(|| "none".to_string())
            );
        }
        Ok(())
    }
}
