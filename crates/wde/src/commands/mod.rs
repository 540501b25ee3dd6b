pub mod check;
pub mod dump;
pub mod load;
pub mod param;
pub mod profiles;
pub mod settings;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Load every table of a client and summarize the published lookups
    Load(load::LoadArgs),
    /// Print one lookup table of a loaded client
    Dump(dump::DumpArgs),
    /// Resolve a value through a registered parameter
    Param(param::ParamArgs),
    /// List the table files a client profile reads and whether they are present
    Check(check::CheckArgs),
    /// List the supported client versions
    Profiles(profiles::ProfilesArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Load(load) => load.handle(),
            Commands::Dump(dump) => dump.handle(),
            Commands::Param(param) => param.handle(),
            Commands::Check(check) => check.handle(),
            Commands::Profiles(profiles) => profiles.handle(),
        }
    }
}
