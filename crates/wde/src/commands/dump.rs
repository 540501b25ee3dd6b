use clap::Args;
use miette::{IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use std::collections::BTreeMap;
use tracing::warn;
use wde_store::Store;

use super::settings::SettingsArgs;

#[derive(Args)]
pub struct DumpArgs {
    #[command(flatten)]
    settings: SettingsArgs,

    /// The lookup to print, such as Spell, Area or ExtendedCost
    #[arg(value_name = "LOOKUP")]
    store: Store,

    /// Print at most this many entries
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Print a JSON object instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl DumpArgs {
    pub fn handle(&self) -> Result<()> {
        let loaded = self.settings.load()?;
        let table = loaded.snapshot.names(self.store);
        if table.is_empty() {
            warn!(
                "{} has no {} entries",
                loaded.settings.version, self.store
            );
        }

        let entries = table
            .sorted()
            .into_iter()
            .take(self.limit.unwrap_or(usize::MAX));

        if self.json {
            let object: BTreeMap<i64, &String> = entries.collect();
            let text = serde_json::to_string_pretty(&object).into_diagnostic()?;
            println!("{text}");
        } else {
            for (id, name) in entries {
                println!("{:>8} {}", id.yellow(), name);
            }
        }
        Ok(())
    }
}
