use clap::Args;
use itertools::Itertools;
use miette::Result;
use owo_colors::OwoColorize;
use wde_store::IdStore;

use super::settings::SettingsArgs;

#[derive(Args)]
pub struct LoadArgs {
    #[command(flatten)]
    settings: SettingsArgs,

    /// Also list the registered parameters with their entry counts
    #[arg(long, default_value_t = false)]
    parameters: bool,
}

impl LoadArgs {
    pub fn handle(&self) -> Result<()> {
        let loaded = self.settings.load()?;
        let snapshot = &loaded.snapshot;

        println!(
            "{} {} ({})",
            "loaded".green(),
            snapshot.version().bold(),
            snapshot.locale()
        );
        println!(
            "{} areas, {} maps, {} factions, {} spells in the spell service",
            snapshot.areas().len(),
            snapshot.maps().len(),
            snapshot.factions().len(),
            snapshot.spell_service().spell_count()
        );

        let filled = snapshot.filled();
        for (store, count) in filled
            .iter()
            .map(|store| (store, snapshot.names(*store).len()))
            .sorted_by_key(|(store, _)| store.to_string())
        {
            println!("  {:<24} {count:>8}", store.to_string().cyan());
        }
        for store in [
            IdStore::FactionTemplate,
            IdStore::CreatureDisplayInfo,
            IdStore::BattlePetSpecies,
        ] {
            let count = snapshot.ids(store).len();
            if count > 0 {
                println!("  {:<24} {count:>8}", store.to_string().cyan());
            }
        }

        if filled.is_empty() {
            println!("{}", "every lookup is empty".dimmed());
        }

        if self.parameters {
            let registry = loaded
                .registry
                .lock()
                .map_err(|_| miette::miette!("parameter registry is poisoned"))?;
            for key in registry.keys() {
                let count = registry.get(key).map(|p| p.items().len()).unwrap_or_default();
                println!("  {:<40} {count:>8}", key);
            }
        }

        Ok(())
    }
}
