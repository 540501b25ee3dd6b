use clap::Args;
use itertools::Itertools;
use miette::{miette, Result};
use owo_colors::OwoColorize;

use super::settings::SettingsArgs;

#[derive(Args)]
pub struct ParamArgs {
    #[command(flatten)]
    settings: SettingsArgs,

    /// A registered parameter key, such as ClassMaskParameter
    #[arg(value_name = "KEY")]
    key: String,

    /// Values to resolve; every option of the parameter is listed when none are given
    #[arg(value_name = "VALUE", allow_negative_numbers = true)]
    values: Vec<i64>,
}

impl ParamArgs {
    pub fn handle(&self) -> Result<()> {
        let loaded = self.settings.load()?;
        let registry = loaded
            .registry
            .lock()
            .map_err(|_| miette!("parameter registry is poisoned"))?;

        let parameter = registry.get(&self.key).ok_or_else(|| {
            miette!(
                help = format!("known keys: {}", registry.keys().join(", ")),
                "no parameter registered as {}",
                self.key
            )
        })?;

        if self.values.is_empty() {
            for (value, option) in parameter.items().iter() {
                match &option.description {
                    Some(description) => {
                        println!("{:>8} {} {}", value.yellow(), option.name, description.dimmed())
                    }
                    None => println!("{:>8} {}", value.yellow(), option.name),
                }
            }
            return Ok(());
        }

        for value in &self.values {
            let name = parameter.resolve(*value);
            match (&name, parameter.external_url(*value)) {
                (_, Some(url)) => println!(
                    "{:>8} {} {}",
                    value.yellow(),
                    name.as_deref().unwrap_or_default(),
                    url.underline()
                ),
                (Some(name), None) => println!("{:>8} {}", value.yellow(), name),
                (None, None) => println!("{:>8} {}", value.yellow(), "unknown".red()),
            }
        }
        Ok(())
    }
}
