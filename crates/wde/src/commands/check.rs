use clap::Args;
use itertools::Itertools;
use miette::{miette, Result};
use owo_colors::OwoColorize;
use std::collections::HashSet;
use tracing::info;
use walkdir::WalkDir;
use wde_store::load::resolve;
use wde_store::profile::profile;

use super::settings::SettingsArgs;

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    settings: SettingsArgs,

    /// Also list table files in the directory that the profile never reads
    #[arg(long, default_value_t = false)]
    unused: bool,
}

impl CheckArgs {
    pub fn handle(&self) -> Result<()> {
        let settings = self.settings.settings()?;
        if !settings.path.is_dir() {
            return Err(miette!(
                "{} is not a directory",
                settings.path.display()
            ));
        }

        let profile = profile(settings.version);
        info!(
            "checking {} tables of {}",
            profile.table_count(),
            settings.version
        );

        let mut read = HashSet::new();
        let mut missing = 0usize;
        for file in profile.directives().map(|d| d.file).unique() {
            match resolve(&settings.path, file) {
                Some(path) => {
                    println!("✅ {}", file.green());
                    read.insert(path);
                }
                None => {
                    println!("❌ {}", file.red());
                    missing += 1;
                }
            }
        }

        if self.unused {
            let unused = WalkDir::new(&settings.path)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| {
                    p.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case("dbc") || e.eq_ignore_ascii_case("db2"))
                })
                .filter(|p| !read.contains(p))
                .sorted()
                .collect::<Vec<_>>();
            for path in &unused {
                println!(
                    "➖ {}",
                    path.file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default()
                        .dimmed()
                );
            }
        }

        if missing > 0 {
            println!(
                "{}",
                format!("{missing} tables missing, their lookups will stay empty").yellow()
            );
        }
        Ok(())
    }
}
