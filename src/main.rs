use std::path::PathBuf;

use anyhow::Context;
use sheetmark::config::AppConfig;
use sheetmark::core::replay::{self, ReplayScript};

const USAGE: &str = "usage: sheetmark replay <script.json> [out-dir]";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("replay") => {
            let script_path = PathBuf::from(args.next().context(USAGE)?);
            let out_dir = args.next().map_or_else(|| PathBuf::from("."), PathBuf::from);
            let config = AppConfig::load();
            let script = ReplayScript::load(&script_path)?;
            let outcome = replay::run(script, &config, &out_dir)?;
            for ack in &outcome.submitted {
                println!("submitted {}", ack.receipt);
            }
            for path in &outcome.composites {
                println!("composite {}", path.display());
            }
            Ok(())
        }
        _ => anyhow::bail!(USAGE),
    }
}
