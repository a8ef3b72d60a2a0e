use std::{env, path::PathBuf};

use anyhow::{bail, Context};
use hanzi_practice::{codec, Config, Session};
use input::Script;

mod input;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_module(env!("CARGO_CRATE_NAME"), log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    let (config, script, out) = match &*env::args_os().skip(1).collect::<Vec<_>>() {
        [config, script] => (config.clone(), script.clone(), None),
        [config, script, out] => (config.clone(), script.clone(), Some(PathBuf::from(out))),
        _ => {
            bail!(
                "usage: {} <config.toml> <drawing.toml> [out.png]",
                env!("CARGO_PKG_NAME")
            );
        }
    };
    let config = Config::load(&config)
        .with_context(|| format!("failed to load config from {}", config.to_string_lossy()))?;
    let script = Script::load(&script)
        .with_context(|| format!("failed to load drawing from {}", script.to_string_lossy()))?;

    let mut session = Session::new(&config);
    if let Some(character) = &script.character {
        let Some(index) = session.characters().iter().position(|c| c == character) else {
            bail!("'{character}' is not in the practice list");
        };
        session.select(index);
    }

    session.capture_mut().drain(input::spawn(script.strokes));
    log::info!(
        "captured {} strokes for '{}'",
        session.capture().stroke_count(),
        session.current_character()
    );

    if let Some(out) = out {
        match session.render()? {
            Some(buf) => {
                std::fs::write(&out, codec::encode_png(&buf)?)?;
                log::info!("wrote raster to {}", out.display());
            }
            None => log::warn!("nothing drawn, not writing {}", out.display()),
        }
    }

    let result = pollster::block_on(session.submit()?)?;
    print!("{}", toml::to_string(&result)?);
    Ok(())
}
