use std::{
    fs,
    panic::{catch_unwind, AssertUnwindSafe},
    path::Path,
    process,
    sync::mpsc::{self, Receiver},
    thread,
};

use anyhow::bail;
use hanzi_practice::{Cmd, Stroke};
use serde::Deserialize;

/// A recorded drawing: which character it is an attempt at, and the strokes in the order they were
/// written.
#[derive(Deserialize)]
pub struct Script {
    pub character: Option<String>,
    #[serde(default, rename = "stroke")]
    pub strokes: Vec<Stroke>,
}

impl Script {
    pub fn load<A: AsRef<Path>>(path: A) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let script: Self = toml::from_str(&contents)?;

        if script.strokes.iter().any(|s| s.points.is_empty()) {
            bail!("every [[stroke]] needs at least one point");
        }
        Ok(script)
    }
}

/// Replays `strokes` as pointer gestures on a worker thread.
///
/// The returned channel yields the events in order and hangs up once the last stroke has ended.
pub fn spawn(strokes: Vec<Stroke>) -> Receiver<Cmd> {
    let (send_cmd, cmds) = mpsc::channel();
    thread::spawn(move || {
        wrap(move || {
            for stroke in strokes {
                let mut points = stroke.points.into_iter();
                let Some(position) = points.next() else {
                    continue;
                };
                send_cmd.send(Cmd::Begin { position })?;
                for position in points {
                    send_cmd.send(Cmd::Move { position })?;
                }
                send_cmd.send(Cmd::End)?;
            }
            Ok(())
        })
    });
    cmds
}

fn wrap(f: impl FnOnce() -> anyhow::Result<()>) {
    let res = catch_unwind(AssertUnwindSafe(f));
    match res {
        Ok(Ok(())) => log::debug!("input replay finished"),
        Ok(Err(e)) => {
            log::error!("input replay failed: {e}");
            process::exit(1);
        }
        Err(_panic) => {
            // Panic message and backtrace are printed by the default panic hook.
            eprintln!("input thread panicked, exiting");
            process::exit(101);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanzi_practice::math::vec2;

    #[test]
    fn replays_in_order() {
        let strokes = vec![
            Stroke {
                points: vec![vec2(1.0, 1.0), vec2(2.0, 2.0)],
            },
            Stroke {
                points: vec![vec2(5.0, 5.0)],
            },
        ];
        let cmds: Vec<Cmd> = spawn(strokes).iter().collect();
        assert_eq!(
            cmds,
            vec![
                Cmd::Begin {
                    position: vec2(1.0, 1.0)
                },
                Cmd::Move {
                    position: vec2(2.0, 2.0)
                },
                Cmd::End,
                Cmd::Begin {
                    position: vec2(5.0, 5.0)
                },
                Cmd::End,
            ]
        );
    }

    #[test]
    fn parses_script() {
        let script: Script = toml::from_str(
            "character = \"大\"\n[[stroke]]\npoints = [[0.0, 0.0], [10.0, 12.5]]\n",
        )
        .unwrap();
        assert_eq!(script.character.as_deref(), Some("大"));
        assert_eq!(script.strokes[0].points[1], vec2(10.0, 12.5));
    }
}
