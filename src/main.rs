//! Space Waves headless runner
//!
//! Plays a complete match at a fixed 60 Hz with a scripted station gunner
//! and no controller input. Humans' crafts sit idle; bots play normally.
//!
//! Usage: `spacewaves [settings.json] [tuning.json]`

use spacewaves::consts::FRAME_DT;
use spacewaves::sim::{GameEvent, GameState, PinholeView, RoundPhase, TickInput, tick};
use spacewaves::{SimResult, SimTuning, Settings};

/// Gun damage per frame against the targeted projectile
const GUN_DAMAGE: f32 = 0.4;
/// Stop after this many simulated seconds even if the match hasn't ended
const MAX_MATCH_SECS: f32 = 60.0 * 60.0;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Space Waves (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (settings, tuning) = match load_config(args.first(), args.get(1)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut state = GameState::new(settings, tuning);
    let mut view = PinholeView::new(320.0, 240.0, 75.0);
    let mut elapsed = 0.0;

    while !state.match_over && elapsed < MAX_MATCH_SECS {
        let input = if state.phase == RoundPhase::GetReady {
            TickInput::with_start(state.player_turn)
        } else {
            TickInput::default()
        };

        if state.phase == RoundPhase::Play {
            man_the_gun(&mut state);
        }
        view.set_forward(state.station.forward());
        tick(&mut state, &input, &view, FRAME_DT);
        elapsed += FRAME_DT;

        for event in state.drain_events() {
            match event {
                GameEvent::StationHit { damage, attacker } => {
                    log::info!("Player {} hit the station for {}", attacker + 1, damage)
                }
                GameEvent::CraftDestroyed { craft } => log::info!("Craft {} destroyed", craft),
                GameEvent::MatchEnded { winner } => match winner {
                    Some(player) => println!("Winner: player {}", player + 1),
                    None => println!("No winner"),
                },
                other => log::trace!("{:?}", other),
            }
        }
    }

    println!("Final scores: {:?}", state.scores);
}

fn load_config(
    settings_path: Option<&String>,
    tuning_path: Option<&String>,
) -> Result<(Settings, SimTuning), Box<dyn std::error::Error>> {
    let settings = match settings_path {
        Some(path) => Settings::from_json(&std::fs::read_to_string(path)?)?,
        None => Settings::default(),
    };
    let tuning = match tuning_path {
        Some(path) => SimTuning::from_json(&std::fs::read_to_string(path)?)?,
        None => SimTuning::default(),
    };
    check(&settings, &tuning)?;
    Ok((settings, tuning))
}

fn check(settings: &Settings, tuning: &SimTuning) -> SimResult<()> {
    settings.validate()?;
    tuning.validate()
}

/// Aim the turret at the closest incoming projectile and shoot at it
fn man_the_gun(state: &mut GameState) {
    let closest = state
        .crafts
        .crafts
        .iter()
        .enumerate()
        .flat_map(|(c, craft)| {
            let asteroids = craft.asteroids.slots.iter().map(move |(i, p)| (c, false, i, p.polar));
            let rockets = craft.rockets.slots.iter().map(move |(i, p)| (c, true, i, p.polar));
            asteroids.chain(rockets)
        })
        .min_by(|a, b| a.3.radius.total_cmp(&b.3.radius));

    if let Some((c, rocket, index, polar)) = closest {
        state.station.aim(polar.pitch, polar.yaw);
        if let Some(craft) = state.crafts.crafts.get_mut(c) {
            let pool = if rocket {
                &mut craft.rockets
            } else {
                &mut craft.asteroids
            };
            pool.register_hit(index, GUN_DAMAGE);
        }
    }
}
