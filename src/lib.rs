pub mod cli;
pub mod console;
pub mod creator;
pub mod session;
pub mod ui;

pub use crate::cli::{parse_args, CliOptions, Command};

use crate::session::Session;
use anyhow::Context;
use creature_battle_core::ai::RandomSelector;
use creature_battle_core::battle::BattleOptions;
use creature_battle_core::loader::populate_registry;
use creature_battle_core::model::MOVE_SLOTS;
use creature_battle_core::registry::Registry;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Read both data files into a fresh registry.
pub fn load_registry(opts: &CliOptions, rng: &mut SmallRng) -> anyhow::Result<Registry> {
    let mut registry = Registry::new();
    populate_registry(
        &mut registry,
        &opts.moves_path(),
        &opts.creatures_path(),
        opts.moves_per_creature,
        rng,
    )
    .with_context(|| format!("Failed to load data from {}", opts.data_dir.display()))?;
    Ok(registry)
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    if !(1..=MOVE_SLOTS).contains(&opts.moves_per_creature) {
        anyhow::bail!("--moves-per-creature must be between 1 and {MOVE_SLOTS}");
    }
    let mut rng = match opts.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let registry = load_registry(&opts, &mut rng)?;
    info!(creatures = registry.len(), seed = ?opts.seed, "starting session");

    let selector = RandomSelector::new(rng.gen());
    let options = BattleOptions {
        max_turns: opts.max_turns,
    };
    let mut session = Session::new(console::stdio(), registry, selector, options)
        .with_battle_log(opts.log_path.clone());
    session.run()
}
