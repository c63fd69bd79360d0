use crate::console::{parse_integer, Console, ConsoleSelector};
use crate::creator::create_via_terminal;
use crate::ui;
use anyhow::{Context, Result};
use creature_battle_core::ai::RandomSelector;
use creature_battle_core::battle::{Battle, BattleOptions, TurnReport};
use creature_battle_core::battle_logger::BattleEvent;
use creature_battle_core::error::BattleError;
use creature_battle_core::model::DEFAULT_REVIVE_HP;
use creature_battle_core::registry::Registry;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuChoice {
    List,
    Show,
    RandomBattle,
    ManualBattle,
    Revive,
    Create,
    Quit,
}

impl MenuChoice {
    const ENTRIES: [(&'static str, MenuChoice, &'static str); 7] = [
        ("1", MenuChoice::List, "list all creatures"),
        ("2", MenuChoice::Show, "show a creature"),
        ("3", MenuChoice::RandomBattle, "battle (random moves)"),
        ("4", MenuChoice::ManualBattle, "battle (choose moves)"),
        ("5", MenuChoice::Revive, "revive a creature"),
        ("6", MenuChoice::Create, "create a creature"),
        ("0", MenuChoice::Quit, "quit"),
    ];

    fn parse(input: &str) -> Result<MenuChoice, String> {
        Self::ENTRIES
            .iter()
            .find(|(key, _, _)| *key == input)
            .map(|(_, choice, _)| *choice)
            .ok_or_else(|| format!("'{input}' is not a menu option"))
    }
}

/// The interactive menu loop around one registry.
pub struct Session<R, W> {
    console: Console<R, W>,
    registry: Registry,
    selector: RandomSelector,
    options: BattleOptions,
    log_path: Option<PathBuf>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        console: Console<R, W>,
        registry: Registry,
        selector: RandomSelector,
        options: BattleOptions,
    ) -> Self {
        Self {
            console,
            registry,
            selector,
            options,
            log_path: None,
        }
    }

    /// Write the JSON log of every battle to `path`, replacing the previous
    /// one.
    pub fn with_battle_log(mut self, path: Option<PathBuf>) -> Self {
        self.log_path = path;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn into_parts(self) -> (Registry, W) {
        (self.registry, self.console.into_output())
    }

    /// Serve menu choices until the user quits or input runs out.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.run_once() {
                Ok(MenuChoice::Quit) => return Ok(()),
                Ok(_) => {}
                Err(err) if is_end_of_input(&err) => {
                    info!("input closed, leaving the session");
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn run_once(&mut self) -> Result<MenuChoice> {
        self.console.say(ui::heading("MENU"))?;
        for (key, _, label) in MenuChoice::ENTRIES {
            self.console.say(format!("{key} > {label}"))?;
        }
        let choice = self.console.prompt_parsed("choose an option: ", MenuChoice::parse)?;
        match choice {
            MenuChoice::List => self.console.say_all(ui::creature_list(&self.registry))?,
            MenuChoice::Show => {
                if let Some(name) = self.pick_creature("which creature do you want to see: ")? {
                    if let Some(creature) = self.registry.get(&name) {
                        self.console.say_all(ui::creature_details(creature))?;
                    }
                }
            }
            MenuChoice::RandomBattle => self.battle(false)?,
            MenuChoice::ManualBattle => self.battle(true)?,
            MenuChoice::Revive => self.revive()?,
            MenuChoice::Create => {
                create_via_terminal(&mut self.console, &mut self.registry)?;
            }
            MenuChoice::Quit => {}
        }
        Ok(choice)
    }

    /// Pick a creature by list number or name. `None` when the registry is
    /// empty.
    fn pick_creature(&mut self, message: &str) -> io::Result<Option<String>> {
        if self.registry.is_empty() {
            self.console.say("There are no creatures yet")?;
            return Ok(None);
        }
        self.console.say_all(ui::creature_list(&self.registry))?;
        let registry = &self.registry;
        let name = self.console.prompt_parsed(message, |input| {
            let found = match input.parse::<usize>() {
                Ok(position) => registry.by_position(position),
                Err(_) => registry.get(input),
            };
            found
                .map(|creature| creature.name().to_string())
                .ok_or_else(|| format!("There is no creature '{input}'"))
        })?;
        Ok(Some(name))
    }

    fn battle(&mut self, manual: bool) -> Result<()> {
        let Some(first) = self.pick_creature("choose the first creature (attacks first): ")? else {
            return Ok(());
        };
        let Some(second) = self.pick_creature("choose its opponent: ")? else {
            return Ok(());
        };
        if first == second {
            self.console.say("A creature cannot fight itself")?;
            return Ok(());
        }

        let (a, b) = self.registry.pair_mut(&first, &second)?;
        let mut battle = Battle::new(a, b, self.options.clone());
        let mut printed = 0;
        let result = loop {
            let step = if manual {
                battle.step(&mut ConsoleSelector::new(&mut self.console))
            } else {
                battle.step(&mut self.selector)
            };
            let events = &battle.logger().events()[printed..];
            printed += events.len();
            for event in events {
                if manual && matches!(event, BattleEvent::Turn { .. }) {
                    continue;
                }
                self.console.say_all(ui::event_lines(event))?;
            }
            match step {
                Ok(TurnReport::Attack(_)) => {}
                Ok(TurnReport::Finished(outcome)) => break Ok(outcome),
                Err(err) => break Err(err),
            }
        };
        let logger = battle.into_logger();

        if let Some(path) = &self.log_path {
            let json = serde_json::to_string_pretty(&logger.to_json())?;
            std::fs::write(path, json + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
        }

        match result {
            Ok(outcome) => {
                info!(winner = %outcome.winner_name, turns = outcome.turns, "battle over");
                Ok(())
            }
            Err(BattleError::Input(err)) => Err(err.into()),
            Err(err) => {
                warn!(%err, "battle aborted");
                self.console.say(format!("The battle was aborted: {err}"))?;
                Ok(())
            }
        }
    }

    fn revive(&mut self) -> Result<()> {
        let Some(name) = self.pick_creature("which creature do you want to revive: ")? else {
            return Ok(());
        };
        let hit_points = self.console.prompt_parsed(
            &format!("revive with how many hp (empty for {DEFAULT_REVIVE_HP}): "),
            |input| {
                if input.is_empty() {
                    return Ok(DEFAULT_REVIVE_HP);
                }
                let value = parse_integer(input)?;
                i32::try_from(value)
                    .ok()
                    .filter(|hp| *hp > 0)
                    .ok_or_else(|| "The hp value must be a positive integer".to_string())
            },
        )?;
        self.registry.revive(&name, hit_points)?;
        self.console
            .say(format!("{name} was revived with {hit_points} HP"))?;
        Ok(())
    }
}

fn is_end_of_input(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .map(|io| io.kind() == io::ErrorKind::UnexpectedEof)
            .unwrap_or(false)
    })
}
