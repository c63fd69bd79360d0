use serde::Serialize;
use serde_json::json;

/// One thing that happened during a battle.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BattleEvent {
    Turn {
        turn: u32,
        attacker: String,
        attacker_hp: i32,
        defender: String,
        defender_hp: i32,
        multiplier: f64,
    },
    Attack {
        turn: u32,
        attacker: String,
        slot: usize,
        move_name: String,
        damage: i32,
        defender: String,
        defender_hp: i32,
    },
    Win {
        winner: String,
        winner_hp: i32,
        loser: String,
        turns: u32,
    },
}

/// Records a battle both as typed events and as `|`-separated protocol
/// lines.
#[derive(Clone, Debug, Default)]
pub struct BattleLogger {
    events: Vec<BattleEvent>,
    log: Vec<String>,
}

impl BattleLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: BattleEvent) {
        match &event {
            BattleEvent::Turn { turn, .. } => self.log_turn(*turn),
            BattleEvent::Attack {
                attacker,
                move_name,
                defender,
                defender_hp,
                ..
            } => {
                self.log_move(attacker, move_name, defender);
                self.log_damage(defender, *defender_hp);
            }
            BattleEvent::Win { winner, loser, .. } => {
                self.log_faint(loser);
                self.log_win(winner);
            }
        }
        self.events.push(event);
    }

    fn log_turn(&mut self, turn: u32) {
        self.log.push(format!("|turn|{turn}"));
    }

    fn log_move(&mut self, source: &str, move_name: &str, target: &str) {
        self.log.push(format!("|move|{source}|{move_name}|{target}"));
    }

    fn log_damage(&mut self, target: &str, hp: i32) {
        self.log.push(format!("|-damage|{target}|{hp}"));
    }

    fn log_faint(&mut self, target: &str) {
        self.log.push(format!("|faint|{target}"));
    }

    fn log_win(&mut self, winner: &str) {
        self.log.push(format!("|win|{winner}"));
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "log": self.log,
            "events": self.events,
        })
    }
}
