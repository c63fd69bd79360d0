use creature_battle_core::battle_logger::BattleEvent;
use creature_battle_core::model::Creature;
use creature_battle_core::registry::Registry;
use creature_battle_core::types::ElementType;

pub fn heading(text: &str) -> String {
    format!("---------------------------{text}---------------------------")
}

/// `1.0` instead of `1`, but `0.25` stays `0.25`.
pub fn format_multiplier(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

pub fn creature_list(registry: &Registry) -> Vec<String> {
    let mut lines = vec![heading("AVAILABLE CREATURES")];
    for (idx, creature) in registry.iter().enumerate() {
        let status = if creature.hit_points() == 0 {
            " ---knocked out"
        } else {
            ""
        };
        lines.push(format!(
            "{} > {}, type: {}, hp: {}{}",
            idx + 1,
            creature.name(),
            creature.element(),
            creature.hit_points(),
            status
        ));
    }
    lines
}

pub fn move_lines(creature: &Creature) -> Vec<String> {
    let mut lines = vec![heading("MOVES")];
    for (slot, mv) in creature.moves().iter() {
        lines.push(format!("{slot} > {}, dmg: {}", mv.name, mv.power));
    }
    lines
}

pub fn multiplier_lines(creature: &Creature) -> Vec<String> {
    let mut lines = vec![heading("DAMAGE TAKEN MULTIPLIER PER TYPE")];
    if creature.damage_multipliers().is_empty() {
        lines.push("(no multipliers)".to_string());
    }
    for (element, value) in creature.damage_multipliers().iter() {
        lines.push(format!("{:>8}: {}", element.as_str(), format_multiplier(value)));
    }
    lines
}

pub fn creature_details(creature: &Creature) -> Vec<String> {
    let mut lines = vec![
        format!("Creature name: '{}'", creature.name()),
        format!("Creature hp: '{}'", creature.hit_points()),
        format!("Creature type: '{}'", creature.element()),
    ];
    lines.extend(move_lines(creature));
    lines.extend(multiplier_lines(creature));
    lines
}

pub fn type_list() -> String {
    let names: Vec<&str> = ElementType::ALL.iter().map(|t| t.as_str()).collect();
    names.join(", ")
}

pub fn event_lines(event: &BattleEvent) -> Vec<String> {
    match event {
        BattleEvent::Turn {
            turn,
            attacker,
            attacker_hp,
            defender,
            defender_hp,
            multiplier,
        } => vec![
            heading(&format!("TURN {turn}")),
            format!(
                "{attacker} hp:{attacker_hp} ---> {defender} hp:{defender_hp} (type multiplier = {})",
                format_multiplier(*multiplier)
            ),
        ],
        BattleEvent::Attack {
            attacker,
            move_name,
            damage,
            defender,
            defender_hp,
            ..
        } => vec![
            format!("{attacker} did {move_name} for {damage} Damage to {defender}"),
            format!("{defender} has {defender_hp} HP left"),
        ],
        BattleEvent::Win {
            winner, winner_hp, ..
        } => vec![
            heading("WINNER: "),
            format!("{winner} wins! ({winner_hp} HP left)"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creature_battle_core::model::{DamageMultipliers, Move, MoveSet};

    fn mon(name: &str, hp: i32) -> Creature {
        let slots = [Some(Move::new("Ember", 40)), None, Some(Move::new("Growl", 0)), None];
        Creature::new(
            name,
            hp,
            MoveSet::new(slots),
            ElementType::Fire,
            Some(DamageMultipliers::standard(ElementType::Fire)),
        )
        .unwrap()
    }

    #[test]
    fn list_marks_knocked_out_creatures() {
        let mut registry = Registry::new();
        registry.register(mon("Charmander", 39));
        registry.register(mon("Vulpix", 38));
        registry.get_mut("Vulpix").unwrap().revive(0);
        let lines = creature_list(&registry);
        assert_eq!(lines[1], "1 > Charmander, type: fire, hp: 39");
        assert_eq!(lines[2], "2 > Vulpix, type: fire, hp: 0 ---knocked out");
    }

    #[test]
    fn moves_keep_their_slot_numbers() {
        let lines = move_lines(&mon("Charmander", 39));
        assert_eq!(&lines[1..], ["1 > Ember, dmg: 40", "3 > Growl, dmg: 0"]);
    }

    #[test]
    fn details_include_every_multiplier() {
        let lines = creature_details(&mon("Charmander", 39));
        assert_eq!(lines[0], "Creature name: 'Charmander'");
        assert!(lines.iter().any(|l| l == "   water: 2.0"));
        assert!(lines.iter().any(|l| l == "    fire: 0.5"));
        let table_start = lines
            .iter()
            .position(|l| l.contains("DAMAGE TAKEN"))
            .unwrap();
        assert_eq!(lines.len() - table_start - 1, 15);
    }

    #[test]
    fn turn_and_win_events_render_like_the_console_report() {
        let turn = BattleEvent::Turn {
            turn: 3,
            attacker: "A".into(),
            attacker_hp: 10,
            defender: "B".into(),
            defender_hp: -2,
            multiplier: 2.0,
        };
        assert_eq!(
            event_lines(&turn),
            [
                heading("TURN 3"),
                "A hp:10 ---> B hp:-2 (type multiplier = 2.0)".to_string()
            ]
        );
        let win = BattleEvent::Win {
            winner: "A".into(),
            winner_hp: 10,
            loser: "B".into(),
            turns: 3,
        };
        assert_eq!(event_lines(&win)[1], "A wins! (10 HP left)");
    }
}
