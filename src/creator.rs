use crate::console::{parse_float_list, parse_integer, Console};
use crate::ui;
use anyhow::Result;
use creature_battle_core::model::{is_valid_multiplier, DamageMultipliers, Move, MoveSet, MOVE_SLOTS};
use creature_battle_core::registry::Registry;
use creature_battle_core::types::ElementType;
use std::io::{BufRead, Write};
use tracing::info;

/// Walk the person at the console through every field of a new creature and
/// register it. Returns the creature's name.
pub fn create_via_terminal<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    registry: &mut Registry,
) -> Result<String> {
    console.say(ui::heading("CREATE A CREATURE"))?;

    let name = console.prompt_parsed("what is the name of the creature: ", |input| {
        if input.is_empty() {
            Err("The name cannot be empty".to_string())
        } else {
            Ok(input.to_string())
        }
    })?;

    console.say(format!("Available types: {}", ui::type_list()))?;
    let element = console.prompt_parsed("what is the type of the creature: ", |input| {
        ElementType::from_name(input).ok_or_else(|| "That creature type does not exist".to_string())
    })?;

    let hit_points = console.prompt_parsed("what is the hp of the creature: ", |input| {
        let value = parse_integer(input).map_err(|_| "The hp value is not an integer".to_string())?;
        i32::try_from(value)
            .ok()
            .filter(|hp| *hp > 0)
            .ok_or_else(|| "The hp value must be a positive integer".to_string())
    })?;

    let move_count = console.prompt_parsed(
        &format!("how many moves does the creature have (1 to {MOVE_SLOTS}): "),
        |input| {
            let value =
                parse_integer(input).map_err(|_| "The nr of moves is not an integer".to_string())?;
            usize::try_from(value)
                .ok()
                .filter(|count| (1..=MOVE_SLOTS).contains(count))
                .ok_or_else(|| format!("The creature can only have 1 to {MOVE_SLOTS} moves"))
        },
    )?;

    let mut moves = Vec::with_capacity(move_count);
    for slot in 1..=move_count {
        console.say(ui::heading(&format!("MOVE {slot}")))?;
        let move_name = console.prompt_line(&format!("The name of move {slot}: "))?;
        let power = console.prompt_parsed("what is the attack of the move: ", |input| {
            let value =
                parse_integer(input).map_err(|_| "The attack value is not an integer".to_string())?;
            if value < 0 {
                return Err("the attack value is negative".to_string());
            }
            u32::try_from(value).map_err(|_| "the attack value is too large".to_string())
        })?;
        moves.push(Move::new(move_name.trim(), power));
    }

    console.say(format!(
        "insert multiplicative damage taken per type as {} float values separated with a comma \
         (leave empty for the standard chart)",
        ElementType::COUNT
    ))?;
    console.say(format!("types are in the following order: {}", ui::type_list()))?;
    let damage_multipliers = console.prompt_parsed("values: ", |input| {
        if input.is_empty() {
            return Ok(DamageMultipliers::standard(element));
        }
        let values = parse_float_list(input)?;
        if !values.iter().all(|v| is_valid_multiplier(*v)) {
            return Err("multipliers must be finite and cannot be negative".to_string());
        }
        DamageMultipliers::from_ordered(&values).map_err(|_| {
            format!(
                "not the correct number of values {} != {}",
                values.len(),
                ElementType::COUNT
            )
        })
    })?;

    let move_set = MoveSet::from_moves(moves)?;
    let replaced = registry.contains(&name);
    registry.create(name.clone(), hit_points, move_set, element, Some(damage_multipliers))?;
    info!(%name, %element, hit_points, replaced, "created creature from the console");
    Ok(name)
}
