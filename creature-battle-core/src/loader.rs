//! Builds creatures from the two CSV data files: one with moves, one with
//! creature stats and their damage-multiplier columns.

use crate::model::{is_valid_multiplier, Creature, DamageMultipliers, Move, MoveSet, MOVE_SLOTS};
use crate::registry::Registry;
use crate::types::ElementType;
use anyhow::{anyhow, bail, Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;
use tracing::{debug, info, warn};

pub const DEFAULT_MOVES_PER_CREATURE: usize = 4;

const MOVE_NAME_COLUMNS: &[&str] = &["move_name", "name", "move"];
const MOVE_POWER_COLUMNS: &[&str] = &["attack", "power"];

/// A creature row before moves are handed out.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureRecord {
    pub name: String,
    pub hit_points: i32,
    pub element: ElementType,
    pub damage_multipliers: DamageMultipliers,
}

/// Header plus data rows of a CSV document. Each row keeps the 1-based line
/// number it starts on for error messages.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<(usize, Vec<String>)>,
}

impl CsvTable {
    /// Blank lines between records are skipped. A quoted field may run over
    /// several lines; its line breaks are kept as `\n`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut records = Vec::new();
        let mut pending: Option<(usize, String)> = None;
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            let (start, record) = match pending.take() {
                Some((start, mut record)) => {
                    record.push('\n');
                    record.push_str(line);
                    (start, record)
                }
                None if line.trim().is_empty() => continue,
                None => (idx + 1, line.to_string()),
            };
            let (fields, open) = scan_record(&record);
            if open {
                pending = Some((start, record));
            } else {
                records.push((start, fields));
            }
        }
        if let Some((start, _)) = pending {
            bail!("line {start}: unterminated quoted field");
        }

        let mut records = records.into_iter();
        let (_, header) = records.next().ok_or_else(|| anyhow!("file is empty"))?;
        let headers = header.into_iter().map(|h| h.trim().to_string()).collect();
        Ok(Self {
            headers,
            rows: records.collect(),
        })
    }

    /// Index of the first header matching any of `names`, ignoring case.
    pub fn column(&self, names: &[&str]) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    }

    fn require_column(&self, names: &[&str]) -> Result<usize> {
        self.column(names)
            .ok_or_else(|| anyhow!("missing column '{}'", names[0]))
    }
}

/// Split one CSV record. Fields may be wrapped in double quotes, with `""`
/// standing for a literal quote inside them.
pub fn split_record(line: &str) -> Result<Vec<String>> {
    let (fields, open) = scan_record(line);
    if open {
        bail!("unterminated quoted field");
    }
    Ok(fields)
}

/// Fields of `record`, and whether it ends inside a quoted field.
fn scan_record(record: &str) -> (Vec<String>, bool) {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = record.chars().peekable();
    let mut in_quotes = false;
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    (fields, in_quotes)
}

fn cell<'a>(fields: &'a [String], idx: usize) -> &'a str {
    fields.get(idx).map(|s| s.trim()).unwrap_or("")
}

pub fn parse_moves(text: &str) -> Result<Vec<Move>> {
    let table = CsvTable::parse(text)?;
    let name_col = table.require_column(MOVE_NAME_COLUMNS)?;
    let power_col = table.require_column(MOVE_POWER_COLUMNS)?;
    let mut moves = Vec::with_capacity(table.rows.len());
    for (line_no, fields) in &table.rows {
        let name = cell(fields, name_col);
        let raw_power = cell(fields, power_col);
        let power = if raw_power.is_empty() {
            0
        } else {
            raw_power
                .parse::<u32>()
                .with_context(|| format!("line {line_no}: attack '{raw_power}' of '{name}' is not a non-negative integer"))?
        };
        debug!(line = line_no, name, power, "parsed move");
        moves.push(Move::new(name, power));
    }
    Ok(moves)
}

pub fn parse_creatures(text: &str) -> Result<Vec<CreatureRecord>> {
    let table = CsvTable::parse(text)?;
    let name_col = table.require_column(&["name"])?;
    let hp_col = table.require_column(&["hp"])?;
    let type_col = table.require_column(&["type"])?;
    let first_multiplier = name_col.max(hp_col).max(type_col) + 1;
    let mut multiplier_cols = Vec::new();
    for (idx, header) in table.headers.iter().enumerate().skip(first_multiplier) {
        let element = ElementType::from_name(header)
            .ok_or_else(|| anyhow!("column '{header}' is not a creature type"))?;
        multiplier_cols.push((idx, element));
    }
    if multiplier_cols.len() != ElementType::COUNT {
        warn!(
            columns = multiplier_cols.len(),
            "creature file does not list a multiplier for every type"
        );
    }

    let mut records = Vec::with_capacity(table.rows.len());
    for (line_no, fields) in &table.rows {
        let name = cell(fields, name_col).to_string();
        let raw_hp = cell(fields, hp_col);
        let hit_points = raw_hp
            .parse::<i32>()
            .with_context(|| format!("line {line_no}: HP '{raw_hp}' of '{name}' is not an integer"))?;
        let element = cell(fields, type_col)
            .parse::<ElementType>()
            .with_context(|| format!("line {line_no}: bad type for '{name}'"))?;
        let mut damage_multipliers = DamageMultipliers::new();
        for &(idx, attacking) in &multiplier_cols {
            let raw = cell(fields, idx);
            let value = raw.parse::<f64>().with_context(|| {
                format!("line {line_no}: {attacking} multiplier '{raw}' of '{name}' is not a number")
            })?;
            if !is_valid_multiplier(value) {
                bail!("line {line_no}: {attacking} multiplier '{raw}' of '{name}' must be a finite number of at least 0");
            }
            damage_multipliers.insert(attacking, value);
        }
        records.push(CreatureRecord {
            name,
            hit_points,
            element,
            damage_multipliers,
        });
    }
    Ok(records)
}

/// Fill slots 1..=`count` with moves drawn uniformly, with replacement.
pub fn random_move_set<R: Rng + ?Sized>(moves: &[Move], count: usize, rng: &mut R) -> Result<MoveSet> {
    if !(1..=MOVE_SLOTS).contains(&count) {
        bail!("a creature can only have 1 to {MOVE_SLOTS} moves, got {count}");
    }
    let picked = (0..count)
        .map(|_| moves.choose(&mut *rng).cloned().ok_or_else(|| anyhow!("no moves to choose from")))
        .collect::<Result<Vec<_>>>()?;
    Ok(MoveSet::from_moves(picked)?)
}

pub fn build_creatures<R: Rng + ?Sized>(
    records: Vec<CreatureRecord>,
    moves: &[Move],
    moves_per_creature: usize,
    rng: &mut R,
) -> Result<Vec<Creature>> {
    records
        .into_iter()
        .map(|record| {
            let move_set = random_move_set(moves, moves_per_creature, &mut *rng)?;
            Creature::new(
                record.name.clone(),
                record.hit_points,
                move_set,
                record.element,
                Some(record.damage_multipliers),
            )
            .with_context(|| format!("failed to build creature '{}'", record.name))
        })
        .collect()
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

pub fn load_moves(path: &Path) -> Result<Vec<Move>> {
    parse_moves(&read(path)?).with_context(|| format!("failed to parse moves from {}", path.display()))
}

pub fn load_creatures(path: &Path) -> Result<Vec<CreatureRecord>> {
    parse_creatures(&read(path)?)
        .with_context(|| format!("failed to parse creatures from {}", path.display()))
}

/// Load both files and register every creature, each with
/// `moves_per_creature` random moves. Returns how many were registered.
pub fn populate_registry<R: Rng + ?Sized>(
    registry: &mut Registry,
    moves_path: &Path,
    creatures_path: &Path,
    moves_per_creature: usize,
    rng: &mut R,
) -> Result<usize> {
    let moves = load_moves(moves_path)?;
    let records = load_creatures(creatures_path)?;
    let creatures = build_creatures(records, &moves, moves_per_creature, rng)?;
    let count = creatures.len();
    for creature in creatures {
        registry.register(creature);
    }
    info!(
        moves = moves.len(),
        creatures = count,
        registered = registry.len(),
        "loaded data files"
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const MOVES: &str = "move_name,type,attack\nPound,normal,40\nGrowl,normal,\n\"Slam, Hard\",normal,80\n";

    fn creatures_csv(rows: &[&str]) -> String {
        let header = std::iter::once("Name,HP,Type".to_string())
            .chain(ElementType::ALL.iter().map(|t| t.as_str().to_string()))
            .collect::<Vec<_>>()
            .join(",");
        let mut text = header;
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn split_record_handles_quotes() -> Result<()> {
        assert_eq!(split_record("a,b,,c")?, ["a", "b", "", "c"]);
        assert_eq!(split_record("\"x, y\",2")?, ["x, y", "2"]);
        assert_eq!(split_record("\"say \"\"hi\"\"\",1")?, ["say \"hi\"", "1"]);
        assert!(split_record("\"open,1").is_err());
        Ok(())
    }

    #[test]
    fn quoted_fields_may_span_lines() -> Result<()> {
        let text = "move_name,attack\n\"Double\n\nSlap\",15\n\nPound,40\n";
        let table = CsvTable::parse(text)?;
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], (2, vec!["Double\n\nSlap".to_string(), "15".to_string()]));
        assert_eq!(table.rows[1].0, 6);
        let moves = parse_moves(text)?;
        assert_eq!(moves, vec![Move::new("Double\n\nSlap", 15), Move::new("Pound", 40)]);
        Ok(())
    }

    #[test]
    fn quote_left_open_at_end_of_file_is_an_error() {
        let err = CsvTable::parse("move_name,attack\nPound,40\n\"Slam,80\n").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("line 3"), "{message}");
        assert!(message.contains("unterminated"), "{message}");
    }

    #[test]
    fn empty_attack_parses_as_zero() -> Result<()> {
        let moves = parse_moves(MOVES)?;
        assert_eq!(
            moves,
            vec![
                Move::new("Pound", 40),
                Move::new("Growl", 0),
                Move::new("Slam, Hard", 80)
            ]
        );
        Ok(())
    }

    #[test]
    fn negative_attack_is_an_error() {
        let err = parse_moves("move_name,attack\nOops,-5\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn missing_power_column_is_an_error() {
        let err = parse_moves("move_name,type\nPound,normal\n").unwrap_err();
        assert!(err.to_string().contains("attack"));
    }

    #[test]
    fn creature_rows_map_columns_to_types() -> Result<()> {
        let row = "Charmander,39,fire,1,0.5,2,1,0.5,1,1,1,2,1,1,0.5,2,1,1";
        let records = parse_creatures(&creatures_csv(&[row]))?;
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.name, "Charmander");
        assert_eq!(record.hit_points, 39);
        assert_eq!(record.element, ElementType::Fire);
        assert_eq!(record.damage_multipliers.len(), 15);
        assert_eq!(record.damage_multipliers.get(ElementType::Water), Some(2.0));
        assert_eq!(record.damage_multipliers.get(ElementType::Fire), Some(0.5));
        Ok(())
    }

    #[test]
    fn bad_multiplier_reports_line() {
        let row = "Bad,10,fire,1,x,1,1,1,1,1,1,1,1,1,1,1,1,1";
        let err = parse_creatures(&creatures_csv(&[row])).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("line 2"), "{message}");
        assert!(message.contains("fire multiplier"), "{message}");
    }

    #[test]
    fn negative_or_infinite_multiplier_is_rejected() {
        for bad in ["-1000000000000", "-0.5", "inf", "NaN"] {
            let row = format!("Bad,10,fire,{bad},1,1,1,1,1,1,1,1,1,1,1,1,1,1");
            let err = parse_creatures(&creatures_csv(&[&row])).unwrap_err();
            let message = format!("{err:#}");
            assert!(message.contains("line 2"), "{message}");
            assert!(message.contains("normal multiplier"), "{message}");
        }
    }

    #[test]
    fn unknown_type_column_is_an_error() {
        let err = parse_creatures("Name,HP,Type,steel\nA,1,fire,1\n").unwrap_err();
        assert!(err.to_string().contains("steel"));
    }

    #[test]
    fn build_assigns_requested_number_of_moves() -> Result<()> {
        let moves = parse_moves(MOVES)?;
        let row = "Mon,10,water,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1";
        let mut rng = SmallRng::seed_from_u64(3);
        for count in 1..=4 {
            let records = parse_creatures(&creatures_csv(&[row]))?;
            let built = build_creatures(records, &moves, count, &mut rng)?;
            assert_eq!(built[0].available_moves(), (1..=count).collect::<Vec<_>>());
            for (_, mv) in built[0].moves().iter() {
                assert!(moves.contains(mv));
            }
        }
        Ok(())
    }

    #[test]
    fn move_count_outside_one_to_four_is_rejected() {
        let moves = vec![Move::new("Pound", 40)];
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(random_move_set(&moves, 0, &mut rng).is_err());
        assert!(random_move_set(&moves, 5, &mut rng).is_err());
        assert!(random_move_set(&[], 2, &mut rng).is_err());
    }

    #[test]
    fn non_positive_hp_row_fails_construction() -> Result<()> {
        let moves = parse_moves(MOVES)?;
        let row = "Zero,0,water,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1";
        let records = parse_creatures(&creatures_csv(&[row]))?;
        let mut rng = SmallRng::seed_from_u64(0);
        let err = build_creatures(records, &moves, 4, &mut rng).unwrap_err();
        assert!(format!("{err:#}").contains("Zero"));
        Ok(())
    }
}
