use crate::ui;
use creature_battle_core::ai::{MoveSelector, TurnContext};
use creature_battle_core::battle_logger::BattleEvent;
use creature_battle_core::error::BattleError;
use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Line-oriented prompt loop over any reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

pub type StdConsole = Console<io::StdinLock<'static>, io::Stdout>;

pub fn stdio() -> StdConsole {
    Console::new(io::stdin().lock(), io::stdout())
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    pub fn say_all<I, T>(&mut self, lines: I) -> io::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        for line in lines {
            self.say(line)?;
        }
        Ok(())
    }

    /// Show `message` and read one line without its line ending. Running
    /// out of input is an `UnexpectedEof` error.
    pub fn prompt_line(&mut self, message: &str) -> io::Result<String> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Ask until `parse` accepts the answer; rejections print the returned
    /// message and ask again.
    pub fn prompt_parsed<T, F>(&mut self, message: &str, mut parse: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Result<T, String>,
    {
        loop {
            let line = self.prompt_line(message)?;
            match parse(line.trim()) {
                Ok(value) => return Ok(value),
                Err(reason) => self.say(reason)?,
            }
        }
    }

    pub fn prompt_integer(&mut self, message: &str) -> io::Result<i64> {
        self.prompt_parsed(message, parse_integer)
    }

    pub fn prompt_float_list(&mut self, message: &str) -> io::Result<Vec<f64>> {
        self.prompt_parsed(message, parse_float_list)
    }
}

pub fn parse_integer(input: &str) -> Result<i64, String> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| "The input value is not an integer".to_string())
}

pub fn parse_float_list(input: &str) -> Result<Vec<f64>, String> {
    input
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| "one of the values is not a float".to_string())
}

/// Lets the person at the console pick the attacker's move. The turn
/// header is printed here, ahead of the move list, so callers showing the
/// battle log should leave out `Turn` events.
pub struct ConsoleSelector<'c, R, W> {
    console: &'c mut Console<R, W>,
}

impl<'c, R: BufRead, W: Write> ConsoleSelector<'c, R, W> {
    pub fn new(console: &'c mut Console<R, W>) -> Self {
        Self { console }
    }
}

impl<R: BufRead, W: Write> MoveSelector for ConsoleSelector<'_, R, W> {
    fn select_move(&mut self, ctx: &TurnContext<'_>) -> Result<usize, BattleError> {
        let header = BattleEvent::Turn {
            turn: ctx.turn,
            attacker: ctx.attacker.name().to_string(),
            attacker_hp: ctx.attacker.hit_points(),
            defender: ctx.defender.name().to_string(),
            defender_hp: ctx.defender.hit_points(),
            multiplier: ctx.multiplier,
        };
        self.console.say_all(ui::event_lines(&header))?;
        self.console.say_all(ui::move_lines(ctx.attacker))?;
        let slot = self
            .console
            .prompt_parsed("Please enter the move you want to use: ", |input| {
                let value = parse_integer(input)?;
                usize::try_from(value)
                    .ok()
                    .filter(|slot| ctx.available.contains(slot))
                    .ok_or_else(|| format!("{} does not have a move {value}", ctx.attacker.name()))
            })?;
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn integer_prompt_repeats_until_valid() {
        let mut c = console("abc\n4.5\n 12 \n");
        assert_eq!(c.prompt_integer("n: ").unwrap(), 12);
        let out = output(c);
        assert_eq!(out.matches("The input value is not an integer").count(), 2);
        assert_eq!(out.matches("n: ").count(), 3);
    }

    #[test]
    fn float_list_rejects_bad_entries() {
        let mut c = console("1, x, 2\n1.5, 2,0.25\n");
        assert_eq!(c.prompt_float_list("values: ").unwrap(), vec![1.5, 2.0, 0.25]);
        assert!(output(c).contains("one of the values is not a float"));
    }

    #[test]
    fn closed_input_is_unexpected_eof() {
        let mut c = console("");
        let err = c.prompt_line("name: ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn windows_line_endings_are_stripped() {
        let mut c = console("Pikachu\r\n");
        assert_eq!(c.prompt_line("name: ").unwrap(), "Pikachu");
    }
}
