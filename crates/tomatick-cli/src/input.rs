//! Parsing of commands typed during an interactive session.

use tomatick_core::Phase;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Toggle,
    Reset,
    Mode(Phase),
    Add(String),
    /// Toggle the task at a 1-based position.
    Done(usize),
    /// Delete the task at a 1-based position.
    Remove(usize),
    Clear,
    Tasks,
    Status,
    Settings,
    Set { key: String, value: String },
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  start | s              start or resume the countdown
  pause | p              pause the countdown
  toggle | t             start when stopped, pause when running
  reset | r              restore the full length of the current phase
  mode <pomodoro|short|long>
                         switch phase (drops the countdown in progress)
  add <text>             add a task
  done <n>               toggle task n
  rm <n>                 delete task n
  clear                  delete completed tasks
  tasks                  show the task list
  status                 show the timer
  settings               show the current settings
  set <key> <value>      change a setting, e.g. set timer.pomodoro 30
  help                   show this help
  quit | q               leave";

/// Parse one line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "start" | "s" | "resume" => Command::Start,
        "pause" | "p" => Command::Pause,
        "toggle" | "t" => Command::Toggle,
        "reset" | "r" => Command::Reset,
        "mode" | "m" => {
            let phase = rest.parse::<Phase>().map_err(|e| e.to_string())?;
            Command::Mode(phase)
        }
        "add" | "a" => {
            if rest.is_empty() {
                return Err("usage: add <text>".into());
            }
            Command::Add(rest.to_string())
        }
        "done" | "d" => Command::Done(position(rest, "done")?),
        "rm" | "del" | "delete" => Command::Remove(position(rest, "rm")?),
        "clear" => Command::Clear,
        "tasks" | "ls" => Command::Tasks,
        "status" | "st" => Command::Status,
        "settings" | "config" => Command::Settings,
        "set" => {
            let (key, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: set <key> <value>".to_string())?;
            Command::Set {
                key: key.to_string(),
                value: value.trim().to_string(),
            }
        }
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}' (type 'help')")),
    };
    Ok(Some(command))
}

fn position(arg: &str, command: &str) -> Result<usize, String> {
    arg.parse::<usize>()
        .map_err(|_| format!("usage: {command} <n> (task number from 'tasks')"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn parses_timer_commands_and_aliases() {
        assert_eq!(parse("start"), Ok(Some(Command::Start)));
        assert_eq!(parse("S"), Ok(Some(Command::Start)));
        assert_eq!(parse("p"), Ok(Some(Command::Pause)));
        assert_eq!(parse(" reset "), Ok(Some(Command::Reset)));
        assert_eq!(parse("mode long"), Ok(Some(Command::Mode(Phase::LongBreak))));
        assert_eq!(parse("mode pomodoro"), Ok(Some(Command::Mode(Phase::Work))));
    }

    #[test]
    fn add_keeps_inner_spacing() {
        assert_eq!(
            parse("add  call the  bank "),
            Ok(Some(Command::Add("call the  bank".into())))
        );
        assert!(parse("add").is_err());
    }

    #[test]
    fn task_positions_must_be_numbers() {
        assert_eq!(parse("done 2"), Ok(Some(Command::Done(2))));
        assert_eq!(parse("rm 1"), Ok(Some(Command::Remove(1))));
        assert!(parse("done two").is_err());
    }

    #[test]
    fn set_takes_key_and_value() {
        assert_eq!(
            parse("set timer.pomodoro 30"),
            Ok(Some(Command::Set {
                key: "timer.pomodoro".into(),
                value: "30".into(),
            }))
        );
        assert!(parse("set timer.pomodoro").is_err());
    }

    #[test]
    fn unknown_commands_are_errors() {
        assert!(parse("launch").is_err());
        assert!(parse("mode lunch").is_err());
    }
}
