//! User actions typed on stdin

/// One parsed user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fill the name field
    SetName(String),
    /// Fill the roll number field
    SetRollNo(String),
    /// Submit the form as filled
    Submit,
    /// Fill both fields and submit
    Register { roll_no: String, name: String },
    /// Close the registration panel
    Cancel,
    /// Speak the recognized name
    Speak,
    /// Print the whole UI
    Status,
    Help,
    Quit,
}

/// Why a line was not understood
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command {0:?}, type 'help'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
commands:
  speak                      announce the recognized name
  name <text>                fill the registration name
  roll <text>                fill the registration roll number
  submit                     submit the registration form
  register <roll_no> <name>  fill both fields and submit
  cancel                     close the registration panel
  status                     print the current view
  quit                       exit";

/// Parse one line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<Result<Command, CommandError>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "speak" | "s" => Ok(Command::Speak),
        "name" if !rest.is_empty() => Ok(Command::SetName(rest.to_string())),
        "name" => Err(CommandError::Usage("name <text>")),
        "roll" if !rest.is_empty() => Ok(Command::SetRollNo(rest.to_string())),
        "roll" => Err(CommandError::Usage("roll <text>")),
        "submit" => Ok(Command::Submit),
        "register" => match rest.split_once(char::is_whitespace) {
            Some((roll_no, name)) if !name.trim().is_empty() => Ok(Command::Register {
                roll_no: roll_no.to_string(),
                name: name.trim().to_string(),
            }),
            _ => Err(CommandError::Usage("register <roll_no> <name>")),
        },
        "cancel" => Ok(Command::Cancel),
        "status" => Ok(Command::Status),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(word.to_string())),
    };
    Some(command)
}
