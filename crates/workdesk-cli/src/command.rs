//! Console command grammar.

/// One parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `login <email>`; the password is prompted for separately.
    Login { email: String },
    /// `logout`
    Logout,
    /// `menu`: the capability's navigation tree.
    Menu,
    /// `open <path>`: navigate to a screen through the guard.
    Open { path: String },
    /// `notifications`: the session's notification list.
    Notifications,
    /// `read <id>`: mark one notification read.
    Read { id: i64 },
    /// `whoami`
    Whoami,
    /// `help`
    Help,
    /// `quit` / `exit`
    Quit,
}

impl Command {
    /// Parses one input line.
    ///
    /// Returns `Ok(None)` for blank lines and `Err` with a usage
    /// message for anything malformed.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match (head, rest.as_slice()) {
            ("login", [email]) => Self::Login {
                email: (*email).to_string(),
            },
            ("login", _) => return Err("usage: login <email>".into()),
            ("logout", []) => Self::Logout,
            ("menu", []) => Self::Menu,
            ("open", [path]) => Self::Open {
                path: (*path).to_string(),
            },
            ("open", _) => return Err("usage: open <path>".into()),
            ("notifications", []) => Self::Notifications,
            ("read", [id]) => {
                let id = id
                    .parse()
                    .map_err(|_| format!("'{id}' is not a notification id"))?;
                Self::Read { id }
            }
            ("read", _) => return Err("usage: read <id>".into()),
            ("whoami", []) => Self::Whoami,
            ("help", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            (other, _) => return Err(format!("unknown command '{other}' (try 'help')")),
        };
        Ok(Some(command))
    }
}

/// Usage text for `help`.
pub const HELP: &str = "\
commands:
  login <email>     authenticate (prompts for the password)
  logout            end the session
  menu              show the navigation menu for your role
  open <path>       open a screen, e.g. open /status-projects
  notifications     list notifications
  read <id>         mark a notification as read
  whoami            show the current session
  quit              leave the console";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_parse_to_nothing() {
        assert_eq!(Command::parse("").expect("ok"), None);
        assert_eq!(Command::parse("   ").expect("ok"), None);
    }

    #[test]
    fn commands_with_arguments_parse() {
        assert_eq!(
            Command::parse("login adi@example.test").expect("ok"),
            Some(Command::Login {
                email: "adi@example.test".into()
            })
        );
        assert_eq!(
            Command::parse("open /phc").expect("ok"),
            Some(Command::Open { path: "/phc".into() })
        );
        assert_eq!(
            Command::parse("read 31").expect("ok"),
            Some(Command::Read { id: 31 })
        );
    }

    #[test]
    fn bare_commands_parse() {
        for (line, expected) in [
            ("logout", Command::Logout),
            ("menu", Command::Menu),
            ("notifications", Command::Notifications),
            ("whoami", Command::Whoami),
            ("help", Command::Help),
            ("quit", Command::Quit),
            ("exit", Command::Quit),
        ] {
            assert_eq!(Command::parse(line).expect("ok"), Some(expected), "{line}");
        }
    }

    #[test]
    fn malformed_input_reports_usage() {
        assert!(Command::parse("login").is_err());
        assert!(Command::parse("read not-a-number").is_err());
        assert!(Command::parse("teleport /phc").is_err());
    }
}
