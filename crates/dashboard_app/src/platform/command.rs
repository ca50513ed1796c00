use dashboard_core::Msg;

pub const USAGE: &str = "\
usage: news_dashboard <command>

commands:
  analyze                    start a news analysis and follow its progress
  recipients                 list email recipients
  add-recipient <email>      add a recipient
  remove-recipient <email>   remove a custom recipient
  send-email                 send the latest report to all recipients
  report                     show the latest report url
  activity                   show the recent activity log
  help                       show this message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Analyze,
    Recipients,
    AddRecipient(String),
    RemoveRecipient(String),
    SendEmail,
    Report,
    Activity,
    Help,
}

impl Command {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut args = args.into_iter();
        let Some(name) = args.next() else {
            return Ok(Command::Help);
        };

        let command = match name.as_str() {
            "analyze" => Command::Analyze,
            "recipients" => Command::Recipients,
            "add-recipient" => Command::AddRecipient(required_email(&name, args.next())?),
            "remove-recipient" => Command::RemoveRecipient(required_email(&name, args.next())?),
            "send-email" => Command::SendEmail,
            "report" => Command::Report,
            "activity" => Command::Activity,
            "help" | "-h" | "--help" => Command::Help,
            other => return Err(format!("unknown command '{other}'")),
        };

        if let Some(extra) = args.next() {
            return Err(format!("unexpected argument '{extra}'"));
        }
        Ok(command)
    }

    /// Messages that kick off the command once the event loop is running.
    pub fn initial_msgs(&self) -> Vec<Msg> {
        match self {
            Command::Analyze => vec![Msg::StartClicked],
            Command::Recipients => vec![Msg::RecipientsRequested],
            Command::AddRecipient(email) => vec![Msg::AddRecipientSubmitted(email.clone())],
            Command::RemoveRecipient(_) => vec![Msg::RecipientsRequested],
            Command::SendEmail => vec![Msg::SendEmailClicked],
            Command::Report => vec![Msg::ViewResultsClicked],
            Command::Activity | Command::Help => Vec::new(),
        }
    }

    /// Message to dispatch once the recipient list has been answered, so the
    /// default-recipient guard sees the loaded list.
    pub fn after_recipients_load(&self) -> Option<Msg> {
        match self {
            Command::RemoveRecipient(email) => Some(Msg::RemoveRecipientClicked(email.clone())),
            _ => None,
        }
    }
}

fn required_email(command: &str, arg: Option<String>) -> Result<String, String> {
    arg.ok_or_else(|| format!("'{command}' needs an email address"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        Command::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse(&[]), Ok(Command::Help));
        assert_eq!(parse(&["analyze"]), Ok(Command::Analyze));
        assert_eq!(
            parse(&["add-recipient", "new@example.com"]),
            Ok(Command::AddRecipient("new@example.com".to_string()))
        );
        assert!(parse(&["remove-recipient"]).is_err());
        assert!(parse(&["analyze", "now"]).is_err());
        assert!(parse(&["explode"]).is_err());
    }

    #[test]
    fn analyze_starts_with_start_click() {
        assert_eq!(Command::Analyze.initial_msgs(), vec![Msg::StartClicked]);
        assert!(Command::Activity.initial_msgs().is_empty());
    }

    #[test]
    fn remove_waits_for_recipient_list() {
        let command = Command::RemoveRecipient("desk@example.com".to_string());
        assert_eq!(command.initial_msgs(), vec![Msg::RecipientsRequested]);
        assert_eq!(
            command.after_recipients_load(),
            Some(Msg::RemoveRecipientClicked("desk@example.com".to_string()))
        );
        assert_eq!(Command::Recipients.after_recipients_load(), None);
    }

    #[test]
    fn default_guard_fires_after_list_load() {
        use dashboard_core::{update, AppState, Effect};

        let command = Command::RemoveRecipient("desk@example.com".to_string());
        let mut state = AppState::new();
        for msg in command.initial_msgs() {
            state = update(state, msg).0;
        }
        let (state, _) = update(
            state,
            Msg::RecipientsLoaded {
                recipients: vec!["desk@example.com".to_string(), "x@example.com".to_string()],
                default_count: Some(1),
            },
        );

        let deferred = command.after_recipients_load().unwrap();
        let (state, effects) = update(state, deferred);
        assert!(matches!(effects.as_slice(), [Effect::Notify(_)]));
        assert!(state.view().is_settled());
    }
}
