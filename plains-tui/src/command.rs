#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tag(Option<String>), // /tag <label> | /tag
    Clear,               // /clear
    Reset,               // /reset
    Tags,                // /tags
    Help,                // /help
    Quit,                // /quit or /exit
    Unknown(String),
}

pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Command::Unknown(trimmed.to_string());
    }
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or_default();
    let rest = parts.next().map(str::trim).filter(|s| !s.is_empty());

    match (verb, rest) {
        ("/tag", label) => Command::Tag(label.map(str::to_string)),
        ("/clear", None) => Command::Clear,
        ("/reset", None) => Command::Reset,
        ("/tags", None) => Command::Tags,
        ("/help", _) => Command::Help,
        ("/quit" | "/exit", _) => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_keeps_inner_whitespace_and_case() {
        assert_eq!(
            parse_command("/tag   Cover Crops "),
            Command::Tag(Some("Cover Crops".into()))
        );
        assert_eq!(parse_command("/tag"), Command::Tag(None));
    }

    #[test]
    fn bare_verbs() {
        assert_eq!(parse_command("/clear"), Command::Clear);
        assert_eq!(parse_command(" /reset "), Command::Reset);
        assert_eq!(parse_command("/tags"), Command::Tags);
        assert_eq!(parse_command("/exit"), Command::Quit);
    }

    #[test]
    fn arguments_on_bare_verbs_are_rejected() {
        assert_eq!(
            parse_command("/clear Soil"),
            Command::Unknown("/clear Soil".into())
        );
    }

    #[test]
    fn unknown_and_plain_text() {
        assert_eq!(parse_command("/nope"), Command::Unknown("/nope".into()));
        assert_eq!(parse_command("yield"), Command::Unknown("yield".into()));
    }
}
