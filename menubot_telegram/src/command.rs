use menubot_dialog::Command;
use std::fmt::Write as _;
use teloxide::types::BotCommand;

/// Convert `(command, description)` pairs into Telegram menu entries.
#[must_use]
pub fn bot_commands(menu: &[(&str, &str)]) -> Vec<BotCommand> {
    menu.iter()
        .map(|(command, description)| BotCommand {
            command: (*command).to_string(),
            description: (*description).to_string(),
        })
        .collect()
}

/// Plain-text command list.
#[must_use]
pub fn help_text() -> String {
    let mut text = String::from("Команды:\n");
    for command in Command::ALL {
        let _ = writeln!(text, "/{} - {}", command.name(), command.description());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_becomes_bot_commands() {
        let commands = bot_commands(&Command::menu());

        assert_eq!(commands.len(), Command::ALL.len());
        assert_eq!(commands[0].command, "start");
        assert_eq!(commands[0].description, "Главное меню");
        assert_eq!(commands[5].command, "new_word");
    }

    #[test]
    fn help_lists_every_command() {
        let help = help_text();
        for command in Command::ALL {
            assert!(help.contains(&format!("/{}", command.name())));
        }
    }
}
