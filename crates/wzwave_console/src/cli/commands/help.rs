use crate::cli::command::{CommandContext, CommandDescriptor, CommandFuture, CommandTable};
use crate::error::CommandError;

pub fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new("help", "View command help.", "help [command]", |ctx, args| {
        Box::pin(execute(ctx, args)) as CommandFuture
    })
}

async fn execute(ctx: CommandContext, args: Vec<String>) -> Result<bool, CommandError> {
    match help_lines(&ctx.commands, &args) {
        Some(lines) => {
            ctx.out.lines(lines);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Lines printed for `help` with `args`, or `None` if the arguments are not
/// valid `help` syntax.
fn help_lines(commands: &CommandTable, args: &[String]) -> Option<Vec<String>> {
    match args {
        [] => {
            let mut lines = vec!["Commands:".to_string()];
            lines.extend(
                commands
                    .list_sorted()
                    .map(|(name, description)| format!("{} - {}", name, description)),
            );
            Some(lines)
        }
        [name] => {
            let command = commands.lookup(name)?;
            Some(vec![
                command.description().to_string(),
                String::new(),
                format!("Syntax: {}", command.syntax()),
            ])
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::get_all_commands;

    fn builtin_table() -> CommandTable {
        let mut table = CommandTable::new();
        for command in get_all_commands().into_iter().rev() {
            table.register(command).unwrap();
        }
        table
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_listing_is_sorted_with_header() {
        let lines = help_lines(&builtin_table(), &[]).unwrap();

        assert_eq!(
            lines,
            vec![
                "Commands:",
                "help - View command help.",
                "quit - Quits console.",
                "start - Start the network",
            ]
        );
    }

    #[test]
    fn test_single_command_help() {
        let lines = help_lines(&builtin_table(), &args(&["START"])).unwrap();

        assert_eq!(lines, vec!["Start the network", "", "Syntax: start"]);
    }

    #[test]
    fn test_unknown_command_is_bad_syntax() {
        assert!(help_lines(&builtin_table(), &args(&["unknown-cmd"])).is_none());
    }

    #[test]
    fn test_too_many_arguments_is_bad_syntax() {
        assert!(help_lines(&builtin_table(), &args(&["quit", "start"])).is_none());
    }
}
