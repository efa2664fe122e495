use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "list",
            "Show accounts (interactive: pick one to select)",
            "list",
            cmd_list,
        ),
        CommandEntry::new("refresh", "Reload accounts from the server", "refresh", cmd_refresh),
        CommandEntry::new(
            "select",
            "Select the account transactions apply to",
            "select <index|id>",
            cmd_select,
        ),
        CommandEntry::new(
            "create",
            "Open a new account",
            "create [owner] [initial_deposit]",
            cmd_create,
        ),
    ]
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.list_accounts()
}

fn cmd_refresh(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.refresh_accounts()
}

fn cmd_select(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.select_account(args.first().copied())
}

fn cmd_create(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.create_account(args)
}
