use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;
use crate::domain::TransactionKind;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "mode",
            "Switch the transaction form mode",
            "mode <deposit|withdraw|transfer>",
            cmd_mode,
        ),
        CommandEntry::new("amount", "Set the transaction amount", "amount <value>", cmd_amount),
        CommandEntry::new("to", "Set the transfer destination", "to <index|id>", cmd_to),
        CommandEntry::new("submit", "Submit the transaction form", "submit", cmd_submit),
        CommandEntry::new(
            "deposit",
            "Deposit into the selected account",
            "deposit <amount>",
            cmd_deposit,
        ),
        CommandEntry::new(
            "withdraw",
            "Withdraw from the selected account",
            "withdraw <amount>",
            cmd_withdraw,
        ),
        CommandEntry::new(
            "transfer",
            "Transfer from the selected account",
            "transfer <amount> <to>",
            cmd_transfer,
        ),
        CommandEntry::new("form", "Show the transaction form", "form", cmd_form),
    ]
}

fn cmd_mode(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(mode) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: mode <deposit|withdraw|transfer>".into(),
        ));
    };
    context.set_transaction_mode(mode)
}

fn cmd_amount(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.set_transaction_amount(args)
}

fn cmd_to(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.set_transfer_destination(args.first().copied())
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.submit_transaction()
}

fn cmd_deposit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.quick_transaction(TransactionKind::Deposit, args)
}

fn cmd_withdraw(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.quick_transaction(TransactionKind::Withdraw, args)
}

fn cmd_transfer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.quick_transaction(TransactionKind::Transfer, args)
}

fn cmd_form(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.show_form();
    Ok(())
}
