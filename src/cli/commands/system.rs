use std::time::Duration;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output::{field, info, section};
use crate::cli::render;
use crate::cli::registry::CommandEntry;
use crate::utils::build_info;

const DEFAULT_WAIT_MS: u64 = 500;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "status",
            "Show the current screen",
            "status",
            cmd_status,
        )
        .with_aliases(&["show"]),
        CommandEntry::new(
            "wait",
            "Let background tasks run, then show any results",
            "wait [milliseconds]",
            cmd_wait,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit).with_aliases(&["quit"]),
    ]
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    render::screen(context);
    Ok(())
}

fn cmd_wait(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let millis = match args.first() {
        Some(raw) => raw.parse::<u64>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{raw}` is not a number of milliseconds"))
        })?,
        None => DEFAULT_WAIT_MS,
    };
    context.block_on(tokio::time::sleep(Duration::from_millis(millis)));
    render::announce_updates(context);
    Ok(())
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    section(format!("Heru Core {}", meta.version));
    field("Build hash", format!("{} ({})", meta.git_hash, meta.git_status));
    field("Built at", meta.timestamp);
    field("Target", meta.target);
    field("Profile", meta.profile);
    field("Rustc", meta.rustc);
    field(
        "Narrative",
        if context.session.narrator().is_online() {
            context.config.narrative.model.as_str()
        } else {
            "offline"
        },
    );
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.registry.get(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        }
        return Ok(());
    }
    help::print_overview(&context.registry);
    info("Commands act on the current screen; `status` shows where you are.");
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
