use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;
use crate::cli::render;
use crate::core::NavTarget;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("home", "Open the home screen", "home", cmd_home),
        CommandEntry::new("forest", "Open your forest", "forest", cmd_forest),
        CommandEntry::new("map", "Open the forest map", "map", cmd_map),
        CommandEntry::new("settings", "Open your identity settings", "settings", cmd_settings)
            .with_aliases(&["me"]),
        CommandEntry::new(
            "go",
            "Navigate to a screen",
            "go <home|forest|map|settings>",
            cmd_go,
        ),
    ]
}

fn navigate(context: &mut ShellContext, target: NavTarget) -> CommandResult {
    context.runtime.block_on(context.session.navigate(target))?;
    render::screen(context);
    Ok(())
}

fn cmd_home(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    navigate(context, NavTarget::Home)
}

fn cmd_forest(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    navigate(context, NavTarget::Forest)
}

fn cmd_map(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    navigate(context, NavTarget::Map)
}

fn cmd_settings(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    navigate(context, NavTarget::Settings)
}

fn cmd_go(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: go <screen>".into()))?;
    let target = NavTarget::parse(raw)
        .ok_or_else(|| CommandError::InvalidArguments(format!("unknown screen `{raw}`")))?;
    navigate(context, target)
}
