use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{info, section, success, warning};
use crate::cli::registry::CommandEntry;
use crate::cli::render;
use crate::currency::{self, format_usd};
use crate::domain::Currency;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("login", "Access the wallet", "login", cmd_login)
            .with_aliases(&["connect"]),
        CommandEntry::new("send", "Start a new transfer", "send", cmd_send),
        CommandEntry::new("amount", "Set the transfer amount", "amount <value>", cmd_amount),
        CommandEntry::new(
            "to",
            "Set the recipient (username or phone number)",
            "to <recipient>",
            cmd_to,
        ),
        CommandEntry::new(
            "currency",
            "Choose the currency to send",
            "currency <USDC|cUSD>",
            cmd_currency,
        ),
        CommandEntry::new("review", "Review the transfer", "review", cmd_review),
        CommandEntry::new("sign", "Sign and send the reviewed transfer", "sign", cmd_sign)
            .with_aliases(&["hold"]),
        CommandEntry::new("done", "Return home after a transfer", "done", cmd_done),
        CommandEntry::new("cancel", "Abandon the transfer in progress", "cancel", cmd_cancel)
            .with_aliases(&["back"]),
        CommandEntry::new(
            "falcon",
            "Toggle Black Falcon mode",
            "falcon",
            cmd_falcon,
        ),
        CommandEntry::new(
            "rates",
            "Show local currency rates, optionally for an amount",
            "rates [usd amount]",
            cmd_rates,
        ),
        CommandEntry::new("disconnect", "End the session", "disconnect", cmd_disconnect)
            .with_aliases(&["logout"]),
    ]
}

fn cmd_login(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.mode == crate::cli::core::CliMode::Interactive {
        info("Authenticating...");
    }
    let user = context.runtime.block_on(context.session.authenticate())?;
    success(format!("Welcome, @{}.", user.username));
    render::screen(context);
    Ok(())
}

fn cmd_send(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.open_send()?;
    render::screen(context);
    Ok(())
}

fn cmd_amount(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let value = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: amount <value>".into()))?;
    context.session.set_amount(*value)?;
    if context.session.form().parsed_amount().is_none() {
        warning(format!("`{value}` is not a positive amount yet."));
    }
    render::screen(context);
    Ok(())
}

fn cmd_to(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments("usage: to <recipient>".into()));
    }
    context.session.set_recipient(args.join(" "))?;
    render::screen(context);
    Ok(())
}

fn cmd_currency(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: currency <USDC|cUSD>".into()))?;
    let currency = raw
        .parse::<Currency>()
        .map_err(CommandError::InvalidArguments)?;
    context.session.set_currency(currency)?;
    render::screen(context);
    Ok(())
}

fn cmd_review(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.submit_draft()?;
    render::screen(context);
    Ok(())
}

fn cmd_sign(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.mode == crate::cli::core::CliMode::Interactive {
        info("PROCESSING...");
    }
    let outcome = context.runtime.block_on(context.session.confirm());
    render::screen(context);
    outcome.map(|_| ()).map_err(CommandError::from)
}

fn cmd_done(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.acknowledge()?;
    render::screen(context);
    Ok(())
}

fn cmd_cancel(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.cancel()?;
    render::screen(context);
    Ok(())
}

fn cmd_falcon(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let enabled = context
        .runtime
        .block_on(context.session.toggle_black_falcon())?;
    success(format!(
        "Black Falcon mode {}.",
        if enabled { "enabled" } else { "disabled" }
    ));
    Ok(())
}

fn cmd_rates(_context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usd = args.first().map(|raw| parse_usd(raw)).transpose()?;
    section("Local rates");
    match usd {
        Some(amount) => {
            info(format!("{} is worth:", format_usd(amount)));
            for preview in currency::preview(Some(amount)) {
                info(format!("  {}", preview.label()));
            }
        }
        None => {
            for rate in currency::MOCK_RATES.iter() {
                info(format!("  {:<4} {:>10} per USD  ({})", rate.code, rate.rate, rate.symbol));
            }
        }
    }
    Ok(())
}

/// A finite, non-negative dollar amount.
fn parse_usd(raw: &str) -> Result<f64, CommandError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{raw}` is not an amount")))
}

fn cmd_disconnect(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.runtime.block_on(context.session.disconnect())?;
    info("Session ended.");
    render::screen(context);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_amounts_must_be_finite_and_non_negative() {
        assert_eq!(parse_usd(" 12.5 ").unwrap(), 12.5);
        assert_eq!(parse_usd("0").unwrap(), 0.0);
        for raw in ["inf", "NaN", "-4", "-inf", "ten"] {
            assert!(
                matches!(parse_usd(raw), Err(CommandError::InvalidArguments(_))),
                "{raw} should be rejected"
            );
        }
    }
}
