//! Text rendering of each screen.

use chrono::Local;
use colored::Colorize;

use crate::cli::core::ShellContext;
use crate::cli::output::{field, info, section, success, warning};
use crate::core::ViewState;
use crate::currency::{self, format_grouped, format_usd};
use crate::domain::{seed::FOREST_LOCATIONS, Displayable, Transaction};
use crate::narrative::{NarrativeKind, NarrativeUpdate};

/// Prints the current screen.
pub fn screen(context: &mut ShellContext) {
    context.session.poll_updates();
    match context.session.view() {
        ViewState::Onboarding => onboarding(),
        ViewState::Home => home(context),
        ViewState::Send => send(context),
        ViewState::Confirm => confirm(context),
        ViewState::Success => success_screen(context),
        ViewState::Forest => forest(context),
        ViewState::Map => map(),
        ViewState::Settings => settings(context),
    }
}

/// Prints narrative results that arrived since the last poll.
pub fn announce_updates(context: &mut ShellContext) {
    for update in context.session.poll_updates() {
        announce(context, &update);
    }
}

fn announce(context: &ShellContext, update: &NarrativeUpdate) {
    let visible = match update.kind {
        NarrativeKind::ForestSummary => context.session.view() == ViewState::Forest,
        NarrativeKind::Impact => context.session.view() == ViewState::Success,
    };
    if visible {
        info(format!("  \"{}\"", update.text).italic());
    }
}

fn onboarding() {
    section("Heru Trade");
    info("SOVEREIGN AFRICAN MONEY");
    info("Type `login` to access your wallet.");
}

fn home(context: &ShellContext) {
    let summary = context.block_on(context.session.home_summary());
    section("Home");
    field("Total balance", format_usd(summary.total_balance).bold());
    info("Recent transmissions:");
    if summary.recent.is_empty() {
        info("  (none yet)");
    }
    for tx in &summary.recent {
        transaction_line(tx);
    }
    info("Type `send` to start a transfer.");
}

fn transaction_line(tx: &Transaction) {
    info(format!(
        "  {:<22} {}  -{} {}  {}",
        tx.recipient,
        tx.timestamp.with_timezone(&Local).format("%Y-%m-%d"),
        format_grouped(tx.amount, 2),
        tx.currency,
        tx.tree_species.green(),
    ));
}

fn send(context: &ShellContext) {
    let form = context.session.form();
    section("Initiate transfer");
    field("Amount", blank_or(&form.amount));
    field("Recipient", blank_or(&form.recipient));
    field("Currency", form.currency);
    info("Local value:");
    for preview in currency::preview(form.parsed_amount()) {
        info(format!("  {}", preview.label()));
    }
    if context.session.can_submit() {
        info("Type `review` to check the transfer.");
    } else {
        warning("Enter an amount and a recipient to review.");
    }
}

fn blank_or(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn confirm(context: &ShellContext) {
    section("Confirm sacred transfer");
    if let Some(draft) = context.session.pending() {
        field("Sending", format!("{} {}", format_usd(draft.amount), draft.currency));
        field("To", &draft.recipient);
    }
    field("Network cost", "FREE (Subsidy Active)");
    field("Eco-impact", "+1 Tree");
    if let Some(err) = context.session.last_error() {
        crate::cli::output::error(err);
    }
    if context.session.is_busy() {
        info("PROCESSING...");
    } else {
        info("HOLD TO SIGN: type `sign` to authorize or `cancel` to go back.");
    }
}

fn success_screen(context: &ShellContext) {
    section("Transfer complete");
    let Some(tx) = context.session.last_success() else {
        return;
    };
    success(format!("Sent {} {} to {}", format_grouped(tx.amount, 2), tx.currency, tx.recipient));
    field("Receipt", tx.display_label());
    field("Tree", &tx.tree_species);
    field("Location", format!("{:.4}, {:.4}", tx.tree_coords.lat, tx.tree_coords.lng));
    field("Offset", format!("{} kg CO2", format_grouped(tx.carbon_offset_kg, 0)));
    field("Image", &tx.image_url);
    match context.session.impact_note() {
        Some(note) => info(format!("  \"{note}\"").italic()),
        None => info("  Impact data pending..."),
    }
    info("Type `done` to return home.");
}

fn forest(context: &ShellContext) {
    let summary = context.block_on(context.session.forest_summary());
    section("My forest");
    info(format!(
        "{} TREES PLANTED \u{2022} {}KG CO2 SEQUESTERED",
        summary.trees_planted,
        format_grouped(summary.co2_sequestered_kg, 0)
    ));
    info(format!("  \"{}\"", context.session.forest_story()).italic());
    for tx in &summary.trees {
        info(format!(
            "  {:<20} {}",
            tx.tree_species.green(),
            tx.timestamp.with_timezone(&Local).format("%Y-%m-%d")
        ));
    }
}

fn map() {
    section("Forest map");
    for location in FOREST_LOCATIONS.iter() {
        info(format!(
            "  #{} {:<20} {:>9.4}, {:>9.4}",
            location.id, location.name, location.coords.lat, location.coords.lng
        ));
    }
}

fn settings(context: &ShellContext) {
    section("Identity");
    if let Some(user) = context.block_on(context.session.user()) {
        field("User", user.display_label());
        field(
            "Black Falcon",
            if user.is_black_falcon_mode { "on" } else { "off" },
        );
    }
    info("Type `falcon` to toggle Black Falcon mode or `disconnect` to end the session.");
}
