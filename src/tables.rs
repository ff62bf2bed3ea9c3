use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    billing::{BillingPeriodStats, BillingReport},
    dashboard::Dashboard,
    db::{Battery, Generator},
    quantity::cost::Cost,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn savings_color(savings: Cost) -> Color {
    if savings >= Cost::ZERO { Color::Green } else { Color::Red }
}

#[must_use]
pub fn build_report_table(report: &BillingReport) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Start",
        "End",
        "Consumed",
        "Generated",
        "Bought",
        "Sold",
        "Total cost",
        "Actual cost",
        "Sold price",
        "Generation savings",
        "Total savings",
    ]);
    for stats in &report.periods {
        table.add_row(vec![
            Cell::new(stats.period.start_date()),
            Cell::new(stats.period.end_date()).add_attribute(Attribute::Dim),
            Cell::new(stats.total_consumption).set_alignment(CellAlignment::Right),
            Cell::new(stats.total_generation).set_alignment(CellAlignment::Right),
            Cell::new(stats.total_bought).set_alignment(CellAlignment::Right),
            Cell::new(stats.total_sold).set_alignment(CellAlignment::Right),
            Cell::new(stats.total_cost).set_alignment(CellAlignment::Right),
            Cell::new(stats.actual_cost).set_alignment(CellAlignment::Right),
            Cell::new(stats.sold_price).set_alignment(CellAlignment::Right),
            Cell::new(stats.generation_savings)
                .set_alignment(CellAlignment::Right)
                .fg(savings_color(stats.generation_savings)),
            Cell::new(stats.total_savings)
                .set_alignment(CellAlignment::Right)
                .fg(savings_color(stats.total_savings))
                .add_attribute(Attribute::Bold),
        ]);
    }
    table.add_row(vec![
        Cell::new("Lifetime").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(report.lifetime_savings)
            .set_alignment(CellAlignment::Right)
            .fg(savings_color(report.lifetime_savings))
            .add_attribute(Attribute::Bold),
    ]);
    table
}

/// Unrounded daily energy of a single period.
#[must_use]
pub fn build_daily_table(stats: &BillingPeriodStats) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Generated", "Consumed", "Bought", "Sold"]);
    for (date, day) in &stats.daily_data {
        table.add_row(vec![
            Cell::new(date.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(day.generation).set_alignment(CellAlignment::Right),
            Cell::new(day.consumption).set_alignment(CellAlignment::Right),
            Cell::new(day.bought).set_alignment(CellAlignment::Right),
            Cell::new(day.sold).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[must_use]
pub fn build_dashboard_table(dashboard: &Dashboard) -> Table {
    let mut table = new_table();
    table.set_header(vec!["", "Yesterday", "Today"]);
    table.add_row(vec![
        Cell::new("Generated"),
        Cell::new(dashboard.generation.yesterday).set_alignment(CellAlignment::Right),
        Cell::new(dashboard.generation.today).set_alignment(CellAlignment::Right).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Consumed"),
        Cell::new(dashboard.consumption.yesterday).set_alignment(CellAlignment::Right),
        Cell::new(dashboard.consumption.today).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Bought"),
        Cell::new(""),
        Cell::new(dashboard.bought).set_alignment(CellAlignment::Right).fg(Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Sold"),
        Cell::new(format!("at {}", dashboard.sold.feed_in_tariff)).add_attribute(Attribute::Dim),
        Cell::new(format!("{} for {}", dashboard.sold.kwh, dashboard.sold.price))
            .set_alignment(CellAlignment::Right)
            .fg(Color::Green),
    ]);
    for battery in &dashboard.batteries {
        table.add_row(vec![
            Cell::new(format!("Battery `{}`", battery.name)),
            Cell::new(battery.capacity).add_attribute(Attribute::Dim),
            Cell::new(battery.charge).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("All time"),
        Cell::new(""),
        Cell::new(dashboard.all_time_generation).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("…or cups of coffee"),
        Cell::new(""),
        Cell::new(dashboard.factoids.coffee_cups).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("…or km in a Tesla"),
        Cell::new(""),
        Cell::new(dashboard.factoids.tesla_km).set_alignment(CellAlignment::Right),
    ]);
    table
}

#[must_use]
pub fn build_hardware_table(generators: &[Generator], batteries: &[Battery]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Kind", "Name", "Capacity"]);
    for generator in generators {
        table.add_row(vec![
            Cell::new("generator").add_attribute(Attribute::Dim),
            Cell::new(&generator.name),
            Cell::new(""),
        ]);
    }
    for battery in batteries {
        table.add_row(vec![
            Cell::new("battery").add_attribute(Attribute::Dim),
            Cell::new(&battery.name),
            Cell::new(battery.capacity).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
