use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use intake_model::{
    AnalysisReport, FailureKind, NormalizedProvider, ReferenceKind, ReferenceTables,
    ServiceCategory, ValidationFailure,
};

use crate::types::RunSummary;

pub fn print_run_summary(summary: &RunSummary) {
    let outcome = &summary.outcome;
    let stats = &outcome.statistics;
    println!("Store: {}", summary.store.display());
    match &summary.spool_dir {
        Some(dir) => println!("Spool: {}", dir.display()),
        None => println!("Dry run: store not saved, batches not spooled"),
    }
    println!("Validation failures: {}", summary.failures_output.display());
    println!("Analysis report: {}", summary.analysis_output.display());

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Documents")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Total"), Cell::new(stats.total_documents)]);
    table.add_row(vec![
        Cell::new("Accepted"),
        count_cell(stats.accepted, Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Rejected"),
        count_cell(stats.rejected, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("  of which contradicted"),
        count_cell(stats.contradicted, Color::Magenta),
    ]);
    table.add_row(vec![
        Cell::new("With warnings"),
        count_cell(stats.soft_warned, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new(format!("Submitted ({} batches)", stats.batches)),
        count_cell(stats.submitted, Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Submission failed"),
        count_cell(stats.submission_failed, Color::Red),
    ]);
    println!("{table}");

    let hard: Vec<&ValidationFailure> = outcome.failures.iter().collect();
    if !hard.is_empty() {
        println!();
        println!("Failures:");
        print_failure_table(&hard);
    }
    println!();
    print_analysis_summary(&outcome.report);
}

pub fn print_analysis_summary(report: &AnalysisReport) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Analysis"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Providers"), Cell::new(report.provider_count)]);
    table.add_row(vec![Cell::new("Records"), Cell::new(report.record_count)]);
    table.add_row(vec![
        Cell::new("Re-submissions"),
        dim_or(report.resubmission_count(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Contradictions"),
        dim_or(report.contradictions.len(), Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Fuzzy duplicate candidates"),
        dim_or(report.fuzzy_candidates.len(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Inconsistencies"),
        dim_or(report.inconsistencies.len(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Completeness"),
        Cell::new(format!("{:.1}%", report.completeness.score * 100.0)),
    ]);
    println!("{table}");

    if report.fuzzy_candidates.is_empty() {
        return;
    }
    let mut pairs = Table::new();
    pairs.set_header(vec![
        header_cell("Score"),
        header_cell("Provider"),
        header_cell("Possible duplicate"),
        header_cell("Blocking keys"),
    ]);
    apply_table_style(&mut pairs);
    align_column(&mut pairs, 0, CellAlignment::Right);
    for candidate in &report.fuzzy_candidates {
        pairs.add_row(vec![
            Cell::new(format!("{:.3}", candidate.score)).fg(Color::Yellow),
            Cell::new(format!(
                "{} ({}, {})",
                candidate.left.provider_name, candidate.left.provider_id, candidate.left.state
            )),
            Cell::new(format!(
                "{} ({}, {})",
                candidate.right.provider_name, candidate.right.provider_id, candidate.right.state
            )),
            dim_cell(candidate.blocking_keys.join(", ")),
        ]);
    }
    println!();
    println!("Duplicate candidates (not merged):");
    println!("{pairs}");
}

pub fn print_provider_table(providers: &[&NormalizedProvider]) {
    if providers.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Name"),
        header_cell("Type"),
        header_cell("City"),
        header_cell("State"),
    ]);
    apply_table_style(&mut table);
    for provider in providers {
        table.add_row(vec![
            Cell::new(&provider.provider_id).fg(Color::Blue),
            Cell::new(&provider.provider_name).add_attribute(Attribute::Bold),
            Cell::new(provider.provider_type),
            Cell::new(&provider.address.city),
            Cell::new(&provider.address.state),
        ]);
    }
    println!("{table}");
}

pub fn print_provider_detail(provider: &NormalizedProvider, tables: &ReferenceTables) {
    let address = &provider.address;
    let contact = &provider.contact_info;
    let mut table = Table::new();
    apply_table_style(&mut table);
    let mut row = |label: &str, value: String| {
        table.add_row(vec![header_cell(label), Cell::new(value)]);
    };
    row("ID", provider.provider_id.to_string());
    row("Name", provider.provider_name.clone());
    row("Type", provider.provider_type.to_string());
    row(
        "Address",
        format!(
            "{}{}, {}, {} {}, {}",
            address.street1,
            address
                .street2
                .as_deref()
                .map(|s| format!(" {s}"))
                .unwrap_or_default(),
            address.city,
            address.state,
            address.zip_code,
            address.country
        ),
    );
    row("Phone", contact.phone_number.clone());
    if let Some(fax) = &contact.fax {
        row("Fax", fax.clone());
    }
    if let Some(email) = &contact.email {
        row("Email", email.clone());
    }
    if let Some(website) = &contact.website {
        row("Website", website.clone());
    }
    row(
        "Services",
        provider
            .services
            .iter()
            .map(ServiceCategory::as_str)
            .collect::<Vec<_>>()
            .join(", "),
    );
    for kind in ReferenceKind::ALL {
        let labels: Vec<String> = provider
            .reference_ids(kind)
            .iter()
            .map(|id| tables.label(id))
            .collect();
        if !labels.is_empty() {
            row(kind.table_name(), labels.join(", "));
        }
    }
    for accreditation in &provider.accreditations {
        row(
            "Accreditation",
            format!(
                "{} {} ({} to {}){}",
                accreditation.organization,
                accreditation.license_number,
                accreditation.issue_date,
                accreditation.expiration_date,
                if accreditation.expired { " EXPIRED" } else { "" }
            ),
        );
    }
    println!("{table}");
}

pub fn print_failure_table(failures: &[&ValidationFailure]) {
    if failures.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Provider"),
        header_cell("Kind"),
        header_cell("Field"),
        header_cell("Rule"),
        header_cell("Message"),
        header_cell("Source"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for failure in failures {
        let provider = match &failure.provider_name {
            Some(name) => format!("{} ({})", name, failure.subject),
            None => failure.subject.to_string(),
        };
        table.add_row(vec![
            Cell::new(provider),
            kind_cell(failure.kind),
            Cell::new(&failure.field),
            Cell::new(&failure.rule),
            Cell::new(&failure.message),
            failure
                .source
                .as_ref()
                .map_or_else(|| dim_cell("-"), dim_cell),
        ]);
    }
    println!("{table}");
}

fn kind_cell(kind: FailureKind) -> Cell {
    match kind {
        FailureKind::Schema | FailureKind::BusinessRule => Cell::new(kind.label())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        FailureKind::Contradiction => Cell::new(kind.label()).fg(Color::Magenta),
        FailureKind::SoftWarning => Cell::new(kind.label()).fg(Color::Yellow),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_or(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
