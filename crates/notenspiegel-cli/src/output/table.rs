use notenspiegel_core::model::{Catalog, GradeSummary, LoadedCohort};

pub fn print_catalog(catalog: &Catalog) {
    if catalog.is_empty() {
        println!("No cohorts published.");
        return;
    }

    let max_title = catalog.iter().map(|(t, _)| t.len()).max().unwrap_or(0);
    for (title, location) in catalog.iter() {
        println!("  {:<width$}  {}", title, location, width = max_title);
    }
    println!("\n{} cohort(s)", catalog.len());
}

pub fn print_cohorts(cohorts: &[LoadedCohort]) {
    for (i, cohort) in cohorts.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_cohort(cohort);
    }

    if cohorts.len() > 1 {
        println!();
        print_comparison(cohorts);
    }
}

fn print_cohort(cohort: &LoadedCohort) {
    println!("=== {} ===\n", cohort.cohort);
    println!("  Source: {}\n", cohort.location);
    println!(
        "  {:>5}  {:>7}  {:>8}  {:>10}",
        "Note", "Anzahl", "Prozent", "Kumuliert"
    );
    println!("  {}", "-".repeat(36));
    for row in &cohort.table.rows {
        println!(
            "  {:>5}  {:>7}  {:>8}  {:>10}",
            row.note.to_string(),
            row.anzahl,
            row.prozent.to_string(),
            row.kumuliert.to_string()
        );
    }
    println!();
    println!("  {}", format_summary(&cohort.table.summary()));
}

fn print_comparison(cohorts: &[LoadedCohort]) {
    println!("=== Comparison ===\n");
    let max_name = cohorts
        .iter()
        .map(|c| c.cohort.as_str().len())
        .max()
        .unwrap_or(0)
        .max("Cohort".len());

    println!(
        "  {:<width$}  {:>9}  {:>6}  {:>9}",
        "Cohort",
        "Graduates",
        "Mean",
        "Std. dev.",
        width = max_name
    );
    for cohort in cohorts {
        let s = cohort.table.summary();
        println!(
            "  {:<width$}  {:>9}  {:>6}  {:>9}",
            cohort.cohort.as_str(),
            s.graduates,
            fmt_stat(s.mean),
            fmt_stat(s.std_dev),
            width = max_name
        );
    }
}

fn format_summary(summary: &GradeSummary) -> String {
    format!(
        "Graduates: {}  Mean: {}  Std. dev.: {}",
        summary.graduates,
        fmt_stat(summary.mean),
        fmt_stat(summary.std_dev)
    )
}

fn fmt_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}
