use crate::cli::OutputFormat;
use crate::commands::Report;
use crate::error::CliError;

pub fn render(report: &Report, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(report)?
            } else {
                serde_json::to_string(report)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => print!("{}", render_table(report)),
    }

    Ok(())
}

fn render_table(report: &Report) -> String {
    let mut out = String::new();
    for (index, series) in report.series.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "{} ({}) {} - {}\n",
            series.caption, series.indicator, series.start, series.end
        ));
        out.push_str(&format!("{:<12}{:>16}\n", "Date", "Rate"));
        if series.rows.is_empty() {
            out.push_str("  (no data)\n");
        }
        for row in &series.rows {
            out.push_str(&format!("{:<12}{:>16}\n", row.date, row.rate));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use tipocambio_core::RateRow;

    use super::*;
    use crate::commands::SeriesReport;

    fn report(rows: Vec<RateRow>) -> Report {
        Report {
            series: vec![SeriesReport {
                indicator: 317,
                caption: String::from("Buying rate"),
                start: String::from("05/01/2024"),
                end: String::from("15/01/2024"),
                rows,
            }],
        }
    }

    #[test]
    fn table_lists_one_line_per_row() {
        let table = render_table(&report(vec![RateRow {
            date: String::from("05/01/2024"),
            rate: String::from("₡513.64"),
        }]));

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Buying rate (317) 05/01/2024 - 15/01/2024");
        assert!(lines[1].starts_with("Date"));
        assert!(lines[2].starts_with("05/01/2024"));
        assert!(lines[2].ends_with("₡513.64"));
    }

    #[test]
    fn table_marks_empty_series() {
        let table = render_table(&report(Vec::new()));
        assert!(table.contains("(no data)"));
    }
}
