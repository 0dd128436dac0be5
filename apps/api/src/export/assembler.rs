use anyhow::{anyhow, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern, Workbook};

use crate::export::formatter::{
    format_certifications, format_education, format_projects, format_skills, join_list,
};
use crate::profiles::models::Profile;
use crate::skills::catalog::SkillCatalog;

/// Column order shared by the CSV and spreadsheet exports.
pub const EXPORT_COLUMNS: [&str; 23] = [
    "HM ID",
    "Name",
    "Competency",
    "Joining Date",
    "Total Exp (Y)",
    "Total Exp (M)",
    "Relevant Exp (Y)",
    "Relevant Exp (M)",
    "Location Type",
    "Customer Name",
    "Customer Address",
    "Office City",
    "Primary Role",
    "Industries",
    "Education",
    "Skills (Detailed)",
    "Certifications (Detailed)",
    "Projects (Detailed)",
    "Has Profile Pic",
    "Approved",
    "Approved At",
    "Created At",
    "Updated At",
];

pub const SHEET_NAME: &str = "Profiles";
const HEADER_FILL: u32 = 0x1F6E3C;
const MAX_COLUMN_WIDTH: usize = 50;
const COLUMN_PADDING: usize = 4;
const MAX_CELL_CHARS: usize = 32_767;

/// One profile flattened to display strings, in `EXPORT_COLUMNS` order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    cells: Vec<String>,
}

impl ReportRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        EXPORT_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|i| self.cells[i].as_str())
    }

    /// `(column, value)` pairs in `EXPORT_COLUMNS` order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        EXPORT_COLUMNS
            .iter()
            .copied()
            .zip(self.cells.iter().map(String::as_str))
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn yes_no(flag: bool) -> String {
    let label = if flag { "Yes" } else { "No" };
    label.to_string()
}

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

pub fn format_profile_for_export(catalog: &SkillCatalog, profile: &Profile) -> ReportRow {
    ReportRow {
        cells: vec![
            profile.hm_id.clone(),
            profile.name.clone(),
            text(&profile.competency),
            text(&profile.joining_date),
            number(profile.total_exp_years),
            number(profile.total_exp_months),
            number(profile.relevant_exp_years),
            number(profile.relevant_exp_months),
            text(&profile.reporting_location_type),
            text(&profile.customer_name),
            text(&profile.customer_address),
            text(&profile.office_city),
            text(&profile.primary_role),
            join_list(&profile.industries),
            format_education(&profile.education),
            format_skills(catalog, &profile.skills),
            format_certifications(&profile.certifications),
            format_projects(&profile.projects),
            yes_no(profile.has_profile_pic()),
            yes_no(profile.approved),
            timestamp(profile.approved_at),
            timestamp(Some(profile.created_at)),
            timestamp(Some(profile.updated_at)),
        ],
    }
}

/// One row per profile, in the order given.
pub fn build_report(catalog: &SkillCatalog, profiles: &[Profile]) -> Vec<ReportRow> {
    profiles
        .iter()
        .map(|p| format_profile_for_export(catalog, p))
        .collect()
}

/// UTF-8, comma-delimited, header row first.
pub fn write_csv(rows: &[ReportRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_COLUMNS)?;
    for row in rows {
        writer.write_record(row.iter().map(|(_, value)| value))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV export: {}", e.error()))
}

/// Widest cell (header included) plus padding, capped at `MAX_COLUMN_WIDTH`.
pub fn column_widths(rows: &[ReportRow]) -> Vec<f64> {
    EXPORT_COLUMNS
        .iter()
        .map(|header| {
            let longest = rows
                .iter()
                .map(|r| r.get(header).unwrap_or_default().chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or_default();
            (longest + COLUMN_PADDING).min(MAX_COLUMN_WIDTH) as f64
        })
        .collect()
}

fn clip(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

/// Single "Profiles" sheet with a bold white-on-green header row.
pub fn write_xlsx(rows: &[ReportRow]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_pattern(FormatPattern::Solid)
        .set_align(FormatAlign::Center);

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, header) in EXPORT_COLUMNS.iter().enumerate() {
            sheet.write_string_with_format(0, u16::try_from(col)?, *header, &header_format)?;
        }
        for (r, row) in rows.iter().enumerate() {
            let row_num = u32::try_from(r + 1)?;
            for (col, (_, cell)) in row.iter().enumerate() {
                sheet.write_string(row_num, u16::try_from(col)?, clip(cell))?;
            }
        }
        for (col, width) in column_widths(rows).into_iter().enumerate() {
            sheet.set_column_width(u16::try_from(col)?, width)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::ProfileRow;
    use crate::profiles::models::tests::blank_row;
    use chrono::TimeZone;

    fn profile(row: ProfileRow) -> Profile {
        Profile::from_row(row, &SkillCatalog::builtin())
    }

    fn sample_row() -> ProfileRow {
        let mut row = blank_row("HM100");
        row.name = "Asha Rao".to_string();
        row.competency = Some("DE".to_string());
        row.total_exp_years = Some(7);
        row.total_exp_months = Some(3);
        row.reporting_location_type = Some("customer".to_string());
        row.customer_name = Some("Acme, Inc.".to_string());
        row.industries = Some(r#"["Banking", " ", "Retail"]"#.to_string());
        row.education = Some(r#"[{"degree": "BSc", "institution": "X"}]"#.to_string());
        row.skills = Some(r#"["Python", {"skill_name": "python"}]"#.to_string());
        row.projects = Some(r#"[{"title": "Foo", "description": "Bar"}]"#.to_string());
        row.profile_pic = Some("data:image/png;base64,AAAA".to_string());
        row.created_at = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();
        row.updated_at = row.created_at;
        row
    }

    #[test]
    fn test_column_schema_is_fixed() {
        assert_eq!(EXPORT_COLUMNS.len(), 23);
        assert_eq!(EXPORT_COLUMNS[0], "HM ID");
        assert_eq!(EXPORT_COLUMNS[22], "Updated At");
        let row = format_profile_for_export(&SkillCatalog::builtin(), &profile(blank_row("E")));
        assert_eq!(row.iter().count(), EXPORT_COLUMNS.len());
    }

    #[test]
    fn test_row_projection() {
        let row = format_profile_for_export(&SkillCatalog::builtin(), &profile(sample_row()));
        assert_eq!(row.get("HM ID"), Some("HM100"));
        assert_eq!(row.get("Total Exp (Y)"), Some("7"));
        assert_eq!(row.get("Relevant Exp (Y)"), Some(""));
        assert_eq!(row.get("Customer Name"), Some("Acme, Inc."));
        assert_eq!(row.get("Industries"), Some("Banking; Retail"));
        assert_eq!(row.get("Education"), Some("BSc | X"));
        assert_eq!(row.get("Skills (Detailed)"), Some("SK00056 Python — Base; Primary"));
        assert_eq!(row.get("Projects (Detailed)"), Some("Foo\nDesc: Bar"));
        assert_eq!(row.get("Certifications (Detailed)"), Some(""));
        assert_eq!(row.get("Has Profile Pic"), Some("Yes"));
        assert_eq!(row.get("Approved"), Some("No"));
        assert_eq!(row.get("Approved At"), Some(""));
        assert_eq!(row.get("Created At"), Some("2024-02-03T04:05:06Z"));
        assert_eq!(row.get("Nope"), None);
    }

    #[test]
    fn test_iter_pairs_columns_in_order() {
        let row = format_profile_for_export(&SkillCatalog::builtin(), &profile(sample_row()));
        let columns: Vec<_> = row.iter().map(|(c, _)| c).collect();
        assert_eq!(columns, EXPORT_COLUMNS.to_vec());
    }

    #[test]
    fn test_report_has_one_row_per_profile() {
        let profiles = vec![
            profile(sample_row()),
            profile(blank_row("HM2")),
            profile(blank_row("HM3")),
        ];
        let rows = build_report(&SkillCatalog::builtin(), &profiles);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].get("HM ID"), Some("HM2"));
    }

    #[test]
    fn test_csv_round_trips_through_reader() {
        let profiles = vec![profile(sample_row()), profile(blank_row("HM2"))];
        let bytes = write_csv(&build_report(&SkillCatalog::builtin(), &profiles)).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, EXPORT_COLUMNS.to_vec());

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][9], "Acme, Inc.");
        assert_eq!(&records[0][17], "Foo\nDesc: Bar");
        assert_eq!(records[1].len(), 23);
    }

    #[test]
    fn test_csv_with_no_profiles_is_header_only() {
        let bytes = write_csv(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("HM ID,Name,Competency"));
    }

    #[test]
    fn test_column_widths_are_capped() {
        let mut row = blank_row("HM1");
        row.customer_address = Some("x".repeat(300));
        let rows = build_report(&SkillCatalog::builtin(), &[profile(row)]);
        let widths = column_widths(&rows);
        assert_eq!(widths.len(), 23);
        assert_eq!(widths[10], 50.0);
        // "HM ID" header is wider than "HM1"
        assert_eq!(widths[0], 9.0);
    }

    #[test]
    fn test_xlsx_is_a_zip_container() {
        let rows = build_report(&SkillCatalog::builtin(), &[profile(sample_row())]);
        let bytes = write_xlsx(&rows).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_clip_long_cells() {
        let long = "é".repeat(MAX_CELL_CHARS + 10);
        assert_eq!(clip(&long).chars().count(), MAX_CELL_CHARS);
        assert_eq!(clip("short"), "short");
    }
}
