//! Writes the found lectures of a run to the output sheet.

use tracing::info;

use crate::clients::SpreadsheetStore;
use crate::config::SheetsSettings;
use crate::error::BashResult;
use crate::services::plan_driver::RunSummary;

/// Replace the output range with the rows of `summary`.
///
/// The range is cleared first, so rows left by an earlier, longer run do not
/// survive. Returns the number of lectures written.
pub async fn publish(
    store: &dyn SpreadsheetStore,
    settings: &SheetsSettings,
    summary: &RunSummary,
) -> BashResult<usize> {
    let output_id = &settings.output_spreadsheet_id;
    let output_range = &settings.output_range;

    store.clear_range(output_id, output_range).await?;
    let rows = summary.lectures.to_rows();
    let written = rows.len();
    if written > 0 {
        store.write_range(output_id, output_range, rows).await?;
    }

    info!(lectures = written, range = %output_range, "output written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::LocalSpreadsheet;
    use crate::models::{LectureKey, LectureRecord, LectureTable, LectureTimeHistogram, Sighting};
    use chrono::Utc;

    fn summary(weeks: &[u32]) -> RunSummary {
        let mut lectures = LectureTable::new(38);
        for week in weeks {
            lectures.merge(Sighting {
                key: LectureKey::new("lec-1", *week),
                timetable_link: "tt".into(),
                candidate: Some(LectureRecord {
                    structural_unit: "LTAT".into(),
                    course_code: "LTAT.03.001".into(),
                    lecture_type: "loeng".into(),
                    course_name: "Programmeerimine".into(),
                    available_people: vec!["A".into(), "B".into()],
                    registered_count: Some(120),
                    group_count: 0,
                    week: *week,
                    weekday: 2,
                    start_time: "10:00".into(),
                    address: None,
                    course_link: "course".into(),
                    course_timetable_link: "timetable".into(),
                    timetable_links: vec!["tt".into()],
                }),
            });
        }
        let now = Utc::now();
        RunSummary {
            lectures,
            lecture_times: LectureTimeHistogram::new(),
            timetables_processed: 1,
            started_at: now,
            finished_at: now,
        }
    }

    fn stale_sheet(settings: &SheetsSettings) -> LocalSpreadsheet {
        let stale = (0..3).map(|i| vec![format!("stale {}", i)]).collect();
        LocalSpreadsheet::new().with_range(
            &settings.output_spreadsheet_id,
            &settings.output_range,
            stale,
        )
    }

    #[tokio::test]
    async fn test_shorter_output_leaves_no_stale_rows() {
        let settings = SheetsSettings::default();
        let sheet = stale_sheet(&settings);

        let written = publish(&sheet, &settings, &summary(&[5])).await.unwrap();
        assert_eq!(written, 1);

        let rows = sheet.rows(&settings.output_spreadsheet_id, &settings.output_range);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], "LTAT.03.001");
    }

    #[tokio::test]
    async fn test_empty_run_clears_output() {
        let settings = SheetsSettings::default();
        let sheet = stale_sheet(&settings);

        let written = publish(&sheet, &settings, &summary(&[])).await.unwrap();
        assert_eq!(written, 0);
        assert!(sheet
            .rows(&settings.output_spreadsheet_id, &settings.output_range)
            .is_empty());
    }
}
