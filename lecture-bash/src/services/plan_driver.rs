//! Pages through every published timetable and drives the course processor.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::clients::TimetableApi;
use crate::config::SearchSettings;
use crate::error::BashResult;
use crate::models::ois::TimetableSummary;
use crate::models::{LectureTable, LectureTimeHistogram, MergeOutcome};
use crate::services::course_processor::{process_course, CourseOutcome, ProcessingContext};

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub lectures: LectureTable,
    pub lecture_times: LectureTimeHistogram,
    pub timetables_processed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    /// Wall time of the run in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Owns the lecture table and histogram for the duration of a run.
pub struct PlanDriver {
    api: Arc<dyn TimetableApi>,
    context: ProcessingContext,
    search: SearchSettings,
    lectures: LectureTable,
    lecture_times: LectureTimeHistogram,
    timetables_processed: usize,
}

impl PlanDriver {
    pub fn new(
        api: Arc<dyn TimetableApi>,
        context: ProcessingContext,
        search: SearchSettings,
        max_record_columns: usize,
    ) -> Self {
        Self {
            api,
            context,
            search,
            lectures: LectureTable::new(max_record_columns),
            lecture_times: LectureTimeHistogram::new(),
            timetables_processed: 0,
        }
    }

    /// Search every page and process every timetable found.
    ///
    /// # Errors
    /// The first fatal error of a search or a course task ends the run.
    pub async fn run(mut self) -> BashResult<RunSummary> {
        let started_at = Utc::now();
        let filter = self.search.filter();
        let page_size = self.search.page_size;

        let offsets: Vec<u32> = self.search.page_offsets().collect();
        for start in offsets {
            info!("Block search: {} {}", start, start + page_size - 1);
            let page = self.api.search(&filter, start, page_size).await?;
            if page.is_empty() {
                info!("Empty block");
                continue;
            }

            for (offset, timetable) in page.iter().enumerate() {
                self.process_timetable(timetable).await?;
                self.timetables_processed += 1;
                info!("Processed plan {}\t\t{}", timetable.uuid, start as usize + offset);
            }
        }

        let finished_at = Utc::now();
        let summary = RunSummary {
            lectures: self.lectures,
            lecture_times: self.lecture_times,
            timetables_processed: self.timetables_processed,
            started_at,
            finished_at,
        };
        info!("Plans processed in {:.1} seconds", summary.elapsed_secs());
        Ok(summary)
    }

    async fn process_timetable(&mut self, timetable: &TimetableSummary) -> BashResult<()> {
        let Some(courses) = &timetable.course_events else {
            warn!(timetable_uuid = %timetable.uuid, "Empty timetable");
            return Ok(());
        };

        let title = timetable.info.title.label().unwrap_or(&timetable.uuid);
        let timetable_link = self.context.links.timetable(&timetable.uuid, title);

        let api = self.api.as_ref();
        let context = &self.context;
        let link = timetable_link.as_str();
        let results = join_all(
            courses
                .iter()
                .map(|course| process_course(api, context, course, link)),
        )
        .await;

        let mut first_error = None;
        for result in results {
            match result {
                Ok(outcome) => self.merge(outcome),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => {
                warn!(timetable_uuid = %timetable.uuid, error = %e, "course processing failed");
                Err(e)
            }
            None => Ok(()),
        }
    }

    fn merge(&mut self, outcome: CourseOutcome) {
        for time in outcome.lecture_times {
            self.lecture_times.increment(time);
        }
        for sighting in outcome.sightings {
            let key = sighting.key.clone();
            match self.lectures.merge(sighting) {
                MergeOutcome::Inserted => {
                    if let Some(record) = self.lectures.get(&key) {
                        info!(
                            "Found matching lecture\t\t\tWeek {}\t{}",
                            key.week, record.course_code
                        );
                    }
                }
                MergeOutcome::LinkDropped => {
                    debug!(%key, "row is full, timetable link dropped");
                }
                MergeOutcome::LinkAppended | MergeOutcome::Ignored => {}
            }
        }
    }
}
