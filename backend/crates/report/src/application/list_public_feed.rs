//! List Public Feed Use Case
//!
//! APPROVED and RESOLVED reports, newest first, with locations run
//! through the geocoder concurrently.

use std::sync::Arc;

use futures::future::join_all;

use crate::domain::capability::Geocoder;
use crate::domain::entity::report::Report;
use crate::domain::repository::ReportRepository;
use crate::error::ReportResult;

pub struct ListPublicFeedUseCase<R, G>
where
    R: ReportRepository,
    G: Geocoder,
{
    report_repo: Arc<R>,
    geocoder: Arc<G>,
}

impl<R, G> ListPublicFeedUseCase<R, G>
where
    R: ReportRepository,
    G: Geocoder,
{
    pub fn new(report_repo: Arc<R>, geocoder: Arc<G>) -> Self {
        Self {
            report_repo,
            geocoder,
        }
    }

    pub async fn execute(&self) -> ReportResult<Vec<Report>> {
        let reports = self.report_repo.list_public().await?;

        // Never PENDING or REJECTED, whatever the store hands back
        let reports: Vec<Report> = reports.into_iter().filter(|r| r.status.is_public()).collect();

        let addresses = join_all(
            reports
                .iter()
                .map(|r| self.geocoder.reverse_lookup(&r.location)),
        )
        .await;

        Ok(reports
            .into_iter()
            .zip(addresses)
            .map(|(report, location)| Report { location, ..report })
            .collect())
    }
}
