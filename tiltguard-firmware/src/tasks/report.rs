//! Report drain task
//!
//! Stands in for the network uplink: drains per-sample reports and logs
//! the query string the posture API takes, together with the status
//! payload an HTTP endpoint would serve.

use defmt::*;

use tiltguard_core::monitor::AngleReader;

use crate::channels::REPORT_CHANNEL;

#[embassy_executor::task]
pub async fn report_task(status: AngleReader<'static>) {
    info!("Report task started");

    loop {
        let report = REPORT_CHANNEL.receive().await;
        let query = report.to_query();

        debug!("uplink: {=str}", query.as_str());
        trace!("status: {}", status.status());
    }
}
