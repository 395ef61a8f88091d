// Connectivity monitor
//
// One task per device. Each round probes once, then waits the interval
// for the resulting state. A command failure that flips the device
// offline cuts the wait short and restarts it on the offline interval.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::MonitorTiming;
use crate::device::DeviceHandle;

pub(crate) async fn run(device: Arc<DeviceHandle>, timing: MonitorTiming, cancel: CancellationToken) {
    debug!(device = %device.name(), "connectivity monitor started");

    loop {
        let online = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            online = device.probe() => online,
        };

        let mut delay = timing.interval_for(online);
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!(device = %device.name(), "connectivity monitor stopped");
                    return;
                }
                () = device.rescheduled() => {
                    // A stale wakeup can arrive after the device recovered.
                    delay = timing.interval_for(device.is_online());
                    debug!(device = %device.name(), ?delay, "probe rescheduled");
                }
                () = tokio::time::sleep(delay) => break,
            }
        }
    }

    debug!(device = %device.name(), "connectivity monitor stopped");
}
